//! Beam geometry: line clipping and hit testing
//!
//! Beams are straight rays, so everything here is plain segment math. Clipping
//! is done one axis at a time against an inclusive rectangle, and hit tests
//! project the target onto the beam direction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::heading_vector;

/// A directed line segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    /// Vector from start to end
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    /// Same segment moved by `offset` (e.g. world to screen space)
    #[inline]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }
}

/// Axis-aligned rectangle with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Pixel rectangle of a `size` surface: (0, 0) to (w - 1, h - 1)
    pub fn from_size(size: Vec2) -> Self {
        Self::new(0.0, 0.0, size.x - 1.0, size.y - 1.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Clip a segment against a rectangle.
///
/// Returns `None` when no part of the segment is inside. A segment that
/// touches a boundary counts as visible. The clipped segment keeps the
/// caller's start/end orientation.
pub fn clip_segment_to_rect(segment: Segment, rect: &Rect) -> Option<Segment> {
    let clipped = clip_axis(segment, 0, rect.left, rect.right)?;
    clip_axis(clipped, 1, rect.top, rect.bottom)
}

/// Clip against the `low..=high` band of one axis (0 = x, 1 = y)
fn clip_axis(segment: Segment, axis: usize, low: f32, high: f32) -> Option<Segment> {
    let other = 1 - axis;
    let p0 = segment.start.to_array();
    let p1 = segment.end.to_array();

    // Perpendicular to this axis: all or nothing
    if p0[axis] == p1[axis] {
        return (low..=high).contains(&p0[axis]).then_some(segment);
    }

    if (p0[axis] < low && p1[axis] < low) || (p0[axis] > high && p1[axis] > high) {
        return None;
    }

    // a = low end, c = high end along this axis
    let swapped = p0[axis] > p1[axis];
    let (mut a, mut c) = if swapped { (p1, p0) } else { (p0, p1) };

    if a[axis] < low {
        let span = c[axis] - a[axis];
        a[other] = c[other] - (c[other] - a[other]) * (c[axis] - low) / span;
        a[axis] = low;
    }

    if c[axis] > high {
        let span = c[axis] - a[axis];
        c[other] = c[other] - (c[other] - a[other]) * (c[axis] - high) / span;
        c[axis] = high;
    }

    let (start, end) = if swapped { (c, a) } else { (a, c) };
    Some(Segment::new(Vec2::from_array(start), Vec2::from_array(end)))
}

/// Beam fired from `origin` along `heading_deg`, `range` units long
pub fn beam_endpoints(origin: Vec2, heading_deg: f32, range: f32) -> Segment {
    Segment::new(origin, origin + heading_vector(heading_deg) * range)
}

/// Does the beam strike a target at `target`?
///
/// The target is projected onto the beam's line. Anything behind the origin
/// misses; otherwise it is a hit when the perpendicular distance to the line
/// is below `hit_radius`. The projection is not limited to the beam's length,
/// so a colinear target past the beam's end still registers.
pub fn beam_hits(beam: &Segment, target: Vec2, hit_radius: f32) -> bool {
    let v1 = beam.direction();
    let v2 = target - beam.start;

    let dot = v1.dot(v2);
    if dot < 0.0 {
        return false;
    }

    let len_sq = v1.length_squared();
    let projection = if len_sq > 0.0 {
        v1 * (dot / len_sq)
    } else {
        Vec2::ZERO
    };

    (v2 - projection).length() < hit_radius
}
