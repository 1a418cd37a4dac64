//! Phaser Arena - a two-craft dogfight in a scrolling world
//!
//! Core modules:
//! - `sim`: Deterministic simulation (crafts, beams, particles, AI, camera)
//! - `present`: Draw/status requests handed to an external renderer
//! - `session`: Frame-by-frame orchestration and timing
//! - `tuning`: Data-driven game balance

pub mod present;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{Control, Session, SessionReport};
pub use tuning::{EffectsPreset, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants that are not tunable
pub mod consts {
    /// Milliseconds of wall time that make up one unit of time scale
    pub const MS_PER_TIME_UNIT: f32 = 25.0;
    /// Time-scale units per full charge-rate increment
    pub const CHARGE_TIME_DIVISOR: f32 = 30.0;
    /// Shield strength of a freshly spawned craft
    pub const FULL_SHIELDS: i32 = 100;
    /// Degrees of heading covered by one frame of the rotation sprite strip
    pub const DEGREES_PER_SPRITE_FRAME: f32 = 4.0;
    /// Side length of the square radar panel
    pub const RADAR_SIZE: f32 = 100.0;
    /// Status line shown when the player re-enters the arena
    pub const RESPAWN_MESSAGE: &str = "GOOD LUCK, WARRIOR!!";
    /// Status line shown when a session starts
    pub const WELCOME_MESSAGE: &str = "WELCOME TO PHASER ARENA";
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector for a heading in degrees.
///
/// Headings are counter-clockwise from +x with y growing downward, so a
/// heading of 90 points toward negative y.
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), -radians.sin())
}

/// Bearing in degrees [0, 360) from `from` toward `to`
#[inline]
pub fn bearing_degrees(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    normalize_degrees((-delta.y).atan2(delta.x).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-7) < 360.0);
    }

    #[test]
    fn test_heading_vector_screen_convention() {
        let east = heading_vector(0.0);
        assert!((east.x - 1.0).abs() < 1e-6 && east.y.abs() < 1e-6);

        // 90 degrees points "up" the screen, which is negative y
        let north = heading_vector(90.0);
        assert!(north.x.abs() < 1e-6);
        assert!((north.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_degrees() {
        let origin = Vec2::new(100.0, 100.0);
        assert!((bearing_degrees(origin, Vec2::new(200.0, 100.0)) - 0.0).abs() < 1e-4);
        assert!((bearing_degrees(origin, Vec2::new(100.0, 0.0)) - 90.0).abs() < 1e-4);
        assert!((bearing_degrees(origin, Vec2::new(0.0, 100.0)) - 180.0).abs() < 1e-4);
        assert!((bearing_degrees(origin, Vec2::new(100.0, 200.0)) - 270.0).abs() < 1e-4);
    }
}
