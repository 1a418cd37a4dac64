//! Opponent behavior
//!
//! Two modes. In ATTACK the devil chases the warrior and shoots when close;
//! once it gets too close it breaks off into EVADE, flies to a random point,
//! and turns back to ATTACK on arrival. `evaluate` is a pure function of
//! its context: the caller applies the returned update.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::craft::{Craft, CraftState};
use super::geometry::beam_hits;
use super::tick::TickInput;
use crate::tuning::Tuning;
use crate::{bearing_degrees, normalize_degrees};

/// Opponent behavior mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiMode {
    Attack,
    Evade,
}

impl AiMode {
    /// Mode implied by a craft's lifecycle state
    pub fn from_state(state: CraftState) -> Self {
        match state {
            CraftState::Attack => AiMode::Attack,
            _ => AiMode::Evade,
        }
    }

    pub fn as_state(&self) -> CraftState {
        match self {
            AiMode::Attack => CraftState::Attack,
            AiMode::Evade => CraftState::Evade,
        }
    }
}

/// Everything the opponent looks at in one tick
#[derive(Debug, Clone, Copy)]
pub struct AiContext<'a> {
    /// The craft being driven
    pub craft: &'a Craft,
    /// Position of the craft it hunts
    pub quarry: Vec2,
    /// Persisted steering target
    pub target: Option<Vec2>,
    pub tuning: &'a Tuning,
}

/// Decisions for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiUpdate {
    pub mode: AiMode,
    pub target: Option<Vec2>,
    /// New thrust command, if it changes
    pub thrust: Option<f32>,
    /// Heading change in degrees
    pub turn: f32,
    /// Wants to fire (still subject to `can_fire`)
    pub fire: bool,
    pub mode_changed: bool,
}

impl AiUpdate {
    fn hold(mode: AiMode, target: Option<Vec2>, mode_changed: bool) -> Self {
        Self {
            mode,
            target,
            thrust: None,
            turn: 0.0,
            fire: false,
            mode_changed,
        }
    }
}

/// Decide what the opponent does this tick
pub fn evaluate<R: Rng + ?Sized>(ctx: &AiContext<'_>, rng: &mut R) -> AiUpdate {
    match AiMode::from_state(ctx.craft.state) {
        AiMode::Attack => attack(ctx),
        AiMode::Evade => evade(ctx, rng),
    }
}

fn attack(ctx: &AiContext<'_>) -> AiUpdate {
    let ai = &ctx.tuning.ai;
    let craft = ctx.craft;
    let target = ctx.quarry;
    let distance = craft.pos.distance(target);

    if distance < ai.evade_distance {
        return AiUpdate::hold(AiMode::Evade, None, true);
    }

    let full = ctx.tuning.limits(craft.kind).forward_thrust;
    let thrust = if distance > ai.full_thrust_distance {
        full
    } else if distance > ai.cruise_distance {
        full / 3.0
    } else {
        0.0
    };

    AiUpdate {
        mode: AiMode::Attack,
        target: Some(target),
        thrust: Some(thrust),
        turn: steer(craft.pos, craft.heading, target, ctx.tuning.ai_turn_rate),
        fire: distance < ai.fire_distance,
        mode_changed: false,
    }
}

fn evade<R: Rng + ?Sized>(ctx: &AiContext<'_>, rng: &mut R) -> AiUpdate {
    let craft = ctx.craft;

    if let Some(target) = ctx.target {
        let gap = (target - craft.pos).abs();
        let resume = ctx.tuning.ai.resume_attack_distance;
        if gap.x < resume && gap.y < resume {
            return AiUpdate::hold(AiMode::Attack, Some(target), true);
        }
    }

    let target = ctx.target.unwrap_or_else(|| random_point(ctx.tuning, rng));

    AiUpdate {
        mode: AiMode::Evade,
        target: Some(target),
        thrust: Some(ctx.tuning.limits(craft.kind).forward_thrust),
        turn: steer(craft.pos, craft.heading, target, ctx.tuning.ai_turn_rate),
        fire: false,
        mode_changed: false,
    }
}

fn random_point<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.random_range(0..tuning.world_width as u32) as f32,
        rng.random_range(0..tuning.world_height as u32) as f32,
    )
}

/// Fixed-rate turn toward `target` along the shorter arc
pub fn steer(pos: Vec2, heading: f32, target: Vec2, turn_rate: f32) -> f32 {
    let arc = normalize_degrees(bearing_degrees(pos, target) - heading);
    if arc < 180.0 { turn_rate } else { -turn_rate }
}

/// Scripted pilot for the player's craft, used by the headless runner.
///
/// Points the nose at the opponent, closes to about half beam range, and
/// fires whenever a shot would land.
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Headings within this many degrees of the bearing count as aligned
    pub aim_tolerance: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { aim_tolerance: 10.0 }
    }
}

impl Autopilot {
    pub fn plan(&self, pilot: &Craft, quarry: Vec2, tuning: &Tuning) -> TickInput {
        let arc = normalize_degrees(bearing_degrees(pilot.pos, quarry) - pilot.heading);
        let aligned = arc <= self.aim_tolerance || arc >= 360.0 - self.aim_tolerance;
        let distance = pilot.pos.distance(quarry);

        TickInput {
            turn_left: !aligned && arc < 180.0,
            turn_right: !aligned && arc >= 180.0,
            thrust_forward: distance > tuning.phaser_range / 2.0,
            thrust_reverse: distance < tuning.ai.fire_distance / 4.0,
            fire: pilot.can_fire(tuning)
                && beam_hits(&pilot.beam_segment(tuning), quarry, tuning.phaser_hit_radius / 4.0),
            quit: false,
        }
    }
}
