//! Crafts: the player's warrior and the computer's devil
//!
//! Physics is deliberately coarse: velocity is a scalar along the heading and
//! per-tick displacement is truncated to whole world units.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Segment, beam_endpoints};
use crate::consts::{CHARGE_TIME_DIVISOR, DEGREES_PER_SPRITE_FRAME, FULL_SHIELDS};
use crate::tuning::Tuning;
use crate::{heading_vector, normalize_degrees};

/// Which side a craft fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftKind {
    /// Player controlled
    Warrior,
    /// Computer controlled
    Devil,
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftState {
    Attack,
    Evade,
    /// Destroyed, waiting for the respawn timer (player only)
    Dead,
    /// Freshly respawned; incoming damage is ignored (player only)
    Invincible,
}

/// Result of a beam strike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Craft was dead or invincible
    Ignored,
    /// Shields took the hit and held
    Absorbed,
    /// Shields are gone
    Destroyed,
}

/// A combat craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Craft {
    pub kind: CraftKind,
    pub state: CraftState,
    /// World position
    pub pos: Vec2,
    /// Degrees in [0, 360)
    pub heading: f32,
    /// Signed speed along the heading
    pub velocity: f32,
    /// Signed acceleration command
    pub thrust: f32,
    pub shields: i32,
    pub charge: f32,
    /// Remaining beam time; the beam is live while this is positive
    pub firing: f32,
    pub score: u32,
}

impl Craft {
    /// A craft at the world origin with full shields and an empty weapon
    pub fn new(kind: CraftKind) -> Self {
        Self {
            kind,
            state: CraftState::Evade,
            pos: Vec2::ZERO,
            heading: 0.0,
            velocity: 0.0,
            thrust: 0.0,
            shields: FULL_SHIELDS,
            charge: 0.0,
            firing: 0.0,
            score: 0,
        }
    }

    /// A craft at a random spot in the world
    pub fn spawn<R: Rng + ?Sized>(kind: CraftKind, tuning: &Tuning, rng: &mut R, dt: f32) -> Self {
        let mut craft = Self::new(kind);
        craft.respawn(tuning, rng, dt);
        craft
    }

    /// Reset everything except the score and drop the craft somewhere random
    pub fn respawn<R: Rng + ?Sized>(&mut self, tuning: &Tuning, rng: &mut R, dt: f32) {
        self.state = CraftState::Evade;
        self.pos = Vec2::new(
            rng.random_range(0..tuning.world_width as u32) as f32,
            rng.random_range(0..tuning.world_height as u32) as f32,
        );
        self.thrust = 0.0;
        self.velocity = 0.0;
        self.heading = 0.0;
        self.charge = 0.0;
        self.firing = 0.0;
        self.shields = FULL_SHIELDS;
        self.integrate(tuning, dt);
    }

    /// Apply thrust to velocity and velocity to position, then keep the
    /// craft inside the world
    pub fn integrate(&mut self, tuning: &Tuning, dt: f32) {
        let limits = tuning.limits(self.kind);
        self.velocity = (self.velocity + self.thrust * dt)
            .clamp(limits.min_velocity, limits.max_velocity);

        let step = heading_vector(self.heading) * self.velocity * dt;
        self.pos += step.trunc();
        self.clamp_to_world(tuning);
    }

    /// Keep clear of the left/top border and hard-stop at the far edges
    pub fn clamp_to_world(&mut self, tuning: &Tuning) {
        let margin = tuning.border_margin;
        let limit_x = tuning.ship_limit_x();

        if self.pos.x < margin {
            self.pos.x = margin;
        }
        if self.pos.x >= limit_x {
            self.pos.x = limit_x;
        }
        if self.pos.y < margin {
            self.pos.y = margin;
        }
        if self.pos.y >= tuning.world_height {
            self.pos.y = tuning.world_height - 1.0;
        }
    }

    /// Rotate by `delta` degrees
    pub fn turn(&mut self, delta: f32) {
        self.heading = normalize_degrees(self.heading + delta);
    }

    /// Set the acceleration command, clamped to this craft's thrusters
    pub fn set_thrust(&mut self, thrust: f32, tuning: &Tuning) {
        let limits = tuning.limits(self.kind);
        self.thrust = thrust.clamp(limits.reverse_thrust, limits.forward_thrust);
    }

    /// Kill all motion
    pub fn halt(&mut self) {
        self.velocity = 0.0;
        self.thrust = 0.0;
    }

    pub fn charge_weapon(&mut self, tuning: &Tuning, dt: f32) {
        self.charge = (self.charge + dt / CHARGE_TIME_DIVISOR * tuning.phaser_charge_rate)
            .clamp(0.0, tuning.phaser_charge_max);
    }

    /// Enough charge and no beam already live
    pub fn can_fire(&self, tuning: &Tuning) -> bool {
        self.charge >= tuning.phaser_fire_cost && self.firing == 0.0
    }

    /// Light the beam. A no-op returning false unless `can_fire` holds.
    pub fn fire(&mut self, tuning: &Tuning) -> bool {
        if !self.can_fire(tuning) {
            return false;
        }
        self.charge = (self.charge - tuning.phaser_fire_cost).max(0.0);
        self.firing = tuning.phaser_fire_time;
        true
    }

    /// Burn down the live beam
    pub fn cool_beam(&mut self, dt: f32) {
        self.firing = (self.firing - dt).max(0.0);
    }

    pub fn is_firing(&self) -> bool {
        self.firing > 0.0
    }

    /// Beam from the current position and heading, whether or not it is live
    pub fn beam_segment(&self, tuning: &Tuning) -> Segment {
        beam_endpoints(self.pos, self.heading, tuning.phaser_range)
    }

    /// The live beam, if any
    pub fn beam(&self, tuning: &Tuning) -> Option<Segment> {
        self.is_firing().then(|| self.beam_segment(tuning))
    }

    /// Take a beam hit
    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if matches!(self.state, CraftState::Dead | CraftState::Invincible) {
            return DamageOutcome::Ignored;
        }
        self.shields = (self.shields - amount).clamp(0, FULL_SHIELDS);
        if self.shields == 0 {
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Absorbed
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == CraftState::Dead
    }

    pub fn is_invincible(&self) -> bool {
        self.state == CraftState::Invincible
    }

    /// Index into the renderer's rotation strip
    pub fn sprite_frame(&self) -> u32 {
        (normalize_degrees(self.heading) / DEGREES_PER_SPRITE_FRAME) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn craft_at(kind: CraftKind, x: f32, y: f32) -> Craft {
        Craft {
            pos: Vec2::new(x, y),
            ..Craft::new(kind)
        }
    }

    #[test]
    fn test_spawn_defaults() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let craft = Craft::spawn(CraftKind::Warrior, &tuning, &mut rng, 1.0);

        assert_eq!(craft.state, CraftState::Evade);
        assert_eq!(craft.shields, 100);
        assert_eq!(craft.charge, 0.0);
        assert_eq!(craft.firing, 0.0);
        assert_eq!(craft.velocity, 0.0);
        assert_eq!(craft.heading, 0.0);
        assert!(craft.pos.x >= tuning.border_margin && craft.pos.x <= tuning.ship_limit_x());
        assert!(craft.pos.y >= tuning.border_margin && craft.pos.y < tuning.world_height);
    }

    #[test]
    fn test_respawn_keeps_score() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut craft = craft_at(CraftKind::Devil, 500.0, 500.0);
        craft.score = 7;
        craft.shields = 0;
        craft.respawn(&tuning, &mut rng, 1.0);
        assert_eq!(craft.score, 7);
        assert_eq!(craft.shields, 100);
    }

    #[test]
    fn test_integrate_moves_along_heading() {
        let tuning = Tuning::default();
        let mut craft = craft_at(CraftKind::Warrior, 500.0, 500.0);
        craft.thrust = 3.0;
        craft.integrate(&tuning, 1.0);
        assert_eq!(craft.velocity, 3.0);
        assert_eq!(craft.pos, Vec2::new(503.0, 500.0));

        craft.heading = 90.0;
        craft.integrate(&tuning, 1.0);
        assert_eq!(craft.velocity, 6.0);
        // Heading 90 moves toward negative y; x drift truncates to zero
        assert_eq!(craft.pos, Vec2::new(503.0, 494.0));
    }

    #[test]
    fn test_velocity_limits_per_kind() {
        let tuning = Tuning::default();
        let mut warrior = craft_at(CraftKind::Warrior, 1000.0, 1000.0);
        let mut devil = craft_at(CraftKind::Devil, 1000.0, 1000.0);
        warrior.thrust = 3.0;
        devil.thrust = 3.0;
        for _ in 0..20 {
            warrior.integrate(&tuning, 1.0);
            devil.integrate(&tuning, 1.0);
        }
        assert_eq!(warrior.velocity, 15.0);
        assert_eq!(devil.velocity, 10.0);

        warrior.thrust = -1.0;
        for _ in 0..40 {
            warrior.integrate(&tuning, 1.0);
        }
        assert_eq!(warrior.velocity, -5.0);
    }

    #[test]
    fn test_world_clamp() {
        let tuning = Tuning::default();
        let mut craft = craft_at(CraftKind::Warrior, 10.0, -300.0);
        craft.clamp_to_world(&tuning);
        assert_eq!(craft.pos, Vec2::new(40.0, 40.0));

        let mut craft = craft_at(CraftKind::Warrior, 5000.0, 5000.0);
        craft.clamp_to_world(&tuning);
        assert_eq!(craft.pos, Vec2::new(1999.0, 1999.0));
    }

    #[test]
    fn test_thrust_clamped() {
        let tuning = Tuning::default();
        let mut craft = Craft::new(CraftKind::Devil);
        craft.set_thrust(50.0, &tuning);
        assert_eq!(craft.thrust, 3.0);
        craft.set_thrust(-50.0, &tuning);
        assert_eq!(craft.thrust, -1.0);
    }

    #[test]
    fn test_turn_wraps() {
        let mut craft = Craft::new(CraftKind::Warrior);
        craft.turn(-10.0);
        assert_eq!(craft.heading, 350.0);
        craft.turn(20.0);
        assert_eq!(craft.heading, 10.0);
    }

    #[test]
    fn test_charge_clamps_at_max() {
        let tuning = Tuning::default();
        let mut craft = Craft::new(CraftKind::Warrior);
        craft.charge_weapon(&tuning, 30.0);
        assert_eq!(craft.charge, 20.0);
        for _ in 0..10 {
            craft.charge_weapon(&tuning, 30.0);
        }
        assert_eq!(craft.charge, tuning.phaser_charge_max);
    }

    #[test]
    fn test_charge_never_drains_below_zero() {
        let tuning = Tuning {
            phaser_charge_rate: -20.0,
            ..Default::default()
        };
        let mut craft = Craft::new(CraftKind::Warrior);
        craft.charge = 10.0;
        craft.charge_weapon(&tuning, 30.0);
        assert_eq!(craft.charge, 0.0);
    }

    #[test]
    fn test_cannot_fire_without_charge() {
        let tuning = Tuning::default();
        let mut craft = Craft::new(CraftKind::Warrior);
        craft.charge = 5.0;

        assert!(!craft.can_fire(&tuning));
        assert!(!craft.fire(&tuning));
        assert_eq!(craft.charge, 5.0);
        assert_eq!(craft.firing, 0.0);
    }

    #[test]
    fn test_fire_and_cool() {
        let tuning = Tuning::default();
        let mut craft = Craft::new(CraftKind::Warrior);
        craft.charge = 50.0;

        assert!(craft.fire(&tuning));
        assert_eq!(craft.charge, 30.0);
        assert_eq!(craft.firing, tuning.phaser_fire_time);
        assert!(craft.beam(&tuning).is_some());

        // Beam already live
        assert!(!craft.can_fire(&tuning));

        craft.cool_beam(3.0);
        assert_eq!(craft.firing, 2.0);
        craft.cool_beam(3.0);
        assert_eq!(craft.firing, 0.0);
        assert!(craft.beam(&tuning).is_none());
        assert!(craft.can_fire(&tuning));
    }

    #[test]
    fn test_damage_outcomes() {
        let mut craft = Craft::new(CraftKind::Devil);
        assert_eq!(craft.apply_damage(30), DamageOutcome::Absorbed);
        assert_eq!(craft.shields, 70);
        assert_eq!(craft.apply_damage(500), DamageOutcome::Destroyed);
        assert_eq!(craft.shields, 0);

        let mut craft = Craft::new(CraftKind::Warrior);
        craft.state = CraftState::Invincible;
        assert_eq!(craft.apply_damage(30), DamageOutcome::Ignored);
        assert_eq!(craft.shields, 100);
    }

    #[test]
    fn test_negative_damage_caps_at_full_shields() {
        let mut craft = Craft::new(CraftKind::Devil);
        craft.shields = 80;
        assert_eq!(craft.apply_damage(-50), DamageOutcome::Absorbed);
        assert_eq!(craft.shields, FULL_SHIELDS);
    }

    #[test]
    fn test_sprite_frame() {
        let mut craft = Craft::new(CraftKind::Warrior);
        craft.heading = 359.0;
        assert_eq!(craft.sprite_frame(), 89);
        craft.heading = 8.0;
        assert_eq!(craft.sprite_frame(), 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Damage(i32),
        Charge(f32),
        Fire,
        Cool(f32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-200i32..200).prop_map(Op::Damage),
            (0.0f32..100.0).prop_map(Op::Charge),
            Just(Op::Fire),
            (0.0f32..10.0).prop_map(Op::Cool),
        ]
    }

    proptest! {
        #[test]
        fn prop_shields_and_charge_stay_in_range(ops in proptest::collection::vec(op_strategy(), 0..64)) {
            let tuning = Tuning::default();
            let mut craft = Craft::new(CraftKind::Devil);
            for op in ops {
                match op {
                    Op::Damage(amount) => { craft.apply_damage(amount); }
                    Op::Charge(dt) => craft.charge_weapon(&tuning, dt),
                    Op::Fire => { craft.fire(&tuning); }
                    Op::Cool(dt) => craft.cool_beam(dt),
                }
                prop_assert!((0..=100).contains(&craft.shields));
                prop_assert!(craft.charge >= 0.0 && craft.charge <= tuning.phaser_charge_max);
                prop_assert!(craft.firing >= 0.0);
            }
        }
    }
}
