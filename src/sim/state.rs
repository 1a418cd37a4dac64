//! Arena state: the single owner of everything the simulation mutates

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::AiMode;
use super::camera::Camera;
use super::craft::{Craft, CraftKind, CraftState, DamageOutcome};
use super::particles::{Explosion, ParticlePool};
use crate::consts::{RESPAWN_MESSAGE, WELCOME_MESSAGE};
use crate::tuning::Tuning;

/// Events kept between drains; the oldest are dropped past this
pub const MAX_PENDING_EVENTS: usize = 1_024;

/// Something that happened during a tick, for renderers, audio and logs.
/// The simulation never reads these back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BeamFired { kind: CraftKind },
    BeamHit { target: CraftKind, shields: i32 },
    CraftDestroyed { kind: CraftKind, pos: Vec2 },
    Respawned { kind: CraftKind },
    InvincibilityEnded,
    AiModeChanged { mode: AiMode },
    /// Text for the status line
    Message(String),
}

/// Complete arena state
#[derive(Debug, Clone)]
pub struct ArenaState {
    pub tuning: Tuning,
    /// Seed the session RNG was built from
    pub seed: u64,
    /// Ticks run so far
    pub time_ticks: u64,
    pub player: Craft,
    pub opponent: Craft,
    pub particles: ParticlePool,
    /// Opponent steering target
    pub ai_target: Option<Vec2>,
    pub camera: Camera,
    /// Ticks since the player died; `None` while alive
    pub respawn_counter: Option<u32>,
    /// Ticks since the player respawned; `None` once vulnerable again
    pub invincible_counter: Option<u32>,
    /// The opponent was destroyed and replaced this tick
    pub opponent_respawn_pending: bool,
    /// Session RNG; every random draw in the arena comes from here
    pub rng: Pcg32,
    /// Undrained events, capped at [`MAX_PENDING_EVENTS`]
    events: Vec<GameEvent>,
}

impl ArenaState {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Craft::spawn(CraftKind::Warrior, &tuning, &mut rng, 0.0);
        let opponent = Craft::spawn(CraftKind::Devil, &tuning, &mut rng, 0.0);
        let camera = Camera::follow(player.pos, &tuning);
        let particles = ParticlePool::new(tuning.max_particles());

        Self {
            tuning,
            seed,
            time_ticks: 0,
            player,
            opponent,
            particles,
            ai_target: None,
            camera,
            respawn_counter: None,
            invincible_counter: None,
            opponent_respawn_pending: false,
            rng,
            events: vec![GameEvent::Message(WELCOME_MESSAGE.to_string())],
        }
    }

    /// The player is dead and waiting to re-enter
    pub fn is_respawning(&self) -> bool {
        self.respawn_counter.is_some()
    }

    /// Record an event. Callers driving `tick` themselves must drain
    /// regularly; past the cap the oldest events are lost.
    pub fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let excess = self.events.len() + 1 - MAX_PENDING_EVENTS;
            self.events.drain(..excess);
            log::trace!("Event buffer full, dropped {} oldest", excess);
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Land a player beam on the opponent
    pub fn strike_opponent(&mut self, time_scale: f32) -> DamageOutcome {
        let outcome = self.opponent.apply_damage(self.tuning.phaser_damage);
        if outcome == DamageOutcome::Ignored {
            return outcome;
        }
        self.particles
            .explode(&mut self.rng, self.opponent.pos, Explosion::PhaserHit);
        self.push_event(GameEvent::BeamHit {
            target: CraftKind::Devil,
            shields: self.opponent.shields,
        });
        if outcome == DamageOutcome::Destroyed {
            self.kill_opponent(time_scale);
        }
        outcome
    }

    /// Land an opponent beam on the player
    pub fn strike_player(&mut self) -> DamageOutcome {
        let outcome = self.player.apply_damage(self.tuning.devil_phaser_damage);
        if outcome == DamageOutcome::Ignored {
            return outcome;
        }
        self.particles
            .explode(&mut self.rng, self.player.pos, Explosion::PhaserHit);
        self.push_event(GameEvent::BeamHit {
            target: CraftKind::Warrior,
            shields: self.player.shields,
        });
        if outcome == DamageOutcome::Destroyed && !self.is_respawning() {
            self.kill_player();
        }
        outcome
    }

    /// Player goes down: the opponent scores and the respawn countdown starts
    pub fn kill_player(&mut self) {
        let pos = self.player.pos;
        self.player.halt();
        self.player.state = CraftState::Dead;
        self.opponent.score += 1;
        self.respawn_counter = Some(0);
        self.invincible_counter = None;

        self.particles
            .explode(&mut self.rng, pos, Explosion::ShipDestroyed);
        self.push_event(GameEvent::CraftDestroyed {
            kind: CraftKind::Warrior,
            pos,
        });
        log::debug!(
            "Player destroyed at ({}, {}); score {}-{}",
            pos.x,
            pos.y,
            self.player.score,
            self.opponent.score
        );
    }

    /// Opponent goes down and is replaced immediately
    pub fn kill_opponent(&mut self, time_scale: f32) {
        let pos = self.opponent.pos;
        self.player.score += 1;
        self.particles
            .explode(&mut self.rng, pos, Explosion::ShipDestroyed);
        self.opponent.respawn(&self.tuning, &mut self.rng, time_scale);
        self.opponent_respawn_pending = true;

        self.push_event(GameEvent::CraftDestroyed {
            kind: CraftKind::Devil,
            pos,
        });
        self.push_event(GameEvent::Respawned {
            kind: CraftKind::Devil,
        });
        log::debug!(
            "Opponent destroyed at ({}, {}); score {}-{}",
            pos.x,
            pos.y,
            self.player.score,
            self.opponent.score
        );
    }

    /// Bring the player back, invincible for a while
    pub fn respawn_player(&mut self, time_scale: f32) {
        self.player.respawn(&self.tuning, &mut self.rng, time_scale);
        self.player.state = CraftState::Invincible;
        self.respawn_counter = None;
        self.invincible_counter = Some(0);

        self.push_event(GameEvent::Respawned {
            kind: CraftKind::Warrior,
        });
        self.push_event(GameEvent::Message(RESPAWN_MESSAGE.to_string()));
        log::info!(
            "Player respawned at ({}, {})",
            self.player.pos.x,
            self.player.pos.y
        );
    }
}
