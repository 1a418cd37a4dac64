//! Simulation tick
//!
//! One call advances the arena by one frame. `time_scale` is the frame's
//! length in time units (25 ms each); every rate and timer in the tick is
//! scaled by the same value.

use super::ai::{self, AiContext};
use super::camera::Camera;
use super::craft::CraftState;
use super::geometry::beam_hits;
use super::state::{ArenaState, GameEvent};
use super::CraftKind;

/// Player intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust_forward: bool,
    /// Wins over `thrust_forward` when both are held
    pub thrust_reverse: bool,
    pub fire: bool,
    pub quit: bool,
}

/// What the caller needs to know after a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The player asked to leave
    pub quit: bool,
}

/// Advance the arena by one frame.
///
/// Events pile up in the state until drained with
/// [`ArenaState::drain_events`]; `Session` does that every frame.
pub fn tick(state: &mut ArenaState, input: &TickInput, time_scale: f32) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    state.time_ticks += 1;

    // The replacement opponent becomes live again
    state.opponent_respawn_pending = false;

    state.player.cool_beam(time_scale);
    state.opponent.cool_beam(time_scale);
    state.player.charge_weapon(&state.tuning, time_scale);

    advance_respawn(state, time_scale);

    if !state.is_respawning() {
        advance_invincibility(state, time_scale);
        outcome.quit = input.quit;
        fly_player(state, input, time_scale);
    }

    drive_opponent(state);

    if state.opponent.is_firing() && !state.player.is_invincible() && !state.player.is_dead() {
        let beam = state.opponent.beam_segment(&state.tuning);
        if beam_hits(&beam, state.player.pos, state.tuning.phaser_hit_radius) {
            state.strike_player();
        }
    }

    state.opponent.charge_weapon(&state.tuning, time_scale);
    state.opponent.integrate(&state.tuning, time_scale);
    state.player.integrate(&state.tuning, time_scale);

    state.camera = Camera::follow(state.player.pos, &state.tuning);
    state.particles.step();

    outcome
}

/// Dead player: count toward re-entry
fn advance_respawn(state: &mut ArenaState, time_scale: f32) {
    let Some(counter) = state.respawn_counter else {
        return;
    };
    let counter = counter + 1;
    if counter as f32 >= state.tuning.respawn_time / time_scale {
        state.respawn_player(time_scale);
    } else {
        state.respawn_counter = Some(counter);
    }
}

/// Freshly respawned player: count toward vulnerability
fn advance_invincibility(state: &mut ArenaState, time_scale: f32) {
    let Some(counter) = state.invincible_counter else {
        return;
    };
    let counter = counter + 1;
    if counter as f32 >= state.tuning.invincible_time / time_scale {
        state.invincible_counter = None;
        state.player.state = CraftState::Evade;
        state.push_event(GameEvent::InvincibilityEnded);
    } else {
        state.invincible_counter = Some(counter);
    }
}

/// Apply player intents: thrust, fire, then turn
fn fly_player(state: &mut ArenaState, input: &TickInput, time_scale: f32) {
    let mut turn = 0.0;
    if input.turn_left {
        turn += state.tuning.player_turn_rate;
    }
    if input.turn_right {
        turn -= state.tuning.player_turn_rate;
    }

    let limits = *state.tuning.limits(CraftKind::Warrior);
    state.player.thrust = if input.thrust_reverse {
        limits.reverse_thrust
    } else if input.thrust_forward {
        limits.forward_thrust
    } else {
        0.0
    };

    if input.fire && state.player.fire(&state.tuning) {
        state.push_event(GameEvent::BeamFired {
            kind: CraftKind::Warrior,
        });
        fire_at_opponent(state, time_scale);
    }

    state.player.turn((turn * time_scale).trunc());

    if state.player.shields <= 0 {
        state.kill_player();
    }
}

/// Hit test for a freshly fired player beam.
///
/// The player's beam only strikes on the frame it is fired. An opponent
/// awaiting replacement is not a target. Returns whether the beam struck.
fn fire_at_opponent(state: &mut ArenaState, time_scale: f32) -> bool {
    if state.opponent_respawn_pending {
        return false;
    }
    let beam = state.player.beam_segment(&state.tuning);
    if !beam_hits(&beam, state.opponent.pos, state.tuning.phaser_hit_radius) {
        return false;
    }
    state.strike_opponent(time_scale);
    true
}

/// Let the AI fly the opponent
fn drive_opponent(state: &mut ArenaState) {
    let ctx = AiContext {
        craft: &state.opponent,
        quarry: state.player.pos,
        target: state.ai_target,
        tuning: &state.tuning,
    };
    let update = ai::evaluate(&ctx, &mut state.rng);

    state.ai_target = update.target;
    state.opponent.state = update.mode.as_state();
    if update.mode_changed {
        log::debug!("Opponent switched to {:?}", update.mode);
        state.push_event(GameEvent::AiModeChanged { mode: update.mode });
    }
    if let Some(thrust) = update.thrust {
        state.opponent.set_thrust(thrust, &state.tuning);
    }
    state.opponent.turn(update.turn);

    if update.fire && state.opponent.fire(&state.tuning) {
        state.push_event(GameEvent::BeamFired {
            kind: CraftKind::Devil,
        });
    }
}
