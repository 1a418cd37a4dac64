//! Presentation seam
//!
//! The simulation never draws anything. After every tick the session walks
//! the arena and hands draw, status and radar requests to a [`FrameSink`];
//! player intents come in through an [`InputSource`]. Both are implemented
//! by whatever front end hosts the game.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::RADAR_SIZE;
use crate::sim::camera::{LayerKind, Starfield, TilePlacement, radar_blip};
use crate::sim::geometry::{Rect, Segment, clip_segment_to_rect};
use crate::sim::{ArenaState, Camera, Craft, CraftKind, CraftState, GameEvent, Particle, TickInput};

/// Something the player can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    TurnLeft,
    TurnRight,
    ThrustForward,
    ThrustReverse,
    Fire,
    Quit,
}

/// Current held/pressed state of the controls
pub trait InputSource {
    fn held(&self, intent: Intent) -> bool;
}

impl InputSource for TickInput {
    fn held(&self, intent: Intent) -> bool {
        match intent {
            Intent::TurnLeft => self.turn_left,
            Intent::TurnRight => self.turn_right,
            Intent::ThrustForward => self.thrust_forward,
            Intent::ThrustReverse => self.thrust_reverse,
            Intent::Fire => self.fire,
            Intent::Quit => self.quit,
        }
    }
}

impl InputSource for HashSet<Intent> {
    fn held(&self, intent: Intent) -> bool {
        self.contains(&intent)
    }
}

/// Snapshot an input source into one tick's worth of intents
pub fn read_intents<I: InputSource + ?Sized>(source: &I) -> TickInput {
    TickInput {
        turn_left: source.held(Intent::TurnLeft),
        turn_right: source.held(Intent::TurnRight),
        thrust_forward: source.held(Intent::ThrustForward),
        thrust_reverse: source.held(Intent::ThrustReverse),
        fire: source.held(Intent::Fire),
        quit: source.held(Intent::Quit),
    }
}

/// A craft to blit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CraftSprite {
    pub kind: CraftKind,
    pub state: CraftState,
    /// Center on screen
    pub screen: Vec2,
    /// Rotation strip frame
    pub frame: u32,
}

/// Numbers for the status readouts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusReport {
    pub player_score: u32,
    pub player_shields: i32,
    pub player_charge: f32,
    pub opponent_score: u32,
    pub opponent_shields: i32,
}

/// Blips for the radar panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarReport {
    pub player: Vec2,
    /// Hidden on the frame the opponent is replaced
    pub opponent: Option<Vec2>,
}

/// Receives everything a front end needs to show one frame.
///
/// Calls arrive in draw order. Every method defaults to doing nothing, so a
/// sink implements only what it shows.
#[allow(unused_variables)]
pub trait FrameSink {
    /// Tiles for one parallax layer, back layer first
    fn background(&mut self, layer: LayerKind, tiles: &[TilePlacement]) {}

    /// Live particles in world space; culling is up to the sink
    fn particles(&mut self, particles: &[Particle], camera: &Camera) {}

    /// A live beam, already clipped to the screen
    fn beam(&mut self, owner: CraftKind, segment: Segment) {}

    fn craft(&mut self, sprite: &CraftSprite) {}

    fn status(&mut self, report: &StatusReport) {}

    fn radar(&mut self, report: &RadarReport) {}

    /// Status line text
    fn message(&mut self, text: &str) {}

    fn event(&mut self, event: &GameEvent) {}
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {}

/// Emit one frame of requests for the arena
pub fn present<S: FrameSink + ?Sized>(
    state: &ArenaState,
    starfield: &Starfield,
    events: &[GameEvent],
    sink: &mut S,
) {
    let tuning = &state.tuning;
    let camera = &state.camera;
    let viewport = tuning.viewport_size();

    sink.background(LayerKind::Back, &starfield.back.layout(camera, viewport));
    sink.background(LayerKind::Front, &starfield.front.layout(camera, viewport));
    sink.particles(state.particles.as_slice(), camera);

    let screen = Rect::from_size(viewport);
    for craft in [&state.opponent, &state.player] {
        if let Some(beam) = craft.beam(tuning) {
            let on_screen = beam.translated(-camera.pos);
            if let Some(clipped) = clip_segment_to_rect(on_screen, &screen) {
                sink.beam(craft.kind, clipped);
            }
        }
    }

    if !state.is_respawning() {
        draw_craft(&state.player, camera, state, sink);
    }
    if !state.opponent_respawn_pending {
        draw_craft(&state.opponent, camera, state, sink);
    }

    sink.status(&StatusReport {
        player_score: state.player.score,
        player_shields: state.player.shields,
        player_charge: state.player.charge,
        opponent_score: state.opponent.score,
        opponent_shields: state.opponent.shields,
    });

    let world = tuning.world_size();
    let panel = Vec2::splat(RADAR_SIZE);
    sink.radar(&RadarReport {
        player: radar_blip(state.player.pos, world, panel),
        opponent: (!state.opponent_respawn_pending)
            .then(|| radar_blip(state.opponent.pos, world, panel)),
    });

    for event in events {
        if let GameEvent::Message(text) = event {
            sink.message(text);
        }
        sink.event(event);
    }
}

fn draw_craft<S: FrameSink + ?Sized>(craft: &Craft, camera: &Camera, state: &ArenaState, sink: &mut S) {
    if !camera.craft_on_screen(craft.pos, &state.tuning) {
        return;
    }
    sink.craft(&CraftSprite {
        kind: craft.kind,
        state: craft.state,
        screen: camera.to_screen(craft.pos),
        frame: craft.sprite_frame(),
    });
}
