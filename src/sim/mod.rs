//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - One `tick` per frame, scaled by the frame's time scale
//! - No rendering, input or platform dependencies

pub mod ai;
pub mod camera;
pub mod craft;
pub mod geometry;
pub mod particles;
pub mod state;
pub mod tick;

pub use ai::{AiContext, AiMode, AiUpdate, Autopilot, evaluate, steer};
pub use camera::{Camera, LayerKind, ParallaxLayer, Starfield, TileGrid, TilePlacement, radar_blip};
pub use craft::{Craft, CraftKind, CraftState, DamageOutcome};
pub use geometry::{Rect, Segment, beam_endpoints, beam_hits, clip_segment_to_rect};
pub use particles::{Explosion, Particle, ParticlePool, Rgb};
pub use state::{ArenaState, GameEvent, MAX_PENDING_EVENTS};
pub use tick::{TickInput, TickOutcome, tick};
