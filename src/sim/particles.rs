//! Explosion particles
//!
//! A bounded pool of single-pixel sparks. Each spark flies in a straight line
//! and fades one color step per tick; a spark that has faded to black is
//! swap-removed, so the pool never reorders live sparks in any way that
//! matters to the renderer.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::heading_vector;

/// Particle color; alpha is implicitly opaque
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const YELLOW: Self = Self::new(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Sum of the three channels
    #[inline]
    pub fn intensity(&self) -> u16 {
        self.r as u16 + self.g as u16 + self.b as u16
    }

    /// Step every channel one unit toward black
    #[inline]
    pub fn fade(&mut self) {
        self.r = self.r.saturating_sub(1);
        self.g = self.g.saturating_sub(1);
        self.b = self.b.saturating_sub(1);
    }
}

/// A single spark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// World position
    pub pos: Vec2,
    /// Distance travelled per tick
    pub speed: f32,
    /// Direction of travel (degrees)
    pub heading: f32,
    pub color: Rgb,
}

/// One ring of sparks within an explosion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub color: Rgb,
    /// Exclusive upper bound on spark speed
    pub energy: u32,
    pub count: usize,
}

/// Canned explosion effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Explosion {
    /// Small flash where a beam strikes a craft
    PhaserHit,
    /// Large blast when a craft is destroyed
    ShipDestroyed,
}

impl Explosion {
    pub fn bursts(&self) -> [Burst; 3] {
        match self {
            Explosion::PhaserHit => [
                Burst { color: Rgb::WHITE, energy: 10, count: 30 },
                Burst { color: Rgb::RED, energy: 5, count: 10 },
                Burst { color: Rgb::YELLOW, energy: 2, count: 5 },
            ],
            Explosion::ShipDestroyed => [
                Burst { color: Rgb::WHITE, energy: 15, count: 300 },
                Burst { color: Rgb::RED, energy: 10, count: 100 },
                Burst { color: Rgb::YELLOW, energy: 5, count: 50 },
            ],
        }
    }
}

/// Fixed-capacity particle pool
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.capacity
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Add a particle; silently dropped when the pool is full
    pub fn push(&mut self, particle: Particle) -> bool {
        if self.is_full() {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Spray up to `count` sparks from `origin` in random directions.
    ///
    /// Each spark gets an integer heading in [0, 360) and an integer speed in
    /// [0, energy). Returns how many sparks actually fit in the pool.
    pub fn emit<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Vec2,
        color: Rgb,
        energy: u32,
        count: usize,
    ) -> usize {
        let mut emitted = 0;
        for _ in 0..count {
            if self.is_full() {
                break;
            }
            let heading = rng.random_range(0..360u32) as f32;
            let speed = if energy > 0 {
                rng.random_range(0..energy) as f32
            } else {
                0.0
            };
            self.particles.push(Particle {
                pos: origin,
                speed,
                heading,
                color,
            });
            emitted += 1;
        }
        emitted
    }

    /// Spawn every burst of a canned explosion at `origin`
    pub fn explode<R: Rng + ?Sized>(&mut self, rng: &mut R, origin: Vec2, explosion: Explosion) {
        for burst in explosion.bursts() {
            self.emit(rng, origin, burst.color, burst.energy, burst.count);
        }
    }

    /// Advance every particle one tick: move, fade, cull the dark ones
    pub fn step(&mut self) {
        let mut i = 0;
        while i < self.particles.len() {
            let particle = &mut self.particles[i];
            particle.pos += (heading_vector(particle.heading) * particle.speed).trunc();
            particle.color.fade();

            if particle.color.intensity() == 0 {
                // The last particle moves into slot i; examine it next
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}
