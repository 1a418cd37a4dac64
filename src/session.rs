//! Session orchestration
//!
//! A `Session` owns the arena and the starfield, turns wall-clock frame
//! lengths into time scale, runs one tick per frame and feeds the results to
//! a [`FrameSink`].

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::consts::MS_PER_TIME_UNIT;
use crate::present::{FrameSink, InputSource, present, read_intents};
use crate::sim::{ArenaState, Starfield, tick};
use crate::tuning::Tuning;

/// Whether the host should keep scheduling frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Totals reported when a session ends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub seed: u64,
    pub frames: u64,
    /// Wall-clock time since the session started
    pub elapsed: Duration,
    /// Sum of the frame lengths fed to the simulation
    pub simulated: Duration,
    /// Frames per wall-clock second
    pub fps: f64,
    pub player_score: u32,
    pub opponent_score: u32,
}

pub struct Session {
    state: ArenaState,
    starfield: Starfield,
    frames: u64,
    started: Instant,
    last_frame: Instant,
    simulated: Duration,
}

/// Frame length to simulation time scale
pub fn time_scale(elapsed: Duration) -> f32 {
    let millis = elapsed.as_micros() as f32 / 1000.0;
    millis / MS_PER_TIME_UNIT
}

impl Session {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut state = ArenaState::new(tuning, seed);
        let starfield = Starfield::new(&state.tuning.parallax, &mut state.rng);
        let now = Instant::now();

        log::info!(
            "Session started with seed {} ({} particles, {} effects)",
            seed,
            state.particles.capacity(),
            state.tuning.effects.as_str()
        );

        Self {
            state,
            starfield,
            frames: 0,
            started: now,
            last_frame: now,
            simulated: Duration::ZERO,
        }
    }

    pub fn state(&self) -> &ArenaState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ArenaState {
        &mut self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame that lasted `elapsed`
    pub fn advance<I, S>(&mut self, elapsed: Duration, input: &I, sink: &mut S) -> Control
    where
        I: InputSource + ?Sized,
        S: FrameSink + ?Sized,
    {
        let input = read_intents(input);
        let outcome = tick(&mut self.state, &input, time_scale(elapsed));
        self.frames += 1;
        self.simulated += elapsed;

        let events = self.state.drain_events();
        present(&self.state, &self.starfield, &events, sink);

        if outcome.quit {
            log::info!("Quit requested after {} frames", self.frames);
            Control::Quit
        } else {
            Control::Continue
        }
    }

    /// Run one frame timed by the wall clock
    pub fn frame<I, S>(&mut self, input: &I, sink: &mut S) -> Control
    where
        I: InputSource + ?Sized,
        S: FrameSink + ?Sized,
    {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.advance(elapsed, input, sink)
    }

    /// End the session and report totals
    pub fn finish(self) -> SessionReport {
        let elapsed = self.started.elapsed();
        let secs = elapsed.as_secs_f64();
        let fps = if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        };

        let report = SessionReport {
            seed: self.state.seed,
            frames: self.frames,
            elapsed,
            simulated: self.simulated,
            fps,
            player_score: self.state.player.score,
            opponent_score: self.state.opponent.score,
        };
        log::info!(
            "Session over: {} frames in {:.2}s ({:.1} fps), score {}-{}",
            report.frames,
            secs,
            report.fps,
            report.player_score,
            report.opponent_score
        );
        report
    }
}
