//! Phaser Arena headless runner
//!
//! Plays a session without a window: the player's craft follows a fixed
//! script (or the autopilot), frames are fed at a fixed length, and the
//! final totals are printed.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use phaser_arena::present::{CraftSprite, FrameSink};
use phaser_arena::sim::{Autopilot, CraftKind, GameEvent, Segment, TickInput};
use phaser_arena::{Control, EffectsPreset, Session, Tuning};

#[derive(Parser, Debug)]
#[command(name = "phaser-arena")]
#[command(about = "Run a headless Phaser Arena session and report the outcome")]
struct Cli {
    /// Seed for the session RNG
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 2_400)]
    frames: u64,
    /// Length of each frame in milliseconds
    #[arg(long, default_value_t = 25)]
    frame_ms: u64,
    /// Tuning JSON (defaults are used for missing fields)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Particle effects preset (low, medium or high); overrides the config
    #[arg(long)]
    effects: Option<String>,
    /// Let the autopilot fly the player's craft instead of the fixed script
    #[arg(long, default_value_t = false)]
    autopilot: bool,
    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Tallies what would have been drawn
#[derive(Debug, Default)]
struct CountingSink {
    beams: [u64; 2],
    kills: [u64; 2],
    crafts_drawn: u64,
    last_message: Option<String>,
}

fn slot(kind: CraftKind) -> usize {
    match kind {
        CraftKind::Warrior => 0,
        CraftKind::Devil => 1,
    }
}

impl FrameSink for CountingSink {
    fn beam(&mut self, owner: CraftKind, _segment: Segment) {
        self.beams[slot(owner)] += 1;
    }

    fn craft(&mut self, _sprite: &CraftSprite) {
        self.crafts_drawn += 1;
    }

    fn message(&mut self, text: &str) {
        log::info!("Status: {}", text);
        self.last_message = Some(text.to_string());
    }

    fn event(&mut self, event: &GameEvent) {
        if let GameEvent::CraftDestroyed { kind, .. } = event {
            self.kills[slot(*kind)] += 1;
        }
    }
}

/// Fixed maneuver: circle, fire whenever charged
fn scripted_input(frame: u64) -> TickInput {
    let phase = frame % 120;
    TickInput {
        turn_left: phase < 30,
        turn_right: (60..75).contains(&phase),
        thrust_forward: phase >= 20,
        fire: true,
        ..Default::default()
    }
}

fn parse_effects(name: &str) -> Result<EffectsPreset> {
    EffectsPreset::from_name(name)
        .with_context(|| format!("unknown effects preset `{}` (expected low, medium or high)", name))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut tuning = match &cli.config {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    if let Some(name) = &cli.effects {
        tuning.effects = parse_effects(name)?;
        log::info!("Effects preset: {}", tuning.effects.as_str());
    }

    log::info!(
        "Phaser Arena (headless) starting: {} frames of {} ms",
        cli.frames,
        cli.frame_ms
    );

    let mut session = Session::new(tuning, cli.seed);
    let mut sink = CountingSink::default();
    let autopilot = Autopilot::default();
    let frame_len = Duration::from_millis(cli.frame_ms);

    for frame in 0..cli.frames {
        let input = if cli.autopilot {
            let state = session.state();
            autopilot.plan(&state.player, state.opponent.pos, &state.tuning)
        } else {
            scripted_input(frame)
        };
        if session.advance(frame_len, &input, &mut sink) == Control::Quit {
            break;
        }
    }

    let report = session.finish();
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing session report")?
        );
    } else {
        println!("Frames:        {}", report.frames);
        println!("Simulated:     {:.1}s", report.simulated.as_secs_f64());
        println!("Wall time:     {:.3}s ({:.0} fps)", report.elapsed.as_secs_f64(), report.fps);
        println!("Score:         warrior {} / devil {}", report.player_score, report.opponent_score);
        println!("Beams drawn:   warrior {} / devil {}", sink.beams[0], sink.beams[1]);
        println!("Destroyed:     warrior {} / devil {}", sink.kills[0], sink.kills[1]);
        println!("Crafts drawn:  {}", sink.crafts_drawn);
        if let Some(message) = &sink.last_message {
            println!("Last message:  {}", message);
        }
    }

    Ok(())
}
