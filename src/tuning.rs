//! Game balance and arena dimensions
//!
//! Every named constant the simulation consumes lives here. Loaded from a
//! JSON file (missing fields fall back to defaults) or built in code.

use std::fmt;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::CraftKind;

/// Particle effect density presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EffectsPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl EffectsPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectsPreset::Low => "Low",
            EffectsPreset::Medium => "Medium",
            EffectsPreset::High => "High",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(EffectsPreset::Low),
            "medium" | "med" => Some(EffectsPreset::Medium),
            "high" => Some(EffectsPreset::High),
            _ => None,
        }
    }

    /// Particle pool capacity for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            EffectsPreset::Low => 1_000,
            EffectsPreset::Medium => 5_000,
            EffectsPreset::High => 10_000,
        }
    }
}

/// Thrust and speed envelope of one kind of craft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CraftLimits {
    pub forward_thrust: f32,
    pub reverse_thrust: f32,
    pub min_velocity: f32,
    pub max_velocity: f32,
}

impl CraftLimits {
    pub const WARRIOR: Self = Self {
        forward_thrust: 3.0,
        reverse_thrust: -1.0,
        min_velocity: -5.0,
        max_velocity: 15.0,
    };

    pub const DEVIL: Self = Self {
        forward_thrust: 3.0,
        reverse_thrust: -1.0,
        min_velocity: -5.0,
        max_velocity: 10.0,
    };
}

/// Opponent decision thresholds (world units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Closer than this to the player: break off and evade
    pub evade_distance: f32,
    /// Both axis distances to the evade point below this: resume attack
    pub resume_attack_distance: f32,
    /// Beyond this distance: full thrust
    pub full_thrust_distance: f32,
    /// Beyond this (and within full thrust distance): one-third thrust
    pub cruise_distance: f32,
    /// Within this distance: open fire
    pub fire_distance: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            evade_distance: 25.0,
            resume_attack_distance: 100.0,
            full_thrust_distance: 100.0,
            cruise_distance: 50.0,
            fire_distance: 200.0,
        }
    }
}

/// Starfield layer layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxTuning {
    /// Camera divisor for the distant layer
    pub back_factor: f32,
    /// Camera divisor for the near layer
    pub front_factor: f32,
    pub grid_width: usize,
    pub grid_height: usize,
    pub tile_width: f32,
    pub tile_height: f32,
    /// Number of distinct tile images per layer
    pub variants: u8,
}

impl Default for ParallaxTuning {
    fn default() -> Self {
        Self {
            back_factor: 4.0,
            front_factor: 2.0,
            grid_width: 100,
            grid_height: 100,
            tile_width: 64.0,
            tile_height: 64.0,
            variants: 4,
        }
    }
}

/// Complete arena tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Dimensions ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub world_width: f32,
    pub world_height: f32,
    pub craft_width: f32,
    pub craft_height: f32,
    /// Crafts may not come closer than this to the left and top edges
    pub border_margin: f32,
    /// Hard clamp for craft x at the right edge (defaults to the last world column)
    pub ship_limit_x: Option<f32>,

    // === Crafts ===
    pub warrior: CraftLimits,
    pub devil: CraftLimits,
    /// Player turn in degrees per unit of time scale
    pub player_turn_rate: f32,
    /// Opponent turn in degrees per tick
    pub ai_turn_rate: f32,
    pub ai: AiTuning,

    // === Phasers ===
    pub phaser_range: f32,
    pub phaser_hit_radius: f32,
    /// Damage the player's beam deals to the opponent
    pub phaser_damage: i32,
    /// Damage the opponent's beam deals to the player
    pub devil_phaser_damage: i32,
    pub phaser_fire_cost: f32,
    pub phaser_charge_max: f32,
    pub phaser_charge_rate: f32,
    /// Beam lifetime in time-scale units
    pub phaser_fire_time: f32,

    // === Respawn ===
    pub respawn_time: f32,
    pub invincible_time: f32,

    // === Effects ===
    pub effects: EffectsPreset,
    /// Overrides the preset's particle capacity
    pub particle_capacity: Option<usize>,
    pub parallax: ParallaxTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: 640.0,
            viewport_height: 480.0,
            world_width: 2000.0,
            world_height: 2000.0,
            craft_width: 96.0,
            craft_height: 96.0,
            border_margin: 40.0,
            ship_limit_x: None,

            warrior: CraftLimits::WARRIOR,
            devil: CraftLimits::DEVIL,
            player_turn_rate: 10.0,
            ai_turn_rate: 3.0,
            ai: AiTuning::default(),

            phaser_range: 400.0,
            phaser_hit_radius: 200.0,
            phaser_damage: 10,
            devil_phaser_damage: 2,
            phaser_fire_cost: 20.0,
            phaser_charge_max: 80.0,
            phaser_charge_rate: 20.0,
            phaser_fire_time: 5.0,

            respawn_time: 100.0,
            invincible_time: 100.0,

            effects: EffectsPreset::High,
            particle_capacity: None,
            parallax: ParallaxTuning::default(),
        }
    }
}

/// Failure to obtain a usable tuning
#[derive(Debug)]
pub enum TuningError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read tuning file {}: {}", path.display(), source)
            }
            Self::Parse(err) => write!(f, "malformed tuning JSON: {}", err),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{}`: {}", field, reason),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Load tuning from a file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("{}; using default tuning", err);
                Self::default()
            }
        }
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 {
            return invalid("viewport", "dimensions must be positive");
        }
        if self.world_width < self.viewport_width || self.world_height < self.viewport_height {
            return invalid("world", "must be at least as large as the viewport");
        }
        let limit_x = self.ship_limit_x();
        if self.border_margin < 0.0 || limit_x <= self.border_margin || limit_x >= self.world_width {
            return invalid("ship_limit_x", "must lie between the border margin and the world edge");
        }
        for (field, limits) in [("warrior", &self.warrior), ("devil", &self.devil)] {
            if limits.min_velocity > limits.max_velocity {
                return invalid(field, "min_velocity exceeds max_velocity");
            }
            if limits.reverse_thrust > limits.forward_thrust {
                return invalid(field, "reverse_thrust exceeds forward_thrust");
            }
        }
        if self.phaser_charge_max <= 0.0 || self.phaser_fire_cost < 0.0 {
            return invalid("phaser_charge_max", "charge budget must be positive");
        }
        if self.phaser_charge_rate < 0.0 {
            return invalid("phaser_charge_rate", "must not be negative");
        }
        if self.phaser_damage < 0 || self.devil_phaser_damage < 0 {
            return invalid("phaser_damage", "must not be negative");
        }
        if self.phaser_fire_time < 0.0 {
            return invalid("phaser_fire_time", "must not be negative");
        }
        if self.respawn_time < 0.0 || self.invincible_time < 0.0 {
            return invalid("respawn_time", "timers must not be negative");
        }
        if self.parallax.back_factor <= 0.0 || self.parallax.front_factor <= 0.0 {
            return invalid("parallax", "scroll factors must be positive");
        }
        if self.parallax.grid_width == 0
            || self.parallax.grid_height == 0
            || self.parallax.variants == 0
        {
            return invalid("parallax", "tile grid must not be empty");
        }
        if self.parallax.tile_width <= 0.0 || self.parallax.tile_height <= 0.0 {
            return invalid("parallax", "tile dimensions must be positive");
        }
        Ok(())
    }

    /// Thrust and speed envelope for a craft kind
    pub fn limits(&self, kind: CraftKind) -> &CraftLimits {
        match kind {
            CraftKind::Warrior => &self.warrior,
            CraftKind::Devil => &self.devil,
        }
    }

    /// Right-edge clamp for craft x
    pub fn ship_limit_x(&self) -> f32 {
        self.ship_limit_x.unwrap_or(self.world_width - 1.0)
    }

    /// Effective particle pool capacity
    pub fn max_particles(&self) -> usize {
        self.particle_capacity
            .unwrap_or_else(|| self.effects.max_particles())
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    pub fn viewport_size(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    pub fn craft_size(&self) -> Vec2 {
        Vec2::new(self.craft_width, self.craft_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "phaser_range": 250.0, "effects": "Low" }"#).unwrap();
        assert_eq!(tuning.phaser_range, 250.0);
        assert_eq!(tuning.max_particles(), 1_000);
        assert_eq!(tuning.world_width, 2000.0);
        assert_eq!(tuning.ai.evade_distance, 25.0);
    }

    #[test]
    fn test_particle_capacity_override() {
        let tuning = Tuning {
            particle_capacity: Some(42),
            ..Default::default()
        };
        assert_eq!(tuning.max_particles(), 42);
    }

    #[test]
    fn test_rejects_viewport_larger_than_world() {
        let err = Tuning::from_json(r#"{ "world_width": 320.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "world", .. }));
    }

    #[test]
    fn test_rejects_inverted_limits() {
        let mut tuning = Tuning::default();
        tuning.devil.min_velocity = 50.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "devil", .. })
        ));
    }

    #[test]
    fn test_rejects_negative_balance_values() {
        let err = Tuning::from_json(r#"{ "phaser_damage": -50 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "phaser_damage", .. }));

        let err = Tuning::from_json(r#"{ "devil_phaser_damage": -1 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "phaser_damage", .. }));

        let err = Tuning::from_json(r#"{ "phaser_charge_rate": -20.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "phaser_charge_rate", .. }));

        let err = Tuning::from_json(r#"{ "phaser_fire_time": -5.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "phaser_fire_time", .. }));

        let err = Tuning::from_json(r#"{ "invincible_time": -1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "respawn_time", .. }));

        // Zero is a legitimate setting
        assert!(Tuning::from_json(r#"{ "phaser_damage": 0, "respawn_time": 0.0 }"#).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "respawn_time": 40.0 }}"#).unwrap();

        let tuning = Tuning::load(file.path()).unwrap();
        assert_eq!(tuning.respawn_time, 40.0);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let tuning = Tuning::load_or_default(&dir.path().join("missing.json"));
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(EffectsPreset::from_name("MED"), Some(EffectsPreset::Medium));
        assert_eq!(EffectsPreset::from_name("ultra"), None);
        assert_eq!(EffectsPreset::Low.as_str(), "Low");
    }
}
