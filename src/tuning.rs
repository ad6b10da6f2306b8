//! Data-driven game balance
//!
//! Every number the simulation reads lives here. Defaults reproduce the
//! shipped balance; a JSON file may override any subset of fields.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::SpawnKind;

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed tuning file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("tuning value `{name}` is invalid: {reason}")]
    InvalidValue { name: &'static str, reason: String },
    #[error("drop weight for {kind} must be finite and non-negative, got {weight}")]
    InvalidWeight { kind: String, weight: f32 },
    #[error("spawn catalog is empty or every drop weight is zero")]
    EmptyCatalog,
}

/// Relative spawn probabilities for each catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropWeights {
    pub single_block: f32,
    pub double_block: f32,
    pub spike: f32,
    pub dead_bush: f32,
    /// Shared by every enemy type
    pub enemy: f32,
    pub coin: f32,
    pub coin_bag: f32,
    pub emerald: f32,
    pub ruby: f32,
    pub sapphire: f32,
    pub health: f32,
    pub sprint: f32,
    pub score_boost: f32,
    pub shield: f32,
}

/// Weight used for kinds that were never given one
pub const DEFAULT_DROP_WEIGHT: f32 = 1.0;

impl Default for DropWeights {
    fn default() -> Self {
        Self {
            single_block: 2.0,
            double_block: 1.8,
            spike: 1.6,
            dead_bush: 1.7,
            enemy: 1.78,
            coin: 0.8,
            coin_bag: 0.5,
            emerald: 0.25,
            ruby: 0.15,
            sapphire: 0.2,
            health: 0.05,
            sprint: 0.1,
            score_boost: DEFAULT_DROP_WEIGHT,
            shield: DEFAULT_DROP_WEIGHT,
        }
    }
}

/// Numeric configuration table consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speed ===
    /// Scroll speed at session start (pixels per frame)
    pub game_speed: f32,
    /// Normal scroll speed cap
    pub max_game_speed: f32,
    /// Per-frame speed ramp
    pub game_speed_increment: f32,
    /// Speed cap while sprinting
    pub sprint_max_game_speed: f32,
    /// Per-frame ramp while sprinting
    pub sprint_speed_increment: f32,
    /// Per-frame decay back to the pre-sprint speed
    pub sprint_speed_decay: f32,
    /// Jump speed = game speed * factor
    pub jump_speed_factor: f32,

    // === Animation (frame index advance per tick) ===
    pub attack_animation_speed: f32,
    pub hit_animation_speed: f32,
    pub shield_animation_speed: f32,
    /// Multiplied by the game speed
    pub run_animation_speed: f32,
    pub explosion_animation_speed: f32,

    // === Player ===
    pub max_health: u32,

    // === Spawning ===
    /// Ceiling for the concurrent sprite threshold (starts at 1)
    pub max_sprites_on_screen: f32,
    /// Floor for the spacing factor
    pub min_sprites_distance_factor: f32,
    /// Starting value and ceiling for the spacing factor
    pub max_sprites_distance_factor: f32,
    pub sprites_on_screen_increment: f32,
    pub sprites_distance_decrement: f32,
    pub drop_weights: DropWeights,
    /// Kinds spawned anywhere across the band instead of against a wall
    pub band_placed: Vec<SpawnKind>,

    // === Scoring ===
    pub kill_score: u64,
    /// Awarded for every hazard that scrolls past untouched
    pub pass_score: u64,

    // === Ability durations (frames) ===
    pub sprint_duration: u64,
    /// Shield granted alongside a sprint; outlives the sprint itself
    pub sprint_shield_duration: u64,
    pub shield_duration: u64,
    pub score_boost_duration: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        let fps = crate::consts::FPS as u64;
        Self {
            game_speed: 4.0,
            max_game_speed: 6.0,
            game_speed_increment: 0.001,
            sprint_max_game_speed: 10.0,
            sprint_speed_increment: 0.02,
            sprint_speed_decay: 0.02,
            jump_speed_factor: 1.5,

            attack_animation_speed: 0.15,
            hit_animation_speed: 0.1,
            shield_animation_speed: 0.1,
            run_animation_speed: 0.03,
            explosion_animation_speed: 0.3,

            max_health: 3,

            max_sprites_on_screen: 4.0,
            min_sprites_distance_factor: 5.0,
            max_sprites_distance_factor: 12.0,
            sprites_on_screen_increment: 0.005,
            sprites_distance_decrement: 0.002,
            drop_weights: DropWeights::default(),
            band_placed: Vec::new(),

            kill_score: 25,
            pass_score: 10,

            sprint_duration: 5 * fps,
            sprint_shield_duration: 5 * fps + fps / 2,
            shield_duration: 8 * fps,
            score_boost_duration: 10 * fps,
        }
    }
}

impl Tuning {
    /// Load a tuning file and validate it
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Parse without validating; missing fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reject tables the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("game_speed", self.game_speed),
            ("max_game_speed", self.max_game_speed),
            ("sprint_max_game_speed", self.sprint_max_game_speed),
            ("jump_speed_factor", self.jump_speed_factor),
            ("attack_animation_speed", self.attack_animation_speed),
            ("hit_animation_speed", self.hit_animation_speed),
            ("explosion_animation_speed", self.explosion_animation_speed),
            ("max_sprites_on_screen", self.max_sprites_on_screen),
            ("min_sprites_distance_factor", self.min_sprites_distance_factor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(name, format!("must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("game_speed_increment", self.game_speed_increment),
            ("sprint_speed_increment", self.sprint_speed_increment),
            ("sprint_speed_decay", self.sprint_speed_decay),
            ("shield_animation_speed", self.shield_animation_speed),
            ("run_animation_speed", self.run_animation_speed),
            ("sprites_on_screen_increment", self.sprites_on_screen_increment),
            ("sprites_distance_decrement", self.sprites_distance_decrement),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(name, format!("must be non-negative, got {value}")));
            }
        }

        if self.max_game_speed < self.game_speed {
            return Err(invalid("max_game_speed", "below the starting game_speed".into()));
        }
        if self.sprint_max_game_speed < self.max_game_speed {
            return Err(invalid("sprint_max_game_speed", "below max_game_speed".into()));
        }
        if self.max_sprites_on_screen < 1.0 {
            return Err(invalid("max_sprites_on_screen", "must allow at least one sprite".into()));
        }
        if self.max_sprites_distance_factor < self.min_sprites_distance_factor {
            return Err(invalid(
                "max_sprites_distance_factor",
                "below min_sprites_distance_factor".into(),
            ));
        }
        if self.max_health == 0 {
            return Err(invalid("max_health", "must be at least 1".into()));
        }

        let durations = [
            ("sprint_duration", self.sprint_duration),
            ("sprint_shield_duration", self.sprint_shield_duration),
            ("shield_duration", self.shield_duration),
            ("score_boost_duration", self.score_boost_duration),
        ];
        for (name, frames) in durations {
            if frames == 0 {
                return Err(invalid(name, "must last at least one frame".into()));
            }
        }

        // A sprinting player is always shielded
        if self.sprint_shield_duration <= self.sprint_duration {
            return Err(invalid(
                "sprint_shield_duration",
                format!(
                    "must outlast sprint_duration ({} frames), got {}",
                    self.sprint_duration, self.sprint_shield_duration
                ),
            ));
        }

        // Builds the cumulative table, which checks every weight
        crate::sim::Catalog::new(&self.drop_weights)?;
        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidValue { name, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_game_speed": 8.0, "drop_weights": { "coin": 3.0 } }"#)
            .expect("parse");
        assert_eq!(tuning.max_game_speed, 8.0);
        assert_eq!(tuning.game_speed, 4.0);
        assert_eq!(tuning.drop_weights.coin, 3.0);
        assert_eq!(tuning.drop_weights.single_block, 2.0);
        assert!(tuning.band_placed.is_empty());
    }

    #[test]
    fn test_band_placed_kinds_from_json() {
        let tuning = Tuning::from_json(r#"{ "band_placed": ["Coin", "Bat"] }"#).expect("parse");
        assert_eq!(tuning.band_placed, vec![SpawnKind::Coin, SpawnKind::Bat]);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_inverted_spacing_rejected() {
        let tuning = Tuning {
            min_sprites_distance_factor: 13.0,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::InvalidValue {
                name: "max_sprites_distance_factor",
                ..
            })
        ));
    }

    #[test]
    fn test_sprint_shield_must_outlast_sprint() {
        let tuning = Tuning {
            sprint_duration: 600,
            sprint_shield_duration: 100,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::InvalidValue {
                name: "sprint_shield_duration",
                ..
            })
        ));
        assert!(crate::sim::GameState::new(1, tuning).is_err());

        let equal = Tuning {
            sprint_duration: 600,
            sprint_shield_duration: 600,
            ..Tuning::default()
        };
        assert!(equal.validate().is_err());
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let zero = DropWeights {
            single_block: 0.0,
            double_block: 0.0,
            spike: 0.0,
            dead_bush: 0.0,
            enemy: 0.0,
            coin: 0.0,
            coin_bag: 0.0,
            emerald: 0.0,
            ruby: 0.0,
            sapphire: 0.0,
            health: 0.0,
            sprint: 0.0,
            score_boost: 0.0,
            shield: 0.0,
        };
        let tuning = Tuning {
            drop_weights: zero,
            ..Tuning::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::EmptyCatalog)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut tuning = Tuning::default();
        tuning.drop_weights.spike = -1.0;
        assert!(matches!(tuning.validate(), Err(ConfigError::InvalidWeight { .. })));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("soul_hunter_missing_tuning_file.json");
        assert!(matches!(Tuning::load(&path), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "soul_hunter_bad_tuning_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").expect("write temp file");
        let result = Tuning::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
