//! Tunable rules, loaded from TOML.
//!
//! Every field has a default matching the shipped game, so an empty file (or no
//! file at all) yields the standard rules.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a rules file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Complete rules configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub creation: CreationRules,
    pub progression: ProgressionRules,
    pub stamina: StaminaRules,

    /// Event dispatched when a new game starts.
    pub opening_event: String,

    /// Ending shown when the player falls in combat.
    pub defeat_ending: String,

    /// Storage key the save blob lives under.
    pub save_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            creation: CreationRules::default(),
            progression: ProgressionRules::default(),
            stamina: StaminaRules::default(),
            opening_event: "start_game".to_string(),
            defeat_ending: "be_forgotten".to_string(),
            save_key: "ForgottenThroneSave".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file, falling back to defaults if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Character creation limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreationRules {
    /// Points handed out at character creation.
    pub points: i32,
    /// Highest value a single attribute can reach during creation.
    pub attribute_cap: i32,
    pub starting_hp: i32,
    pub starting_age: u32,
    pub first_level_exp: i32,
}

impl Default for CreationRules {
    fn default() -> Self {
        Self {
            points: 50,
            attribute_cap: 100,
            starting_hp: 50,
            starting_age: 1,
            first_level_exp: 25,
        }
    }
}

/// Ageing and levelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionRules {
    /// Ages at which stages 1, 2 and 3 hand over to the next stage.
    pub stage_ages: [u32; 3],
    /// Multiplier applied to the experience threshold on level-up.
    pub level_up_factor: f64,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            stage_ages: [15, 23, 38],
            level_up_factor: 1.5,
        }
    }
}

/// Stamina pool and real-time regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaRules {
    pub base: i32,
    /// Real milliseconds per regenerated point.
    pub regen_interval_ms: u64,
}

impl Default for StaminaRules {
    fn default() -> Self {
        Self {
            base: 100,
            regen_interval_ms: 10_000,
        }
    }
}
