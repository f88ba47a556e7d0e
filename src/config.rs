//! Game configuration, loadable from TOML.
//!
//! Every key is optional; an empty document gives the stock game.
//!
//! ```toml
//! speed_ms = 500
//! algorithm = "parallel"
//! seed = 42
//!
//! [rules.hazards.meteor]
//! chance = 0.01
//! damage = 60.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::domain::{Algorithm, ColonyRules};
use crate::persistence::DEFAULT_SAVE_KEY;

/// Milliseconds between generations unless configured otherwise
pub const DEFAULT_SPEED_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub speed_ms: u64,
    pub algorithm: Algorithm,
    /// Fixed seed for the hazard rolls; `None` seeds from the OS
    pub seed: Option<u64>,
    pub save_key: String,
    pub rules: ColonyRules,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            speed_ms: DEFAULT_SPEED_MS,
            algorithm: Algorithm::default(),
            seed: None,
            save_key: DEFAULT_SAVE_KEY.to_owned(),
            rules: ColonyRules::default(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stock;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_partial_overrides() {
        let cfg = GameConfig::from_toml_str(
            r#"
            speed_ms = 250
            algorithm = "parallel"
            seed = 7

            [rules]
            viable_max = 5

            [rules.decay]
            oxygen = 1.0

            [rules.hazards.meteor]
            chance = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.speed_ms, 250);
        assert_eq!(cfg.algorithm, Algorithm::Parallel);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.rules.viable_max, 5);
        // untouched rates and hazard fields keep their stock values
        assert_eq!(cfg.rules.decay, Stock { oxygen: 1.0, water: 3.0, energy: 4.0 });
        assert_eq!(cfg.rules.hazards.meteor.chance, 0.5);
        assert_eq!(cfg.rules.hazards.meteor.damage, 50.0);
        assert_eq!(cfg.rules.hazards.dust_storm, ColonyRules::default().hazards.dust_storm);
        assert_eq!(cfg.save_key, DEFAULT_SAVE_KEY);
    }

    #[test]
    fn test_hazard_damage_alone_keeps_chance() {
        let cfg = GameConfig::from_toml_str("[rules.hazards.radiation]\ndamage = 1.0\n").unwrap();
        assert_eq!(cfg.rules.hazards.radiation.chance, 0.02);
        assert_eq!(cfg.rules.hazards.radiation.damage, 1.0);
        assert_eq!(cfg.rules.decay, ColonyRules::default().decay);
    }

    #[test]
    fn test_empty_rule_tables_are_default() {
        let cfg = GameConfig::from_toml_str("[rules.decay]\n[rules.hazards]\n[rules.hazards.meteor]\n").unwrap();
        assert_eq!(cfg.rules, ColonyRules::default());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(matches!(GameConfig::from_toml_str("speed_ms = \"fast\""), Err(ConfigError::Toml(_))));
    }
}
