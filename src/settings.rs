//! Game settings and tunables
//!
//! Loaded from JSON; every field falls back to the default in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{Error, Result};

/// Game settings/tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed (avalanche delay RNG)
    pub seed: u64,

    // === Level ===
    /// Player spawn cell
    pub start: (i32, i32),
    /// Reward credited per coin
    pub coin_value: u64,

    // === Ledger ===
    /// Feet shown at the top of the level
    pub max_feet: f64,

    // === Avalanche ===
    pub avalanche_delay_min_ms: u64,
    pub avalanche_delay_max_ms: u64,
    pub collapse_interval_start_ms: u64,
    pub collapse_interval_step_ms: u64,
    pub collapse_interval_floor_ms: u64,
    pub collapse_interval_ceiling_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,

            start: (START_X, START_Y),
            coin_value: COIN_VALUE,

            max_feet: MAX_FEET,

            avalanche_delay_min_ms: AVALANCHE_DELAY_MIN_MS,
            avalanche_delay_max_ms: AVALANCHE_DELAY_MAX_MS,
            collapse_interval_start_ms: COLLAPSE_INTERVAL_START_MS,
            collapse_interval_step_ms: COLLAPSE_INTERVAL_STEP_MS,
            collapse_interval_floor_ms: COLLAPSE_INTERVAL_FLOOR_MS,
            collapse_interval_ceiling_ms: COLLAPSE_INTERVAL_CEILING_MS,
        }
    }
}

impl Settings {
    /// Default settings with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tunables that would break the avalanche or ledger math
    pub fn validate(&self) -> Result<()> {
        if self.avalanche_delay_min_ms > self.avalanche_delay_max_ms {
            return Err(Error::InvalidSettings(format!(
                "avalanche delay range is empty ({}..={})",
                self.avalanche_delay_min_ms, self.avalanche_delay_max_ms
            )));
        }
        if self.collapse_interval_floor_ms == 0 {
            return Err(Error::InvalidSettings(
                "collapse interval floor must be positive".into(),
            ));
        }
        if self.collapse_interval_floor_ms > self.collapse_interval_ceiling_ms {
            return Err(Error::InvalidSettings(format!(
                "collapse interval floor {} exceeds ceiling {}",
                self.collapse_interval_floor_ms, self.collapse_interval_ceiling_ms
            )));
        }
        if !self.max_feet.is_finite() || self.max_feet < 0.0 {
            return Err(Error::InvalidSettings(format!(
                "max_feet must be a non-negative number, got {}",
                self.max_feet
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.coin_value, 150);
        assert_eq!(settings.start, (1, 1));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "coin_value": 200 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.coin_value, 200);
        assert_eq!(settings.max_feet, MAX_FEET);
        assert_eq!(settings.avalanche_delay_min_ms, AVALANCHE_DELAY_MIN_MS);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings::with_seed(42);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let err = Settings::from_json(
            r#"{ "avalanche_delay_min_ms": 500, "avalanche_delay_max_ms": 100 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));

        let err = Settings::from_json(
            r#"{ "collapse_interval_floor_ms": 2000, "collapse_interval_ceiling_ms": 1000 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(Error::Json(_))
        ));
    }
}
