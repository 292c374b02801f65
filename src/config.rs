//! Engine Configuration
//!
//! Loaded from JSON; every field has a default so a config file only needs
//! the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::geometry::PlayField;
use crate::engine::input::Key;
use crate::error::ConfigError;

/// How movement is applied each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimeStep {
    /// Constant timestep: each frame moves an entity by exactly `speed`.
    #[default]
    PerFrame,
    /// Displacement is `speed * elapsed / reference_frame_nanos`, so a
    /// frame of exactly the reference length moves `speed` units.
    Scaled {
        /// Nominal frame length in nanoseconds
        reference_frame_nanos: u64,
    },
}

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Visible play-field used by the boundary monitor
    pub field: PlayField,
    /// Movement model
    pub time_step: TimeStep,
    /// Key that flips the scheduler's debug toggle
    pub debug_key: Key,
    /// Start with debug output enabled
    pub debug_on_start: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            field: PlayField::default(),
            time_step: TimeStep::default(),
            debug_key: Key::F1,
            debug_on_start: false,
        }
    }
}

impl EngineConfig {
    /// Config with a custom play-field and defaults elsewhere.
    pub fn with_field(width: f64, height: f64) -> Self {
        Self {
            field: PlayField::new(width, height),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Reject values the frame pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.field.is_valid() {
            return Err(ConfigError::InvalidPlayField {
                width: self.field.width,
                height: self.field.height,
            });
        }
        if let TimeStep::Scaled { reference_frame_nanos: 0 } = self.time_step {
            return Err(ConfigError::InvalidTimeStep);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "field": { "width": 40.0, "height": 40.0 } }"#)
            .unwrap();
        assert_eq!(config.field, PlayField::new(40.0, 40.0));
        assert_eq!(config.time_step, TimeStep::PerFrame);
        assert_eq!(config.debug_key, Key::F1);
    }

    #[test]
    fn test_scaled_time_step_parses() {
        let config = EngineConfig::from_json_str(
            r#"{ "time_step": { "mode": "scaled", "reference_frame_nanos": 16666667 } }"#,
        )
        .unwrap();
        assert_eq!(
            config.time_step,
            TimeStep::Scaled { reference_frame_nanos: 16_666_667 }
        );
    }

    #[test]
    fn test_invalid_field_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "field": { "width": 0.0, "height": 10.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPlayField { .. }));
    }

    #[test]
    fn test_zero_reference_frame_rejected() {
        let err = EngineConfig::from_json_str(
            r#"{ "time_step": { "mode": "scaled", "reference_frame_nanos": 0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeStep));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
