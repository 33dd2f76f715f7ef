//! Serde support for runtime configuration (feature-gated)
//!
//! This module provides `Serialize` and `Deserialize` implementations for
//! [`RuntimeConfig`] when the `serde` feature is enabled. Deserialization
//! validates the configuration the same way [`RuntimeConfig::try_new`] does.
//!
//! # Example
//!
//! ```rust,ignore
//! use kleisli::RuntimeConfig;
//!
//! let config: RuntimeConfig = serde_json::from_str(r#"{"steps_per_turn": 4}"#).unwrap();
//! assert_eq!(config.steps_per_turn(), 4);
//!
//! let missing: RuntimeConfig = serde_json::from_str("{}").unwrap();
//! assert_eq!(missing, RuntimeConfig::default());
//!
//! let zero: Result<RuntimeConfig, _> = serde_json::from_str(r#"{"steps_per_turn": 0}"#);
//! assert!(zero.is_err());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::config::{RuntimeConfig, DEFAULT_STEPS_PER_TURN};

fn default_steps_per_turn() -> usize {
    DEFAULT_STEPS_PER_TURN
}

#[derive(Serialize, Deserialize)]
struct RawConfig {
    #[serde(default = "default_steps_per_turn")]
    steps_per_turn: usize,
}

impl Serialize for RuntimeConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawConfig {
            steps_per_turn: self.steps_per_turn(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuntimeConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawConfig::deserialize(deserializer)?;
        RuntimeConfig::try_new(raw.steps_per_turn).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize() {
        let config = RuntimeConfig::default().with_steps_per_turn(3);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"steps_per_turn":3}"#);
    }

    #[test]
    fn test_deserialize_success() {
        let config: RuntimeConfig = serde_json::from_str(r#"{"steps_per_turn":5}"#).unwrap();
        assert_eq!(config.steps_per_turn(), 5);
    }

    #[test]
    fn test_deserialize_missing_field_uses_default() {
        let config: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_deserialize_zero_fails() {
        let result: Result<RuntimeConfig, _> = serde_json::from_str(r#"{"steps_per_turn":0}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("at least 1"));
    }

    #[test]
    fn test_roundtrip() {
        let original = RuntimeConfig::default().with_steps_per_turn(16);
        let json = serde_json::to_string(&original).unwrap();
        let restored: RuntimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }
}
