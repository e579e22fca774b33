//! Runtime configuration for the geotwin core.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the artifact output directory.
pub const ENV_ARTIFACT_DIR: &str = "GEOTWIN_ARTIFACT_DIR";

/// Environment variable overriding the sensor sample rate in Hz.
pub const ENV_SAMPLE_RATE_HZ: &str = "GEOTWIN_SAMPLE_RATE_HZ";

/// Configuration for the standard pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeotwinConfig {
    /// Directory where stages persist auxiliary artifacts.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
    /// Sample rate of the tower acceleration sensors, in Hz.
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: f64,
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_sample_rate_hz() -> f64 {
    100.0
}

impl Default for GeotwinConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
            sample_rate_hz: default_sample_rate_hz(),
        }
    }
}

impl GeotwinConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the environment, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidVar`] when a variable is set but holds
    /// an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var(ENV_ARTIFACT_DIR) {
            if dir.is_empty() {
                return Err(ConfigError::InvalidVar {
                    var: ENV_ARTIFACT_DIR.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            config.artifact_dir = PathBuf::from(dir);
        }

        if let Ok(rate) = std::env::var(ENV_SAMPLE_RATE_HZ) {
            config.sample_rate_hz = parse_sample_rate(&rate)?;
        }

        Ok(config)
    }
}

fn parse_sample_rate(raw: &str) -> Result<f64, ConfigError> {
    let rate: f64 = raw.parse().map_err(|_| ConfigError::InvalidVar {
        var: ENV_SAMPLE_RATE_HZ.to_string(),
        message: format!("'{raw}' is not a number"),
    })?;
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ConfigError::InvalidVar {
            var: ENV_SAMPLE_RATE_HZ.to_string(),
            message: format!("sample rate must be a finite positive number, got {rate}"),
        });
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeotwinConfig::default();
        assert_eq!(config.artifact_dir, PathBuf::from("artifacts"));
        assert!((config.sample_rate_hz - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_sample_rate_valid() {
        assert!((parse_sample_rate("256.5").unwrap() - 256.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_sample_rate_rejects_garbage() {
        assert!(parse_sample_rate("fast").is_err());
    }

    #[test]
    fn test_parse_sample_rate_rejects_non_positive() {
        assert!(parse_sample_rate("0").is_err());
        assert!(parse_sample_rate("-10").is_err());
        assert!(parse_sample_rate("inf").is_err());
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let config: GeotwinConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GeotwinConfig::default());
    }
}
