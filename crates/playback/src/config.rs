use serde::{Deserialize, Serialize};
use std::path::Path;

use relay_kernel::DEFAULT_HISTORY_CAPACITY;

use crate::speed::Speed;

/// Errors from loading or validating playback configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("speed {0} is outside 0..=100")]
    SpeedOutOfRange(u8),
    #[error("frame interval must be at least 1 ms")]
    ZeroFrameInterval,
    #[error("history capacity must be positive")]
    ZeroHistoryCapacity,
}

/// Playback settings: dial position, tick interval and history length.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Speed dial, 0..=100.
    pub speed: u8,
    /// Time between ticks when driven by a timer.
    pub frame_interval_ms: u64,
    /// Number of recent throws kept for display.
    pub history_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: Speed::default().value(),
            frame_interval_ms: 16,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl PlaybackConfig {
    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.speed > Speed::MAX.value() {
            return Err(ConfigError::SpeedOutOfRange(self.speed));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::ZeroFrameInterval);
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        Ok(())
    }

    pub fn speed(&self) -> Speed {
        Speed::new(self.speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PlaybackConfig::default();
        assert_eq!(config.speed, 50);
        assert_eq!(config.frame_interval_ms, 16);
        assert_eq!(config.history_capacity, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PlaybackConfig::from_json_str(r#"{ "speed": 95 }"#).unwrap();
        assert_eq!(config.speed, 95);
        assert_eq!(config.frame_interval_ms, 16);
        assert_eq!(config.history_capacity, 15);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            PlaybackConfig::from_json_str(r#"{ "speed": 101 }"#),
            Err(ConfigError::SpeedOutOfRange(101))
        ));
        assert!(matches!(
            PlaybackConfig::from_json_str(r#"{ "frame_interval_ms": 0 }"#),
            Err(ConfigError::ZeroFrameInterval)
        ));
        assert!(matches!(
            PlaybackConfig::from_json_str(r#"{ "history_capacity": 0 }"#),
            Err(ConfigError::ZeroHistoryCapacity)
        ));
        assert!(matches!(
            PlaybackConfig::from_json_str("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PlaybackConfig::from_json_file("/nonexistent/relay.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
