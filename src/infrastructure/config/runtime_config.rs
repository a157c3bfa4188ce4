use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::error::DomainError;

/// Polling faster than this only burns CPU on D-Bus round trips
pub const MIN_THEME_POLL_INTERVAL_MS: u64 = 250;

/// Runtime options of the settings core itself (not the user's GlobalConfig)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
    pub event_bus: EventBusConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive
    pub level: String,
    /// Also write a daily rotating log file under the config dir
    pub file_enabled: bool,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub theme_poll_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBusConfig {
    pub capacity: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_name: "settings.log".to_string(),
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            theme_poll_interval_ms: 2000,
        }
    }
}

impl EnvironmentConfig {
    pub fn theme_poll_interval(&self) -> Duration {
        Duration::from_millis(self.theme_poll_interval_ms.max(MIN_THEME_POLL_INTERVAL_MS))
    }
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.logging.level.trim().is_empty() {
            return Err(DomainError::Config("logging.level must not be empty".to_string()));
        }
        if self.logging.file_enabled && self.logging.file_name.trim().is_empty() {
            return Err(DomainError::Config(
                "logging.file_name is required when file logging is enabled".to_string(),
            ));
        }
        if self.event_bus.capacity == 0 {
            return Err(DomainError::Config("event_bus.capacity must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_interval_is_clamped() {
        let config = EnvironmentConfig {
            theme_poll_interval_ms: 0,
        };
        assert_eq!(
            config.theme_poll_interval(),
            Duration::from_millis(MIN_THEME_POLL_INTERVAL_MS)
        );
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = RuntimeConfig::default();
        assert!(config.validate().is_ok());

        config.event_bus.capacity = 0;
        assert!(matches!(config.validate(), Err(DomainError::Config(_))));
    }

    #[test]
    fn test_validate_requires_file_name_for_file_logging() {
        let mut config = RuntimeConfig::default();
        config.logging.file_enabled = true;
        config.logging.file_name = String::new();
        assert!(config.validate().is_err());
    }
}
