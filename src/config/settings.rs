//! Configuration settings for the service controller.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ControlError;
use crate::service::ControllerConfig;

/// Default location of the settings file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/unitctl/unitctl.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub controller: ControllerSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Controller configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerSettings {
    /// Path to the service control binary.
    #[serde(default = "default_binary_path")]
    pub binary_path: PathBuf,
    /// Per-invocation timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Execute `disable` instead of only composing the command.
    #[serde(default)]
    pub execute_on_disable: bool,
    /// Services the controller may act on. Empty allows any service.
    #[serde(default)]
    pub allowed_services: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_binary_path() -> PathBuf {
    PathBuf::from("/bin/systemctl")
}

fn default_timeout() -> u64 {
    60
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            binary_path: default_binary_path(),
            timeout_seconds: default_timeout(),
            execute_on_disable: false,
            allowed_services: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ControlError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ControlError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        Self::from_toml_str(&content).map_err(|e| ControlError::Config {
            message: format!("Invalid config file '{}': {}", path.display(), e),
        })
    }

    /// Load settings from `path`, or fall back to defaults when `path` is
    /// the default location and does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ControlError> {
        let path = path.as_ref();
        if path == Path::new(DEFAULT_CONFIG_PATH) && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ControlError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ControlError::Config {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ControlError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ControlError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(ControlError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        if self.controller.binary_path.as_os_str().is_empty() {
            return Err(ControlError::Config {
                message: "controller.binary_path cannot be empty".to_string(),
            });
        }

        if self.controller.timeout_seconds == 0 {
            return Err(ControlError::Config {
                message: "controller.timeout_seconds must be greater than zero".to_string(),
            });
        }

        if self.controller.allowed_services.iter().any(|s| s.is_empty()) {
            return Err(ControlError::Config {
                message: "controller.allowed_services cannot contain empty names".to_string(),
            });
        }

        Ok(())
    }

    /// Build the controller configuration from these settings.
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            binary_path: self.controller.binary_path.clone(),
            timeout: Duration::from_secs(self.controller.timeout_seconds),
            execute_on_disable: self.controller.execute_on_disable,
            allowed_services: self.controller.allowed_services.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.controller.binary_path, PathBuf::from("/bin/systemctl"));
        assert_eq!(settings.controller.timeout_seconds, 60);
        assert!(!settings.controller.execute_on_disable);
        assert!(settings.controller.allowed_services.is_empty());
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.logging.format, "pretty");
    }

    #[test]
    fn test_full_settings() {
        let settings = Settings::from_toml_str(
            r#"
            [controller]
            binary_path = "/usr/bin/systemctl"
            timeout_seconds = 15
            execute_on_disable = true
            allowed_services = ["nginx", "postgresql"]

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        let config = settings.controller_config();
        assert_eq!(config.binary_path, PathBuf::from("/usr/bin/systemctl"));
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(config.execute_on_disable);
        assert_eq!(config.allowed_services, vec!["nginx", "postgresql"]);
    }

    #[test]
    fn test_invalid_log_level() {
        let err = Settings::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_invalid_log_format() {
        let err = Settings::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(err.to_string().contains("Invalid log format"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Settings::from_toml_str("[controller]\ntimeout_seconds = 0\n").unwrap_err();
        assert!(matches!(err, ControlError::Config { .. }));
    }

    #[test]
    fn test_empty_binary_path_rejected() {
        assert!(Settings::from_toml_str("[controller]\nbinary_path = \"\"\n").is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(Settings::from_toml_str("[controller\n").is_err());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_or_default(dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unitctl.toml");
        std::fs::write(&path, "[controller]\nexecute_on_disable = true\n").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert!(settings.controller.execute_on_disable);
    }
}
