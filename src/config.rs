use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoadwatchError;
use crate::logging::{LogConfig, LogFormat, LogLevel};

/// Risk thresholds consumed by the analytics engine
///
/// Loaded once per request and passed explicitly into every calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSettings {
    /// ACWR above which risk is moderate (default: 1.3)
    pub acwr_moderate: Decimal,

    /// ACWR above which risk is high (default: 1.5)
    pub acwr_high: Decimal,

    /// Week-over-week load increase (%) that counts as a spike (default: 30)
    pub load_spike_percent: Decimal,

    /// Default analysis window in days (default: 30)
    pub default_days: u32,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        ThresholdSettings {
            acwr_moderate: dec!(1.3),
            acwr_high: dec!(1.5),
            load_spike_percent: dec!(30),
            default_days: 30,
        }
    }
}

impl ThresholdSettings {
    /// Check that the cutoffs are usable
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.acwr_moderate <= Decimal::ZERO || self.acwr_high <= Decimal::ZERO {
            return Err(LoadwatchError::Configuration(
                "ACWR thresholds must be positive".to_string(),
            ));
        }
        if self.acwr_moderate >= self.acwr_high {
            return Err(LoadwatchError::Configuration(format!(
                "acwr_moderate ({}) must be below acwr_high ({})",
                self.acwr_moderate, self.acwr_high
            )));
        }
        if self.load_spike_percent < Decimal::ZERO {
            return Err(LoadwatchError::Configuration(
                "load_spike_percent cannot be negative".to_string(),
            ));
        }
        if self.default_days == 0 {
            return Err(LoadwatchError::Configuration(
                "default_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    #[serde(default)]
    pub metadata: ConfigMetadata,

    /// Risk thresholds
    #[serde(default)]
    pub thresholds: ThresholdSettings,

    /// Logging preferences
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        let now = Utc::now();

        ConfigMetadata {
            version: "1.0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            metadata: ConfigMetadata::default(),
            thresholds: ThresholdSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

/// Keys accepted by `get_value` / `set_value`
pub const CONFIG_KEYS: &[&str] = &[
    "thresholds.acwr_moderate",
    "thresholds.acwr_high",
    "thresholds.load_spike_percent",
    "thresholds.default_days",
    "logging.level",
    "logging.format",
];

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config.thresholds.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".loadwatch")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults only when no file exists
    /// at the default location. An explicit path must exist, and a file that
    /// fails to parse or validate is always an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let config_path = Self::default_config_path();
                if config_path.exists() {
                    Self::load_from_file(&config_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read a single value by dotted key
    pub fn get_value(&self, key: &str) -> Option<String> {
        match key {
            "thresholds.acwr_moderate" => Some(self.thresholds.acwr_moderate.to_string()),
            "thresholds.acwr_high" => Some(self.thresholds.acwr_high.to_string()),
            "thresholds.load_spike_percent" => {
                Some(self.thresholds.load_spike_percent.to_string())
            }
            "thresholds.default_days" => Some(self.thresholds.default_days.to_string()),
            "logging.level" => Some(self.logging.level.to_filter()),
            "logging.format" => Some(format!("{:?}", self.logging.format).to_lowercase()),
            _ => None,
        }
    }

    /// Update a single value by dotted key, rejecting changes that leave
    /// the thresholds unusable
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut thresholds = self.thresholds.clone();

        match key {
            "thresholds.acwr_moderate" => thresholds.acwr_moderate = parse_decimal(key, value)?,
            "thresholds.acwr_high" => thresholds.acwr_high = parse_decimal(key, value)?,
            "thresholds.load_spike_percent" => {
                thresholds.load_spike_percent = parse_decimal(key, value)?
            }
            "thresholds.default_days" => {
                thresholds.default_days = value
                    .parse()
                    .with_context(|| format!("Invalid integer for {}: {}", key, value))?
            }
            "logging.level" => {
                self.logging.level = value.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
            }
            "logging.format" => {
                self.logging.format = value.parse::<LogFormat>().map_err(anyhow::Error::msg)?;
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }

        thresholds.validate()?;
        self.thresholds = thresholds;
        self.metadata.updated_at = Utc::now();
        Ok(())
    }
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal> {
    value
        .parse::<Decimal>()
        .with_context(|| format!("Invalid number for {}: {}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_thresholds() {
        let settings = ThresholdSettings::default();
        assert_eq!(settings.acwr_moderate, dec!(1.3));
        assert_eq!(settings.acwr_high, dec!(1.5));
        assert_eq!(settings.load_spike_percent, dec!(30));
        assert_eq!(settings.default_days, 30);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_threshold_validation() {
        let inverted = ThresholdSettings {
            acwr_moderate: dec!(1.6),
            ..ThresholdSettings::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(LoadwatchError::Configuration(_))
        ));

        let no_window = ThresholdSettings {
            default_days: 0,
            ..ThresholdSettings::default()
        };
        assert!(no_window.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(config.thresholds, deserialized.thresholds);
    }

    #[test]
    fn test_partial_thresholds_fill_defaults() {
        let toml_str = r#"
            [metadata]
            version = "1.0"
            created_at = "2024-09-01T00:00:00Z"
            updated_at = "2024-09-01T00:00:00Z"

            [thresholds]
            acwr_high = "1.6"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.thresholds.acwr_high, dec!(1.6));
        assert_eq!(config.thresholds.acwr_moderate, dec!(1.3));
        assert_eq!(config.thresholds.default_days, 30);
    }

    #[test]
    fn test_set_and_get_values() {
        let mut config = AppConfig::default();

        config.set_value("thresholds.load_spike_percent", "25").unwrap();
        assert_eq!(
            config.get_value("thresholds.load_spike_percent").as_deref(),
            Some("25")
        );

        // moderate above high is rejected and leaves the config untouched
        assert!(config.set_value("thresholds.acwr_moderate", "1.7").is_err());
        assert_eq!(config.thresholds.acwr_moderate, dec!(1.3));

        assert!(config.set_value("thresholds.unknown", "1").is_err());
        assert!(config.get_value("thresholds.unknown").is_none());

        config.set_value("logging.level", "debug").unwrap();
        assert_eq!(config.get_value("logging.level").as_deref(), Some("debug"));
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original_config = AppConfig::default();
        original_config.thresholds.acwr_high = dec!(1.7);

        original_config.save_to_file(&config_path).unwrap();
        let loaded_config = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded_config.thresholds.acwr_high, dec!(1.7));
    }

    #[test]
    fn test_load_or_default_requires_explicit_file() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert!(AppConfig::load_or_default(Some(&missing)).is_err());
    }

    #[test]
    fn test_thresholds_only_file_loads() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[thresholds]\nacwr_high = \"1.7\"\n").unwrap();

        let config = AppConfig::load_or_default(Some(&config_path)).unwrap();

        assert_eq!(config.thresholds.acwr_high, dec!(1.7));
        assert_eq!(config.thresholds.acwr_moderate, dec!(1.3));
        assert_eq!(config.metadata.version, "1.0");
    }

    #[test]
    fn test_invalid_config_is_not_replaced_by_defaults() {
        let temp_dir = tempdir().unwrap();

        let inverted = temp_dir.path().join("inverted.toml");
        fs::write(&inverted, "[thresholds]\nacwr_moderate = \"1.6\"\n").unwrap();
        assert!(AppConfig::load_or_default(Some(&inverted)).is_err());

        let broken = temp_dir.path().join("broken.toml");
        fs::write(&broken, "[thresholds\nacwr_high = ").unwrap();
        assert!(AppConfig::load_or_default(Some(&broken)).is_err());
    }
}
