//! Configuration types for speedometer

use crate::telemetry::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
///
/// All of these are fatal to initialization: a speedometer is never started
/// with a configuration that fails validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Period must be at least one bar
    #[error("Invalid period: {0} (must be >= 1)")]
    InvalidPeriod(usize),
    /// Threshold must be a finite positive number
    #[error("Invalid min_threshold: {0} (must be > 0)")]
    InvalidThreshold(f64),
    /// Cooldown must be at least one bar
    #[error("Invalid alert_cooldown_bars: {0} (must be >= 1)")]
    InvalidCooldown(u64),
    /// History must retain at least one sample
    #[error("Invalid history_limit: {0} (must be >= 1)")]
    InvalidHistoryLimit(usize),
    /// Configuration file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub speedometer: SpeedometerConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Speedometer indicator configuration
///
/// Immutable once a speedometer has been configured from it. Two
/// configurations that compare equal describe interchangeable instances.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpeedometerConfig {
    /// Number of bars spanned by the rate measurement
    #[serde(default = "default_period")]
    pub period: usize,

    /// Speed at or above which the series counts as fast
    #[serde(default = "default_min_threshold")]
    pub min_threshold: f64,

    /// Minimum number of samples between two emitted alerts
    #[serde(default = "default_alert_cooldown_bars")]
    pub alert_cooldown_bars: u64,

    /// Emit alerts on upward threshold crossings
    #[serde(default)]
    pub alerts_enabled: bool,

    /// Where alerts are delivered (webhook URL, address, ...)
    #[serde(default)]
    pub alert_destination: String,

    /// Maximum number of speed samples retained in memory
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_period() -> usize {
    20
}
fn default_min_threshold() -> f64 {
    30.0
}
fn default_alert_cooldown_bars() -> u64 {
    20
}
fn default_history_limit() -> usize {
    10_000
}

impl Default for SpeedometerConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
            min_threshold: default_min_threshold(),
            alert_cooldown_bars: default_alert_cooldown_bars(),
            alerts_enabled: false,
            alert_destination: String::new(),
            history_limit: default_history_limit(),
        }
    }
}

impl SpeedometerConfig {
    /// Check the configuration before any bar is processed
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period < 1 {
            return Err(ConfigError::InvalidPeriod(self.period));
        }
        if !self.min_threshold.is_finite() || self.min_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.min_threshold));
        }
        if self.alert_cooldown_bars < 1 {
            return Err(ConfigError::InvalidCooldown(self.alert_cooldown_bars));
        }
        if self.history_limit < 1 {
            return Err(ConfigError::InvalidHistoryLimit(self.history_limit));
        }
        Ok(())
    }
}

/// Bar feed configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Name of the bar series, used as registry key and log field
    #[serde(default = "default_series")]
    pub series: String,

    /// Bars buffered between the reader task and the indicator
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Default input file for `replay`
    #[serde(default)]
    pub input: Option<PathBuf>,
}

fn default_series() -> String {
    "default".to_string()
}
fn default_channel_capacity() -> usize {
    1024
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            series: default_series(),
            channel_capacity: default_channel_capacity(),
            input: None,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; no exporter when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text and validate it
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.speedometer.validate()?;
        Ok(config)
    }
}
