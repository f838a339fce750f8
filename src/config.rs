//! # Machine and Planner Configuration
//!
//! Configuration is read from a single TOML file. Every key is optional and
//! falls back to a default, so an empty file is a valid configuration.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [machine]
//! max_speed_x = 200.0
//! max_speed_y = 150.0
//! acceleration_x = 1000.0
//! acceleration_y = 800.0
//! minimum_junction_speed = 0.0
//! junction_deviation = 0.05
//!
//! [planner]
//! start_x = 0.0
//! start_y = 0.0
//!
//! [trace]
//! sample_rate = 100.0
//! ```
//!
//! ## Example: Rust Usage
//!
//! ```rust
//! use laser_planner::config::Config;
//! let config: Config = toml::from_str("[machine]\nmax_speed_x = 120.0").unwrap();
//! assert_eq!(config.machine.max_speed_x, 120.0);
//! assert!(config.validate().is_ok());
//! let settings = config.machine.to_settings();
//! assert_eq!(settings.max_speed_x, 120.0);
//! ```

// src/config.rs - Single configuration file
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::motion::{MachineSettings, Vector2};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration struct: machine limits, planner defaults and trace export.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub machine: MachineConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

/// Per-axis machine limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MachineConfig {
    #[serde(default = "default_max_speed")]
    pub max_speed_x: f64,
    #[serde(default = "default_max_speed")]
    pub max_speed_y: f64,
    #[serde(default = "default_acceleration")]
    pub acceleration_x: f64,
    #[serde(default = "default_acceleration")]
    pub acceleration_y: f64,
    #[serde(default)]
    pub minimum_junction_speed: f64,
    #[serde(default = "default_junction_deviation")]
    pub junction_deviation: f64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_speed_x: default_max_speed(),
            max_speed_y: default_max_speed(),
            acceleration_x: default_acceleration(),
            acceleration_y: default_acceleration(),
            minimum_junction_speed: 0.0,
            junction_deviation: default_junction_deviation(),
        }
    }
}

impl MachineConfig {
    pub fn to_settings(&self) -> MachineSettings {
        MachineSettings {
            max_speed_x: self.max_speed_x,
            max_speed_y: self.max_speed_y,
            acceleration_x: self.acceleration_x,
            acceleration_y: self.acceleration_y,
            minimum_junction_speed: self.minimum_junction_speed,
            junction_deviation: self.junction_deviation,
        }
    }
}

/// Where the head is when planning starts.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub start_x: f64,
    #[serde(default)]
    pub start_y: f64,
}

impl PlannerConfig {
    pub fn start_position(&self) -> Vector2 {
        Vector2::new(self.start_x, self.start_y)
    }
}

/// Timeline sampling for trace export.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TraceConfig {
    /// Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
        }
    }
}

impl Config {
    /// Validate machine limits, start position and sample rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.machine
            .to_settings()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !self.planner.start_x.is_finite() || !self.planner.start_y.is_finite() {
            return Err(ConfigError::Invalid("Start position must be finite".to_string()));
        }
        if !(self.trace.sample_rate.is_finite() && self.trace.sample_rate > 0.0) {
            return Err(ConfigError::Invalid("Trace sample_rate must be > 0".to_string()));
        }
        Ok(())
    }
}

// Default value functions
fn default_max_speed() -> f64 { 200.0 }
fn default_acceleration() -> f64 { 1000.0 }
fn default_junction_deviation() -> f64 { 0.05 }
fn default_sample_rate() -> f64 { 100.0 }

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let config: Config = match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to parse config TOML: {}", e);
                return Err(ConfigError::Toml(e));
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            return Err(ConfigError::Io(e));
        }
    };
    if let Err(e) = config.validate() {
        tracing::error!("Rejected config '{}': {}", path, e);
        return Err(e);
    }
    Ok(config)
}
