//! Configuration loading traits and types.
//!
//! Every FRI application loads a single TOML file made of a `[shared]`
//! section, the `[hardware]` description consumed by the robot control
//! client, and an optional `[runner]` section for the hosting loop.
//!
//! # Usage
//!
//! ```rust,no_run
//! use fri_common::config::{BridgeConfig, ConfigError, ConfigLoader};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = BridgeConfig::load(Path::new("config/lbr_iiwa7.toml"))?;
//!     config.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use crate::consts::CYCLE_TIME_US;
use crate::hal::config::HardwareInfo;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields shared across all FRI applications.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "fri-hal-lbr-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_cycle_time_us() -> u64 {
    CYCLE_TIME_US
}

/// Hosting loop settings (`[runner]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Loop period in microseconds.
    #[serde(default = "default_cycle_time_us")]
    pub cycle_time_us: u64,

    /// Stop after this many cycles. Runs until interrupted when unset.
    #[serde(default)]
    pub max_cycles: Option<u64>,

    /// Amplitude of the demo sine trajectory [rad].
    #[serde(default)]
    pub amplitude: f64,

    /// Frequency of the demo sine trajectory [Hz].
    #[serde(default)]
    pub frequency_hz: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            cycle_time_us: CYCLE_TIME_US,
            max_cycles: None,
            amplitude: 0.0,
            frequency_hz: 0.0,
        }
    }
}

/// Complete bridge configuration file.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "fri-hal"
///
/// [hardware]
/// name = "lbr_iiwa7"
/// control_mode = "position_control"
///
/// [[hardware.joints]]
/// name = "joint_a1"
/// command_interfaces = ["position", "effort"]
/// state_interfaces = ["position", "effort"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Shared application settings.
    pub shared: SharedConfig,
    /// Hardware description handed to the robot control client.
    pub hardware: HardwareInfo,
    /// Hosting loop settings.
    #[serde(default)]
    pub runner: RunnerConfig,
}

impl BridgeConfig {
    /// Validate everything except the hardware interface shapes, which are
    /// checked by the client itself at initialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        if self.runner.cycle_time_us == 0 {
            return Err(ConfigError::ValidationError(
                "runner.cycle_time_us must be greater than 0".to_string(),
            ));
        }
        if !self.runner.amplitude.is_finite() || !self.runner.frequency_hz.is_finite() {
            return Err(ConfigError::ValidationError(
                "runner.amplitude and runner.frequency_hz must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from an in-memory TOML document.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
