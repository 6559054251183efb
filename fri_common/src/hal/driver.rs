//! Hardware interface trait and error types.
//!
//! This module defines:
//! - `HardwareInterface` trait - Contract between the hosting cyclic loop and a hardware component
//! - `HalError` enum - Error types for HAL operations

use crate::hal::interface::{CommandInterface, StateInterface};
use crate::hal::types::ActivationState;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Error types for HAL operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HalError {
    /// Malformed hardware description; fatal to initialization.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Session could not be opened; the interface stays inactive.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Session exchange failed while active.
    #[error("Hardware communication error: {0}")]
    IoError(String),

    /// Cyclic call on an inactive interface.
    #[error("Hardware interface not active")]
    NotActive,
}

/// Trait defining the interface between a hosting cyclic loop and a
/// hardware component.
///
/// # Lifecycle
///
/// 1. Construction validates the configuration (never partially initialized)
/// 2. `activate()` / `deactivate()` - any number of pairs
/// 3. `read()` then `write()` - once per tick while active
///
/// # Timing Contracts
///
/// | Operation | RT Constraint |
/// |-----------|---------------|
/// | `activate()` | None (may block while connecting) |
/// | `read()` / `write()` | **HARD**, bounded by the session exchange |
/// | `deactivate()` | None |
///
/// Exported handles stay valid for the lifetime of the component.
pub trait HardwareInterface {
    /// Component name (from configuration).
    fn name(&self) -> &str;

    /// Current activation state.
    fn activation_state(&self) -> ActivationState;

    /// Open the underlying session and start exchanging data.
    ///
    /// # Errors
    /// `HalError::ConnectionError` if the session cannot be opened.
    fn activate(&mut self) -> Result<(), HalError>;

    /// Close the underlying session. Idempotent.
    fn deactivate(&mut self) -> Result<(), HalError>;

    /// Pull measured state into the state interfaces.
    ///
    /// `time` and `period` are supplied by the host and may be ignored.
    fn read(&mut self, time: Instant, period: Duration) -> Result<(), HalError>;

    /// Push command interfaces to the hardware.
    fn write(&mut self, time: Instant, period: Duration) -> Result<(), HalError>;

    /// Read-only handles to measured values.
    fn export_state_interfaces(&self) -> Vec<StateInterface>;

    /// Read-write handles to command values.
    fn export_command_interfaces(&self) -> Vec<CommandInterface>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hal_error_display() {
        let err = HalError::ConfigError("bad joint".to_string());
        assert!(err.to_string().contains("bad joint"));

        let err = HalError::ConnectionError("port 30200".to_string());
        assert!(err.to_string().contains("30200"));

        assert_eq!(
            HalError::NotActive.to_string(),
            "Hardware interface not active"
        );
    }
}
