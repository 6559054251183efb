//! Prelude module for common re-exports.
//!
//! Consumers can do `use fri_common::prelude::*;` and get the most
//! important types without listing individual paths.
//!
//! # Usage
//!
//! ```rust
//! use fri_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{BridgeConfig, ConfigError, ConfigLoader, RunnerConfig, SharedConfig};
pub use crate::hal::config::{HardwareInfo, JointInfo};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{CYCLE_TIME_US, DEFAULT_FRI_PORT, MAX_JOINTS};

// ─── Hardware Interface ─────────────────────────────────────────────
pub use crate::hal::clock::{Clock, ManualClock, SystemClock};
pub use crate::hal::driver::{HalError, HardwareInterface};
pub use crate::hal::interface::{CommandInterface, InterfaceCell, SharedCell, StateInterface};
pub use crate::hal::session::{FriSession, SessionError};
pub use crate::hal::types::{
    ActivationState, ControlMode, JointValues, RobotCommand, RobotState, SessionState,
};

