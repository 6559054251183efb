//! FRI Common Library
//!
//! Shared constants, configuration loading and the hardware/session
//! contracts used by the FRI hardware bridge workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Joint limits, default port, cycle time
//! - [`config`] - Configuration loading traits and types
//! - [`hal`] - Hardware interface contract, session contract, interface handles
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use fri_common::prelude::*;
//! use fri_common::hal::types::ControlMode;
//! ```

pub mod config;
pub mod consts;
pub mod hal;
pub mod prelude;
