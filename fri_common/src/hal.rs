//! Hardware interface layer shared types.
//!
//! This module contains the contracts between the robot control client,
//! the hosting cyclic loop, and the FRI session it owns.

pub mod clock;
pub mod config;
pub mod consts;
pub mod driver;
pub mod interface;
pub mod session;
pub mod types;
