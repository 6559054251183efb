//! Physics simulation module.
//!
//! This module provides simple kinematic simulation for manipulator joints.

mod joint;

pub use joint::{DEFAULT_MAX_ACCELERATION, DEFAULT_MAX_VELOCITY, JointSimulator};
