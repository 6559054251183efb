//! Simulation driver module.
//!
//! This module provides an in-process FRI session for development and testing
//! without a robot controller.

mod physics;
mod session;

pub use physics::{DEFAULT_MAX_ACCELERATION, DEFAULT_MAX_VELOCITY, JointSimulator};
pub use session::{
    DEFAULT_CYCLES_PER_PHASE, FaultInjector, SessionCounters, SimulatedSession,
    SimulationSettings,
};

use fri_common::hal::config::HardwareInfo;

/// Factory function to create a simulated session sized for `info`.
pub fn create_session(info: &HardwareInfo) -> SimulatedSession {
    SimulatedSession::new(SimulationSettings::with_joints(info.joints.len()))
}
