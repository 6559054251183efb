//! HAL state and command types.
//!
//! This module defines the data exchanged with an FRI session each cycle:
//! - `RobotState` - Measured values reported by the robot controller
//! - `RobotCommand` - Outgoing joint position / torque command
//! - `SessionState` - FRI session phase
//! - `ControlMode` / `ActivationState` - Client configuration and lifecycle

use crate::consts::MAX_JOINTS;
use serde::{Deserialize, Serialize};

/// Fixed-capacity per-joint value buffer (RT-safe, no heap).
pub type JointValues = heapless::Vec<f64, MAX_JOINTS>;

/// Command composition strategy, fixed at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Track the externally commanded joint positions.
    #[default]
    PositionControl,
    /// Follow the robot interpolator and overlay commanded joint torques.
    TorqueControl,
}

/// Activation state of a hardware interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationState {
    /// No session open; cyclic calls fail fast.
    #[default]
    Inactive,
    /// Session open; cyclic calls exchange data.
    Active,
}

/// FRI session phase reported by the robot controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum SessionState {
    /// No session available.
    #[default]
    Idle = 0,
    /// Monitoring mode, connection quality insufficient.
    MonitoringWait = 1,
    /// Monitoring mode, ready for commanding.
    MonitoringReady = 2,
    /// Commanding requested, waiting for synchronisation.
    CommandingWait = 3,
    /// Commands are applied by the robot.
    CommandingActive = 4,
}

impl SessionState {
    /// Numeric value exported through the `state/fri_state` interface.
    #[inline]
    pub const fn as_f64(self) -> f64 {
        self as u8 as f64
    }

    /// True while the robot accepts commands.
    #[inline]
    pub const fn is_commanding(self) -> bool {
        matches!(self, Self::CommandingWait | Self::CommandingActive)
    }
}

/// Robot state received in one FRI cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotState {
    /// Measured joint positions [rad].
    pub measured_joint_position: JointValues,
    /// Measured joint torques [Nm].
    pub measured_torque: JointValues,
    /// Joint positions of the robot interpolator [rad].
    pub ipo_joint_position: JointValues,
    /// Tracking performance of the commanded motion (0.0 - 1.0).
    pub tracking_performance: f64,
    /// Current session phase.
    pub session_state: SessionState,
}

/// Command sent to the robot in one FRI cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotCommand {
    /// Commanded joint positions [rad].
    pub joint_position: JointValues,
    /// Commanded joint torques [Nm], `None` when torque is not commanded.
    pub torque: Option<JointValues>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_mode_serde_names() {
        #[derive(Debug, Deserialize)]
        struct Wrapper {
            mode: ControlMode,
        }

        let w: Wrapper = toml::from_str("mode = \"torque_control\"").unwrap();
        assert_eq!(w.mode, ControlMode::TorqueControl);
        let w: Wrapper = toml::from_str("mode = \"position_control\"").unwrap();
        assert_eq!(w.mode, ControlMode::PositionControl);
        assert!(toml::from_str::<Wrapper>("mode = \"velocity\"").is_err());
    }

    #[test]
    fn test_session_state_values() {
        assert_eq!(SessionState::default(), SessionState::Idle);
        assert_eq!(SessionState::Idle.as_f64(), 0.0);
        assert_eq!(SessionState::CommandingActive.as_f64(), 4.0);
        assert!(SessionState::CommandingWait.is_commanding());
        assert!(!SessionState::MonitoringReady.is_commanding());
    }

    #[test]
    fn test_robot_command_default_has_no_torque() {
        let cmd = RobotCommand::default();
        assert!(cmd.joint_position.is_empty());
        assert!(cmd.torque.is_none());
    }

    #[test]
    fn test_joint_values_capacity() {
        let mut values = JointValues::new();
        for i in 0..MAX_JOINTS {
            assert!(values.push(i as f64).is_ok());
        }
        assert!(values.push(0.0).is_err());
    }
}
