//! HAL configuration types.
//!
//! This module contains the typed hardware description consumed by the
//! robot control client at initialization:
//! - `HardwareInfo` - Session settings plus the joint list
//! - `JointInfo` - Declared command and state interfaces of one joint

use crate::consts::{DEFAULT_FRI_PORT, DEFAULT_RECEIVE_MULTIPLIER, MAX_JOINTS};
use crate::hal::consts::{HW_IF_EFFORT, HW_IF_POSITION};
use crate::hal::driver::HalError;
use crate::hal::types::ControlMode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_port() -> u16 {
    DEFAULT_FRI_PORT
}

fn default_receive_multiplier() -> u32 {
    DEFAULT_RECEIVE_MULTIPLIER
}

/// Hardware description loaded from the `[hardware]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareInfo {
    /// Hardware component name (used for logging).
    pub name: String,

    /// FRI port on the robot controller.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Robot controller address; `None` accepts any peer.
    #[serde(default)]
    pub remote_host: Option<String>,

    /// Initial command downsample multiplier.
    #[serde(default = "default_receive_multiplier")]
    pub receive_multiplier: u32,

    /// Command composition strategy.
    #[serde(default)]
    pub control_mode: ControlMode,

    /// Joints in robot order.
    #[serde(default)]
    pub joints: Vec<JointInfo>,
}

/// Declared interfaces of a single joint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointInfo {
    /// Joint name, used as the interface prefix.
    pub name: String,

    /// Command interface names, in declaration order.
    #[serde(default)]
    pub command_interfaces: Vec<String>,

    /// State interface names, in declaration order.
    #[serde(default)]
    pub state_interfaces: Vec<String>,
}

impl JointInfo {
    /// Joint declaring the standard `position`, `effort` command and state interfaces.
    pub fn position_effort(name: impl Into<String>) -> Self {
        let interfaces = vec![HW_IF_POSITION.to_string(), HW_IF_EFFORT.to_string()];
        Self {
            name: name.into(),
            command_interfaces: interfaces.clone(),
            state_interfaces: interfaces,
        }
    }

    fn validate(&self) -> Result<(), HalError> {
        check_interfaces(&self.name, "command", &self.command_interfaces)?;
        check_interfaces(&self.name, "state", &self.state_interfaces)
    }
}

/// Every joint must declare exactly `[position, effort]`, in that order.
fn check_interfaces(joint: &str, kind: &str, interfaces: &[String]) -> Result<(), HalError> {
    if interfaces.len() != 2 {
        return Err(HalError::ConfigError(format!(
            "Joint '{}': expecting exactly 2 {} interfaces, got {}",
            joint,
            kind,
            interfaces.len()
        )));
    }
    if interfaces[0] != HW_IF_POSITION {
        return Err(HalError::ConfigError(format!(
            "Joint '{}': expecting POSITION {} interface as first, got '{}'",
            joint, kind, interfaces[0]
        )));
    }
    if interfaces[1] != HW_IF_EFFORT {
        return Err(HalError::ConfigError(format!(
            "Joint '{}': expecting EFFORT {} interface as second, got '{}'",
            joint, kind, interfaces[1]
        )));
    }
    Ok(())
}

impl HardwareInfo {
    /// Hardware description with `joint_count` standard joints named `joint_a1..`.
    pub fn with_joints(name: impl Into<String>, joint_count: usize) -> Self {
        Self {
            name: name.into(),
            port: DEFAULT_FRI_PORT,
            remote_host: None,
            receive_multiplier: DEFAULT_RECEIVE_MULTIPLIER,
            control_mode: ControlMode::default(),
            joints: (1..=joint_count)
                .map(|i| JointInfo::position_effort(format!("joint_a{i}")))
                .collect(),
        }
    }

    /// Validate the hardware description.
    ///
    /// # Validation Rules
    /// 1. 1 <= `joints.len()` <= MAX_JOINTS
    /// 2. Joint names non-empty and unique
    /// 3. Each joint declares command interfaces `[position, effort]`
    /// 4. Each joint declares state interfaces `[position, effort]`
    /// 5. `receive_multiplier` >= 1
    pub fn validate(&self) -> Result<(), HalError> {
        if self.joints.is_empty() {
            return Err(HalError::ConfigError(
                "At least one joint must be declared".to_string(),
            ));
        }

        if self.joints.len() > MAX_JOINTS {
            return Err(HalError::ConfigError(format!(
                "Too many joints: {} (max {})",
                self.joints.len(),
                MAX_JOINTS
            )));
        }

        let mut names = HashSet::new();
        for (idx, joint) in self.joints.iter().enumerate() {
            if joint.name.is_empty() {
                return Err(HalError::ConfigError(format!("Joint {} has empty name", idx)));
            }
            if !names.insert(joint.name.as_str()) {
                return Err(HalError::ConfigError(format!(
                    "Duplicate joint name: {}",
                    joint.name
                )));
            }
            joint.validate()?;
        }

        if self.receive_multiplier == 0 {
            return Err(HalError::ConfigError(
                "receive_multiplier must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interfaces(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_with_joints_is_valid() {
        let info = HardwareInfo::with_joints("lbr", MAX_JOINTS);
        assert!(info.validate().is_ok());
        assert_eq!(info.joints[6].name, "joint_a7");
        assert_eq!(info.port, DEFAULT_FRI_PORT);
    }

    #[test]
    fn test_validate_no_joints() {
        let info = HardwareInfo::with_joints("lbr", 0);
        assert!(matches!(info.validate(), Err(HalError::ConfigError(_))));
    }

    #[test]
    fn test_validate_too_many_joints() {
        let info = HardwareInfo::with_joints("lbr", MAX_JOINTS + 1);
        let err = info.validate().unwrap_err();
        assert!(err.to_string().contains("Too many joints"));
    }

    #[test]
    fn test_validate_duplicate_names() {
        let mut info = HardwareInfo::with_joints("lbr", 2);
        info.joints[1].name = info.joints[0].name.clone();
        let err = info.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_validate_command_interface_count() {
        let mut info = HardwareInfo::with_joints("lbr", 2);
        info.joints[1].command_interfaces = interfaces(&["position"]);
        let err = info.validate().unwrap_err();
        assert!(err.to_string().contains("exactly 2 command"));
    }

    #[test]
    fn test_validate_command_interface_order() {
        let mut info = HardwareInfo::with_joints("lbr", 2);
        info.joints[0].command_interfaces = interfaces(&["effort", "position"]);
        let err = info.validate().unwrap_err();
        assert!(err.to_string().contains("POSITION command"));
    }

    #[test]
    fn test_validate_state_interface_second() {
        let mut info = HardwareInfo::with_joints("lbr", 1);
        info.joints[0].state_interfaces = interfaces(&["position", "velocity"]);
        let err = info.validate().unwrap_err();
        assert!(err.to_string().contains("EFFORT state"));
    }

    #[test]
    fn test_validate_zero_multiplier() {
        let mut info = HardwareInfo::with_joints("lbr", 1);
        info.receive_multiplier = 0;
        assert!(info.validate().is_err());
    }
}
