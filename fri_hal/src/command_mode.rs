//! Outgoing command composition.
//!
//! - `PositionControl`: joint positions come from the host's position
//!   commands; the torque field is left as it was.
//! - `TorqueControl`: joint positions follow the robot interpolator so the
//!   position loop stays on the robot's own reference, and the host's
//!   effort commands are sent as joint torques.

use crate::joints::JointSet;
use fri_common::hal::types::{ControlMode, JointValues, RobotCommand, RobotState};

/// Compose `command` from the current joint set and session state.
///
/// Allocation-free; `command` keeps no data from previous calls except the
/// torque field in position control.
pub fn compose(
    mode: ControlMode,
    joints: &JointSet,
    state: &RobotState,
    command: &mut RobotCommand,
) {
    match mode {
        ControlMode::PositionControl => {
            fill(&mut command.joint_position, joints.commanded_positions());
        }
        ControlMode::TorqueControl => {
            fill(
                &mut command.joint_position,
                state.ipo_joint_position.iter().copied().take(joints.len()),
            );
            let torque = command.torque.get_or_insert_with(JointValues::new);
            fill(torque, joints.commanded_efforts());
        }
    }
}

/// Replace `dst` with `values`, dropping anything past capacity.
pub(crate) fn fill(dst: &mut JointValues, values: impl Iterator<Item = f64>) {
    dst.clear();
    for value in values {
        if dst.push(value).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fri_common::hal::config::JointInfo;

    fn joints(positions: &[f64], efforts: &[f64]) -> JointSet {
        let infos: Vec<JointInfo> = (0..positions.len())
            .map(|i| JointInfo::position_effort(format!("j{i}")))
            .collect();
        let set = JointSet::new(&infos);
        for (joint, (&p, &e)) in set.iter().zip(positions.iter().zip(efforts)) {
            joint.commanded_position.set(p);
            joint.commanded_effort.set(e);
        }
        set
    }

    fn values(v: &[f64]) -> JointValues {
        JointValues::from_slice(v).unwrap()
    }

    #[test]
    fn test_position_control_copies_commands() {
        let set = joints(&[0.1, 0.2, 0.3], &[5.0, 6.0, 7.0]);
        let mut state = RobotState::default();
        state.ipo_joint_position = values(&[9.0, 9.0, 9.0]);
        let mut cmd = RobotCommand::default();

        compose(ControlMode::PositionControl, &set, &state, &mut cmd);

        assert_eq!(cmd.joint_position.as_slice(), &[0.1, 0.2, 0.3]);
        assert!(cmd.torque.is_none());
    }

    #[test]
    fn test_position_control_leaves_torque_untouched() {
        let set = joints(&[0.1], &[5.0]);
        let mut cmd = RobotCommand {
            joint_position: JointValues::new(),
            torque: Some(values(&[1.5])),
        };

        compose(
            ControlMode::PositionControl,
            &set,
            &RobotState::default(),
            &mut cmd,
        );

        assert_eq!(cmd.torque, Some(values(&[1.5])));
    }

    #[test]
    fn test_torque_control_uses_ipo_position_and_efforts() {
        let set = joints(&[0.1, 0.2], &[5.0, -6.0]);
        let mut state = RobotState::default();
        state.ipo_joint_position = values(&[1.0, 2.0, 3.0]);
        let mut cmd = RobotCommand::default();

        compose(ControlMode::TorqueControl, &set, &state, &mut cmd);

        assert_eq!(cmd.joint_position.as_slice(), &[1.0, 2.0]);
        assert_eq!(cmd.torque.as_ref().unwrap().as_slice(), &[5.0, -6.0]);
    }
}
