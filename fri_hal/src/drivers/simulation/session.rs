//! Simulated FRI session.
//!
//! `SimulatedSession` implements `FriSession` in-process. It walks through
//! the FRI session phases on successive `read_cycle()` calls and moves a
//! `JointSimulator` per joint towards the last transmitted command.

use super::physics::JointSimulator;
use crate::command_mode::fill;
use fri_common::consts::{CYCLE_TIME_US, MAX_JOINTS};
use fri_common::hal::session::{FriSession, SessionError};
use fri_common::hal::types::{RobotCommand, RobotState, SessionState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default number of read cycles spent in each non-final phase.
pub const DEFAULT_CYCLES_PER_PHASE: u32 = 10;

/// Simulation parameters.
#[derive(Debug, Clone)]
pub struct SimulationSettings {
    /// Number of simulated joints (1..=MAX_JOINTS).
    pub joint_count: usize,
    /// Joint positions at start-up [rad]; missing entries are zero.
    pub initial_positions: Vec<f64>,
    /// Physics step per read cycle.
    pub cycle_time: Duration,
    /// Read cycles spent in each phase before advancing.
    pub cycles_per_phase: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            joint_count: MAX_JOINTS,
            initial_positions: Vec::new(),
            cycle_time: Duration::from_micros(CYCLE_TIME_US),
            cycles_per_phase: DEFAULT_CYCLES_PER_PHASE,
        }
    }
}

impl SimulationSettings {
    /// Settings for `joint_count` joints, all other fields default.
    pub fn with_joints(joint_count: usize) -> Self {
        Self {
            joint_count,
            ..Self::default()
        }
    }
}

/// Shared switches that make the next session call fail.
///
/// Cloned handles stay connected to the session they were taken from.
#[derive(Debug, Clone, Default)]
pub struct FaultInjector {
    fail_connect: Arc<AtomicBool>,
    fail_read: Arc<AtomicBool>,
    fail_write: Arc<AtomicBool>,
}

impl FaultInjector {
    /// Make `connect()` fail while set.
    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::Relaxed);
    }

    /// Make `read_cycle()` fail while set.
    pub fn set_fail_read(&self, fail: bool) {
        self.fail_read.store(fail, Ordering::Relaxed);
    }

    /// Make `write_cycle()` fail while set.
    pub fn set_fail_write(&self, fail: bool) {
        self.fail_write.store(fail, Ordering::Relaxed);
    }

    fn connect_fails(&self) -> bool {
        self.fail_connect.load(Ordering::Relaxed)
    }

    fn read_fails(&self) -> bool {
        self.fail_read.load(Ordering::Relaxed)
    }

    fn write_fails(&self) -> bool {
        self.fail_write.load(Ordering::Relaxed)
    }
}

/// Call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    /// Successful connects.
    pub connects: u64,
    /// Disconnects while connected.
    pub disconnects: u64,
    /// Successful read cycles.
    pub reads: u64,
    /// Successful write cycles.
    pub writes: u64,
}

/// In-process FRI session.
pub struct SimulatedSession {
    settings: SimulationSettings,
    joints: Vec<JointSimulator>,
    connected: bool,
    phase_cycles: u32,
    state: RobotState,
    staged: RobotCommand,
    last_sent: Option<RobotCommand>,
    faults: FaultInjector,
    counters: SessionCounters,
}

impl SimulatedSession {
    /// Create a disconnected session.
    ///
    /// `joint_count` is clamped to `1..=MAX_JOINTS`.
    pub fn new(settings: SimulationSettings) -> Self {
        let joint_count = settings.joint_count.clamp(1, MAX_JOINTS);
        let joints: Vec<JointSimulator> = (0..joint_count)
            .map(|i| {
                JointSimulator::new(settings.initial_positions.get(i).copied().unwrap_or(0.0))
            })
            .collect();

        let mut session = Self {
            settings: SimulationSettings {
                joint_count,
                ..settings
            },
            joints,
            connected: false,
            phase_cycles: 0,
            state: RobotState::default(),
            staged: RobotCommand::default(),
            last_sent: None,
            faults: FaultInjector::default(),
            counters: SessionCounters::default(),
        };
        session.publish_state();
        session
    }

    /// Handle for injecting failures.
    pub fn faults(&self) -> FaultInjector {
        self.faults.clone()
    }

    /// Call counters.
    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    /// Last command transmitted by `write_cycle()`.
    pub fn last_sent(&self) -> Option<&RobotCommand> {
        self.last_sent.as_ref()
    }

    /// Simulated joint count.
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Current session phase.
    pub fn phase(&self) -> SessionState {
        self.state.session_state
    }

    fn advance_phase(&mut self) {
        let phase = self.state.session_state;
        self.phase_cycles = self.phase_cycles.saturating_add(1);
        if phase == SessionState::CommandingActive
            || self.phase_cycles < self.settings.cycles_per_phase
        {
            return;
        }

        let next = match phase {
            SessionState::Idle | SessionState::MonitoringWait => SessionState::MonitoringReady,
            SessionState::MonitoringReady => SessionState::CommandingWait,
            SessionState::CommandingWait | SessionState::CommandingActive => {
                SessionState::CommandingActive
            }
        };
        info!("Session phase {:?} -> {:?}", phase, next);
        self.state.session_state = next;
        self.phase_cycles = 0;
    }

    fn step_joints(&mut self) {
        let dt = self.settings.cycle_time;
        for (i, joint) in self.joints.iter_mut().enumerate() {
            let (target, torque) = match &self.last_sent {
                Some(cmd) => (
                    cmd.joint_position.get(i).copied().unwrap_or(joint.target_position()),
                    cmd.torque
                        .as_ref()
                        .and_then(|t| t.get(i).copied())
                        .unwrap_or(0.0),
                ),
                None => (joint.target_position(), 0.0),
            };
            joint.update(target, torque, dt);
        }
    }

    fn publish_state(&mut self) {
        fill(
            &mut self.state.measured_joint_position,
            self.joints.iter().map(JointSimulator::position),
        );
        fill(
            &mut self.state.measured_torque,
            self.joints.iter().map(JointSimulator::torque),
        );
        fill(
            &mut self.state.ipo_joint_position,
            self.joints.iter().map(JointSimulator::target_position),
        );

        let commanding = self.state.session_state == SessionState::CommandingActive;
        self.state.tracking_performance = if commanding {
            let window = self.settings.cycles_per_phase.max(1);
            (f64::from(self.phase_cycles) / f64::from(window)).min(1.0)
        } else {
            0.0
        };
    }
}

impl Default for SimulatedSession {
    fn default() -> Self {
        Self::new(SimulationSettings::default())
    }
}

impl FriSession for SimulatedSession {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn connect(&mut self, port: u16, remote_host: Option<&str>) -> Result<(), SessionError> {
        if self.faults.connect_fails() {
            warn!("Injected connect failure on port {}", port);
            return Err(SessionError::ConnectFailed {
                port,
                reason: "injected failure".to_string(),
            });
        }
        if port == 0 {
            return Err(SessionError::ConnectFailed {
                port,
                reason: "port 0 is not a valid FRI port".to_string(),
            });
        }

        self.connected = true;
        self.phase_cycles = 0;
        self.state.session_state = SessionState::MonitoringWait;
        self.counters.connects += 1;
        info!(
            "Simulated session connected on port {} (remote: {})",
            port,
            remote_host.unwrap_or("any")
        );
        Ok(())
    }

    fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;
        self.state.session_state = SessionState::Idle;
        self.counters.disconnects += 1;
        info!(
            "Simulated session disconnected after {} reads, {} writes",
            self.counters.reads, self.counters.writes
        );
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn read_cycle(&mut self) -> Result<(), SessionError> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        if self.faults.read_fails() {
            return Err(SessionError::Receive("injected failure".to_string()));
        }

        self.advance_phase();
        self.step_joints();
        self.publish_state();
        self.counters.reads += 1;
        Ok(())
    }

    fn robot_state(&self) -> &RobotState {
        &self.state
    }

    fn update_command(&mut self, command: &RobotCommand) {
        self.staged.clone_from(command);
    }

    fn write_cycle(&mut self) -> Result<(), SessionError> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        if self.faults.write_fails() {
            return Err(SessionError::Send("injected failure".to_string()));
        }

        match &mut self.last_sent {
            Some(sent) => sent.clone_from(&self.staged),
            None => self.last_sent = Some(self.staged.clone()),
        }
        self.counters.writes += 1;
        debug!("Sent command: {:?}", self.staged.joint_position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fri_common::hal::types::JointValues;

    fn session(joints: usize) -> SimulatedSession {
        SimulatedSession::new(SimulationSettings {
            joint_count: joints,
            initial_positions: vec![0.1, 0.2, 0.3],
            cycle_time: Duration::from_millis(1),
            cycles_per_phase: 2,
        })
    }

    #[test]
    fn test_initial_state_reports_initial_positions() {
        let s = session(3);
        let state = s.robot_state();
        assert_eq!(state.measured_joint_position.as_slice(), &[0.1, 0.2, 0.3]);
        assert_eq!(state.ipo_joint_position.as_slice(), &[0.1, 0.2, 0.3]);
        assert_eq!(state.session_state, SessionState::Idle);
    }

    #[test]
    fn test_joint_count_clamped() {
        assert_eq!(session(0).joint_count(), 1);
        assert_eq!(session(20).joint_count(), MAX_JOINTS);
    }

    #[test]
    fn test_read_requires_connection() {
        let mut s = session(3);
        assert_eq!(s.read_cycle(), Err(SessionError::NotConnected));
        assert_eq!(s.write_cycle(), Err(SessionError::NotConnected));
    }

    #[test]
    fn test_port_zero_rejected() {
        let mut s = session(3);
        assert!(matches!(
            s.connect(0, None),
            Err(SessionError::ConnectFailed { port: 0, .. })
        ));
        assert!(!s.is_connected());
    }

    #[test]
    fn test_phases_advance_to_commanding_active() {
        let mut s = session(3);
        s.connect(30200, None).unwrap();
        assert_eq!(s.phase(), SessionState::MonitoringWait);

        let mut seen = vec![s.phase()];
        for _ in 0..10 {
            s.read_cycle().unwrap();
            if seen.last() != Some(&s.phase()) {
                seen.push(s.phase());
            }
        }
        assert_eq!(
            seen,
            vec![
                SessionState::MonitoringWait,
                SessionState::MonitoringReady,
                SessionState::CommandingWait,
                SessionState::CommandingActive,
            ]
        );
    }

    #[test]
    fn test_tracking_performance_ramps_to_one() {
        let mut s = session(3);
        s.connect(30200, None).unwrap();
        for _ in 0..20 {
            s.read_cycle().unwrap();
        }
        assert_eq!(s.robot_state().tracking_performance, 1.0);
    }

    #[test]
    fn test_measured_follows_sent_command() {
        let mut s = session(3);
        s.connect(30200, None).unwrap();
        let cmd = RobotCommand {
            joint_position: JointValues::from_slice(&[0.15, 0.2, 0.3]).unwrap(),
            torque: Some(JointValues::from_slice(&[1.0, 2.0, 3.0]).unwrap()),
        };
        s.update_command(&cmd);
        s.write_cycle().unwrap();
        assert_eq!(s.last_sent(), Some(&cmd));

        for _ in 0..2000 {
            s.read_cycle().unwrap();
        }
        let state = s.robot_state();
        assert!((state.measured_joint_position[0] - 0.15).abs() < 1e-9);
        assert_eq!(state.ipo_joint_position[0], 0.15);
        assert_eq!(state.measured_torque.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_fault_injection() {
        let mut s = session(3);
        let faults = s.faults();

        faults.set_fail_connect(true);
        assert!(s.connect(30200, None).is_err());
        faults.set_fail_connect(false);
        s.connect(30200, None).unwrap();

        faults.set_fail_read(true);
        assert!(matches!(s.read_cycle(), Err(SessionError::Receive(_))));
        faults.set_fail_write(true);
        assert!(matches!(s.write_cycle(), Err(SessionError::Send(_))));

        assert_eq!(s.counters().reads, 0);
        assert_eq!(s.counters().writes, 0);
    }

    #[test]
    fn test_disconnect_counts_once() {
        let mut s = session(3);
        s.connect(30200, Some("192.168.0.1")).unwrap();
        s.disconnect();
        s.disconnect();
        assert_eq!(s.counters().connects, 1);
        assert_eq!(s.counters().disconnects, 1);
        assert_eq!(s.phase(), SessionState::Idle);
    }
}
