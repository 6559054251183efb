//! Robot control client.
//!
//! `RobotControlClient` is the hardware component between a hosting cyclic
//! loop and an FRI session:
//!
//! - **Lifecycle**: construction validates the hardware description,
//!   `activate()` opens the session and seeds the outgoing command from the
//!   current joint set, `deactivate()` closes it.
//! - **Cyclic I/O**: `read()` copies the measured robot state into the
//!   joint set, `write()` ticks the downsampler, recomposes the command when
//!   it fires, and always transmits.
//! - **Export**: state and command handles over the joint set cells.
//!
//! ```text
//!            ┌────────────── RobotControlClient ──────────────┐
//!  host ───► │ read()  ── session.read_cycle() ─► JointSet     │
//!  handles ◄►│ write() ── downsampler ─► compose ─► session    │
//!            └──────────────────────────────────────────────────┘
//! ```

use crate::command_mode;
use crate::downsampler::CommandDownsampler;
use crate::joints::JointSet;
use fri_common::consts::NOT_ACTIVE_BACKOFF;
use fri_common::hal::clock::{Clock, SystemClock};
use fri_common::hal::config::HardwareInfo;
use fri_common::hal::consts::{
    FRI_STATE_INTERFACE, FRI_STATE_PREFIX, HW_IF_EFFORT, HW_IF_POSITION,
    RECEIVE_MULTIPLIER_INTERFACE, TIMING_PREFIX,
};
use fri_common::hal::driver::{HalError, HardwareInterface};
use fri_common::hal::interface::{CommandInterface, InterfaceCell, SharedCell, StateInterface};
use fri_common::hal::session::FriSession;
use fri_common::hal::types::{ActivationState, ControlMode, RobotCommand, SessionState};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Span, debug, error, info, info_span};

/// Auxiliary values reported by the last successful `read()`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Telemetry {
    /// FRI session phase.
    pub session_state: SessionState,
    /// Tracking performance (0.0 - 1.0).
    pub tracking_performance: f64,
    /// When the outgoing command was last recomposed.
    pub last_command_at: Option<Instant>,
}

/// Hardware component bridging a cyclic loop and an FRI session.
pub struct RobotControlClient<S: FriSession, C: Clock = SystemClock> {
    name: String,
    port: u16,
    remote_host: Option<String>,
    control_mode: ControlMode,
    session: S,
    clock: C,
    span: Span,
    state: ActivationState,
    joints: JointSet,
    downsampler: CommandDownsampler,
    command: RobotCommand,
    fri_state: SharedCell,
    telemetry: Telemetry,
    command_updates: u64,
}

impl<S: FriSession> RobotControlClient<S, SystemClock> {
    /// Validate `info` and build an inactive client using the system clock.
    ///
    /// # Errors
    /// `HalError::ConfigError` if the interface declarations are malformed.
    pub fn initialize(info: &HardwareInfo, session: S) -> Result<Self, HalError> {
        Self::with_clock(info, session, SystemClock)
    }
}

impl<S: FriSession, C: Clock> RobotControlClient<S, C> {
    /// Validate `info` and build an inactive client with an injected clock.
    ///
    /// Nothing is allocated unless validation succeeds.
    pub fn with_clock(info: &HardwareInfo, session: S, clock: C) -> Result<Self, HalError> {
        let span = info_span!("robot_control_client", hardware = %info.name);

        if let Err(e) = info.validate() {
            span.in_scope(|| error!("Invalid hardware description: {}", e));
            return Err(e);
        }

        span.in_scope(|| {
            info!(
                "Initialized with {} joints, mode={:?}, port={}, receive_multiplier={}, session={}",
                info.joints.len(),
                info.control_mode,
                info.port,
                info.receive_multiplier,
                session.name()
            )
        });

        Ok(Self {
            name: info.name.clone(),
            port: info.port,
            remote_host: info.remote_host.clone(),
            control_mode: info.control_mode,
            session,
            clock,
            span,
            state: ActivationState::Inactive,
            joints: JointSet::new(&info.joints),
            downsampler: CommandDownsampler::new(info.receive_multiplier),
            command: RobotCommand::default(),
            fri_state: Arc::new(InterfaceCell::default()),
            telemetry: Telemetry::default(),
            command_updates: 0,
        })
    }

    /// Emit all further events under `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Joint storage.
    pub fn joints(&self) -> &JointSet {
        &self.joints
    }

    /// Configured command composition strategy.
    pub fn control_mode(&self) -> ControlMode {
        self.control_mode
    }

    /// Ticks counted in the current downsample window.
    pub fn cycle_counter(&self) -> u32 {
        self.downsampler.counter()
    }

    /// Number of command recompositions since construction.
    pub fn command_updates(&self) -> u64 {
        self.command_updates
    }

    /// Command staged for transmission.
    pub fn command(&self) -> &RobotCommand {
        &self.command
    }

    /// Auxiliary values from the last successful read.
    pub fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    /// Owned session (inspection only).
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Rebuild the staged command from scratch out of the current joint set
    /// and session state. Not counted as a command update.
    fn seed_command(&mut self) {
        self.command = RobotCommand::default();
        command_mode::compose(
            self.control_mode,
            &self.joints,
            self.session.robot_state(),
            &mut self.command,
        );
    }

    /// Recompose the outgoing command from the current mode.
    fn update_command(&mut self) {
        command_mode::compose(
            self.control_mode,
            &self.joints,
            self.session.robot_state(),
            &mut self.command,
        );
        self.telemetry.last_command_at = Some(self.clock.now());
        self.command_updates += 1;
    }
}

impl<S: FriSession, C: Clock> HardwareInterface for RobotControlClient<S, C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn activation_state(&self) -> ActivationState {
        self.state
    }

    fn activate(&mut self) -> Result<(), HalError> {
        let span = self.span.clone();
        let _enter = span.enter();

        if self.state == ActivationState::Active {
            debug!("Client already active");
            return Ok(());
        }

        info!("Activating client on port {}", self.port);
        if let Err(e) = self
            .session
            .connect(self.port, self.remote_host.as_deref())
        {
            error!("Could not connect: {}", e);
            return Err(HalError::ConnectionError(e.to_string()));
        }

        self.downsampler.reset();
        // Ticks before the first trigger transmit this seed, never a command
        // left over from a previous active period.
        self.seed_command();
        self.state = ActivationState::Active;
        info!("Activated client");
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), HalError> {
        let _enter = self.span.enter();

        self.session.disconnect();
        if self.state == ActivationState::Active {
            info!(
                "Deactivated client after {} command updates",
                self.command_updates
            );
        }
        self.state = ActivationState::Inactive;
        Ok(())
    }

    fn read(&mut self, _time: Instant, _period: Duration) -> Result<(), HalError> {
        if self.state != ActivationState::Active {
            self.span.in_scope(|| error!("Controller not active"));
            self.clock.sleep(NOT_ACTIVE_BACKOFF);
            return Err(HalError::NotActive);
        }

        if let Err(e) = self.session.read_cycle() {
            self.span
                .in_scope(|| error!("Failed to read data from controller: {}", e));
            return Err(HalError::IoError(e.to_string()));
        }

        let state = self.session.robot_state();
        let n = self.joints.len();
        if state.measured_joint_position.len() < n || state.measured_torque.len() < n {
            let message = format!(
                "Session reported {} positions and {} torques for {} joints",
                state.measured_joint_position.len(),
                state.measured_torque.len(),
                n
            );
            self.span
                .in_scope(|| error!("Failed to read data from controller: {}", message));
            return Err(HalError::IoError(message));
        }

        self.joints
            .store_measured(&state.measured_joint_position, &state.measured_torque);
        self.telemetry.tracking_performance = state.tracking_performance;
        self.telemetry.session_state = state.session_state;
        self.fri_state.set(state.session_state.as_f64());
        Ok(())
    }

    fn write(&mut self, _time: Instant, _period: Duration) -> Result<(), HalError> {
        if self.state != ActivationState::Active {
            self.span.in_scope(|| debug!("Controller deactivated"));
            return Err(HalError::IoError("client not active".to_string()));
        }

        if self.downsampler.tick() {
            self.update_command();
        }

        self.session.update_command(&self.command);
        self.session.write_cycle().map_err(|e| {
            self.span
                .in_scope(|| error!("Failed to write data to controller: {}", e));
            HalError::IoError(e.to_string())
        })
    }

    fn export_state_interfaces(&self) -> Vec<StateInterface> {
        self.span.in_scope(|| debug!("export_state_interfaces()"));

        let mut interfaces = Vec::with_capacity(1 + 2 * self.joints.len());
        interfaces.push(StateInterface::new(
            FRI_STATE_PREFIX,
            FRI_STATE_INTERFACE,
            Arc::clone(&self.fri_state),
        ));
        for joint in self.joints.iter() {
            interfaces.push(StateInterface::new(
                joint.name(),
                HW_IF_POSITION,
                Arc::clone(&joint.measured_position),
            ));
            interfaces.push(StateInterface::new(
                joint.name(),
                HW_IF_EFFORT,
                Arc::clone(&joint.measured_effort),
            ));
        }
        interfaces
    }

    fn export_command_interfaces(&self) -> Vec<CommandInterface> {
        self.span.in_scope(|| debug!("export_command_interfaces()"));

        let mut interfaces = Vec::with_capacity(1 + 2 * self.joints.len());
        interfaces.push(CommandInterface::new(
            TIMING_PREFIX,
            RECEIVE_MULTIPLIER_INTERFACE,
            self.downsampler.multiplier_cell(),
        ));
        for joint in self.joints.iter() {
            interfaces.push(CommandInterface::new(
                joint.name(),
                HW_IF_POSITION,
                Arc::clone(&joint.commanded_position),
            ));
            interfaces.push(CommandInterface::new(
                joint.name(),
                HW_IF_EFFORT,
                Arc::clone(&joint.commanded_effort),
            ));
        }
        interfaces
    }
}

impl<S: FriSession, C: Clock> Drop for RobotControlClient<S, C> {
    fn drop(&mut self) {
        if self.state == ActivationState::Active {
            self.session.disconnect();
        }
    }
}
