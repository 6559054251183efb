//! Controllers driven by the hosting loop.
//!
//! A controller binds to the handles exported by a hardware component once,
//! then reads states and writes commands through them every cycle.

use fri_common::hal::consts::{HW_IF_EFFORT, HW_IF_POSITION};
use fri_common::hal::driver::HalError;
use fri_common::hal::interface::{CommandInterface, StateInterface, find_command, find_state};
use std::f64::consts::TAU;
use std::time::Duration;
use tracing::info;

/// Cyclic controller operating on exported interface handles.
pub trait Controller {
    /// Controller name for logs.
    fn name(&self) -> &str;

    /// Bind to the exported handles. Called once before the first update.
    ///
    /// # Errors
    /// `HalError::ConfigError` if a required handle is missing.
    fn configure(
        &mut self,
        state: &[StateInterface],
        command: &[CommandInterface],
    ) -> Result<(), HalError>;

    /// Compute new commands. `elapsed` is the time since the loop started.
    fn update(&mut self, elapsed: Duration, period: Duration);
}

struct SineBinding {
    position: StateInterface,
    position_cmd: CommandInterface,
    effort_cmd: CommandInterface,
    start: Option<f64>,
}

/// Moves every joint along `start + amplitude * sin(2π f t)`.
///
/// Start positions are captured from the measured positions on the first
/// update. Effort commands are held at zero.
pub struct SineController {
    joint_names: Vec<String>,
    amplitude: f64,
    frequency_hz: f64,
    bindings: Vec<SineBinding>,
}

impl SineController {
    /// Create a controller for the named joints.
    pub fn new(joint_names: Vec<String>, amplitude: f64, frequency_hz: f64) -> Self {
        Self {
            joint_names,
            amplitude,
            frequency_hz,
            bindings: Vec::new(),
        }
    }

    /// Position offset at `elapsed`.
    pub fn offset(&self, elapsed: Duration) -> f64 {
        self.amplitude * (TAU * self.frequency_hz * elapsed.as_secs_f64()).sin()
    }
}

impl Controller for SineController {
    fn name(&self) -> &str {
        "sine"
    }

    fn configure(
        &mut self,
        state: &[StateInterface],
        command: &[CommandInterface],
    ) -> Result<(), HalError> {
        let missing = |name: String| HalError::ConfigError(format!("missing handle '{name}'"));

        let mut bindings = Vec::with_capacity(self.joint_names.len());
        for joint in &self.joint_names {
            let position_name = format!("{joint}/{HW_IF_POSITION}");
            let effort_name = format!("{joint}/{HW_IF_EFFORT}");

            let position = find_state(state, &position_name)
                .ok_or_else(|| missing(position_name.clone()))?;
            let position_cmd = find_command(command, &position_name)
                .ok_or_else(|| missing(position_name.clone()))?;
            let effort_cmd =
                find_command(command, &effort_name).ok_or_else(|| missing(effort_name))?;

            bindings.push(SineBinding {
                position: position.clone(),
                position_cmd: position_cmd.clone(),
                effort_cmd: effort_cmd.clone(),
                start: None,
            });
        }

        info!(
            "Sine controller bound to {} joints (A={} rad, f={} Hz)",
            bindings.len(),
            self.amplitude,
            self.frequency_hz
        );
        self.bindings = bindings;
        Ok(())
    }

    fn update(&mut self, elapsed: Duration, _period: Duration) {
        let offset = self.offset(elapsed);
        for binding in &mut self.bindings {
            let start = *binding.start.get_or_insert(binding.position.value());
            binding.position_cmd.set_value(start + offset);
            binding.effort_cmd.set_value(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fri_common::hal::interface::InterfaceCell;
    use std::sync::Arc;

    fn handles(joint: &str, measured: f64) -> (Vec<StateInterface>, Vec<CommandInterface>) {
        let state = vec![StateInterface::new(
            joint,
            HW_IF_POSITION,
            Arc::new(InterfaceCell::new(measured)),
        )];
        let command = vec![
            CommandInterface::new(joint, HW_IF_POSITION, Arc::new(InterfaceCell::default())),
            CommandInterface::new(joint, HW_IF_EFFORT, Arc::new(InterfaceCell::new(9.0))),
        ];
        (state, command)
    }

    #[test]
    fn test_configure_missing_handle() {
        let (state, command) = handles("joint_a1", 0.0);
        let mut ctrl = SineController::new(vec!["joint_a2".into()], 0.1, 1.0);
        assert!(matches!(
            ctrl.configure(&state, &command),
            Err(HalError::ConfigError(_))
        ));
    }

    #[test]
    fn test_update_offsets_from_start_position() {
        let (state, command) = handles("joint_a1", 0.5);
        let mut ctrl = SineController::new(vec!["joint_a1".into()], 0.2, 1.0);
        ctrl.configure(&state, &command).unwrap();

        ctrl.update(Duration::ZERO, Duration::from_millis(1));
        assert!((command[0].value() - 0.5).abs() < 1e-12);
        assert_eq!(command[1].value(), 0.0);

        // Quarter period: peak of the sine.
        ctrl.update(Duration::from_millis(250), Duration::from_millis(1));
        assert!((command[0].value() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_start_captured_once() {
        let measured = Arc::new(InterfaceCell::new(1.0));
        let state = vec![StateInterface::new(
            "joint_a1",
            HW_IF_POSITION,
            Arc::clone(&measured),
        )];
        let (_, command) = handles("joint_a1", 0.0);
        let mut ctrl = SineController::new(vec!["joint_a1".into()], 0.0, 1.0);
        ctrl.configure(&state, &command).unwrap();
        ctrl.update(Duration::ZERO, Duration::from_millis(1));

        measured.set(3.0);
        ctrl.update(Duration::from_millis(1), Duration::from_millis(1));
        assert_eq!(command[0].value(), 1.0);
    }
}
