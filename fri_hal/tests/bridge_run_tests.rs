//! End-to-end runs from a configuration file.
//!
//! Loads a bridge config from disk, builds the client over the simulated
//! session and runs the hosting loop with the sine controller, as the
//! `fri_hal` binary does.

use fri_common::prelude::*;
use fri_hal::client::RobotControlClient;
use fri_hal::controller::SineController;
use fri_hal::core::ControlLoop;
use fri_hal::drivers::simulation::{self, SimulatedSession};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn load(control_mode: &str, multiplier: u32) -> BridgeConfig {
    let mut content = format!(
        r#"
[shared]
service_name = "fri-run-test"

[hardware]
name = "lbr_run"
control_mode = "{control_mode}"
receive_multiplier = {multiplier}

[runner]
cycle_time_us = 200
max_cycles = 60
amplitude = 0.1
frequency_hz = 2.0
"#
    );
    for i in 1..=7 {
        content.push_str(&format!(
            "\n[[hardware.joints]]\nname = \"joint_a{i}\"\ncommand_interfaces = [\"position\", \"effort\"]\nstate_interfaces = [\"position\", \"effort\"]\n"
        ));
    }

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bridge.toml");
    fs::write(&path, content).unwrap();
    let config = BridgeConfig::load(&path).unwrap();
    config.validate().unwrap();
    config
}

type BridgeLoop = ControlLoop<RobotControlClient<SimulatedSession>, SineController>;

fn run(config: &BridgeConfig) -> BridgeLoop {
    let session = simulation::create_session(&config.hardware);
    let mut client = RobotControlClient::initialize(&config.hardware, session).unwrap();
    client.activate().unwrap();

    let controller = SineController::new(
        config.hardware.joints.iter().map(|j| j.name.clone()).collect(),
        config.runner.amplitude,
        config.runner.frequency_hz,
    );
    let mut control_loop = ControlLoop::new(
        client,
        controller,
        Duration::from_micros(config.runner.cycle_time_us),
    )
    .unwrap()
    .with_max_cycles(config.runner.max_cycles);
    control_loop.run().unwrap();
    control_loop
}

#[test]
fn test_position_control_run() {
    let config = load("position_control", 1);
    let mut control_loop = run(&config);

    let client = control_loop.hardware();
    assert_eq!(control_loop.stats().cycle_count, 60);
    assert_eq!(client.command_updates(), 60);
    assert_eq!(client.session().counters().writes, 60);
    assert_eq!(
        client.session().robot_state().session_state,
        SessionState::CommandingActive
    );

    let sent = client.session().last_sent().unwrap();
    assert_eq!(sent.joint_position.len(), 7);
    assert!(sent.torque.is_none());

    control_loop.hardware_mut().deactivate().unwrap();
    assert!(!control_loop.hardware().session().is_connected());
}

#[test]
fn test_torque_control_run_with_downsampling() {
    let config = load("torque_control", 4);
    let control_loop = run(&config);

    let client = control_loop.hardware();
    assert_eq!(client.command_updates(), 15);
    assert_eq!(client.session().counters().writes, 60);

    let sent = client.session().last_sent().unwrap();
    assert_eq!(sent.torque.as_ref().unwrap().as_slice(), &[0.0; 7]);
}
