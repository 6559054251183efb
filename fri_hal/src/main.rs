//! # FRI HAL Binary
//!
//! Runs the robot control client against the simulated FRI session under a
//! fixed-period hosting loop with a sine controller.
//!
//! # Usage
//!
//! ```bash
//! # Run with the sample configuration until Ctrl-C
//! fri_hal --config config/lbr_iiwa7.toml
//!
//! # Run 5000 cycles with verbose logging
//! fri_hal --config config/lbr_iiwa7.toml --cycles 5000 -v
//!
//! # JSON logs
//! fri_hal --config config/lbr_iiwa7.toml --json
//! ```

#![deny(warnings)]

use clap::Parser;
use fri_common::config::{BridgeConfig, ConfigLoader, LogLevel};
use fri_common::consts::DEFAULT_CONFIG_PATH;
use fri_common::hal::driver::HardwareInterface;
use fri_hal::client::RobotControlClient;
use fri_hal::controller::SineController;
use fri_hal::core::ControlLoop;
use fri_hal::drivers::simulation;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{error, info, info_span};
use tracing_subscriber::EnvFilter;

/// FRI HAL - real-time bridge between a control loop and a KUKA FRI session
#[derive(Parser, Debug)]
#[command(name = "fri_hal")]
#[command(version)]
#[command(about = "Real-time hardware bridge between a cyclic control loop and a KUKA FRI session")]
#[command(long_about = None)]
struct Args {
    /// Path to the bridge configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Stop after N cycles (overrides runner.max_cycles).
    #[arg(long, value_name = "N")]
    cycles: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("FRI HAL failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match BridgeConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            setup_tracing(&args, LogLevel::default());
            return Err(format!("failed to load {}: {}", args.config.display(), e).into());
        }
    };
    setup_tracing(&args, config.shared.log_level);
    config.validate()?;

    info!(
        "FRI HAL v{} starting ({})...",
        env!("CARGO_PKG_VERSION"),
        config.shared.service_name
    );

    let session = simulation::create_session(&config.hardware);
    let client = RobotControlClient::initialize(&config.hardware, session)?.with_span(info_span!(
        "robot_control_client",
        service = %config.shared.service_name,
        hardware = %config.hardware.name
    ));

    let controller = SineController::new(
        config.hardware.joints.iter().map(|j| j.name.clone()).collect(),
        config.runner.amplitude,
        config.runner.frequency_hz,
    );
    let period = Duration::from_micros(config.runner.cycle_time_us);
    let mut control_loop = ControlLoop::new(client, controller, period)?
        .with_max_cycles(args.cycles.or(config.runner.max_cycles));

    // Setup signal handler.
    let running = control_loop.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    control_loop.hardware_mut().activate()?;

    let result = control_loop.run();
    if let Err(e) = &result {
        error!("Control loop error: {}", e);
    }

    control_loop.hardware_mut().deactivate()?;

    let stats = control_loop.stats();
    info!(
        "FRI HAL shutdown complete: {} cycles, avg={}us, max={}us, command updates={}",
        stats.cycle_count,
        stats.avg_cycle_time_us(),
        stats.max_cycle_time_us,
        control_loop.hardware().command_updates()
    );
    result.map_err(Into::into)
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
