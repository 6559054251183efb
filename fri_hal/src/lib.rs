//! # FRI HAL Library
//!
//! Real-time hardware bridge between a cyclic control loop and a KUKA FRI
//! session.
//!
//! The hardware component ([`client::RobotControlClient`]) implements the
//! `HardwareInterface` trait defined in `fri_common::hal::driver` and owns
//! one `FriSession`.
//!
//! # Module Structure
//!
//! - [`client`] - Lifecycle, cyclic I/O and interface export
//! - [`command_mode`] - Position / torque command composition
//! - [`controller`] - Controllers driven by the hosting loop
//! - [`core`] - Hosting loop, timing statistics, RT setup
//! - [`downsampler`] - Command recomputation rate divider
//! - [`drivers`] - Session implementations
//! - [`joints`] - Per-joint interface storage
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       fri_hal (single crate)                     │
//! │  ┌─────────────┐    ┌──────────────────┐    ┌────────────────┐   │
//! │  │ Controller  │◄──►│ Interface cells  │◄──►│ RobotControl-  │   │
//! │  │ (ControlLoop)│   │ (fri_common)     │    │ Client         │   │
//! │  └─────────────┘    └──────────────────┘    └───────┬────────┘   │
//! │                                                     │            │
//! │                                                     ▼            │
//! │                                            ┌────────────────┐    │
//! │                                            │  FriSession    │    │
//! │                                            │  trait         │    │
//! │                                            └────────────────┘    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![deny(warnings)]
#![deny(missing_docs)]

pub mod client;
pub mod command_mode;
pub mod controller;
pub mod core;
pub mod downsampler;
pub mod drivers;
pub mod joints;

// Re-export key types for convenience
pub use crate::client::{RobotControlClient, Telemetry};
pub use crate::controller::{Controller, SineController};
pub use crate::core::{ControlLoop, LoopError, TimingStats};
pub use crate::downsampler::CommandDownsampler;
pub use crate::drivers::simulation::{FaultInjector, SimulatedSession, SimulationSettings};
pub use crate::joints::{JointRecord, JointSet};
