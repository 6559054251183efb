//! FRI session implementations.
//!
//! - [`simulation`] - In-process session for development and testing
//!
//! A network-backed session implements `FriSession` from
//! `fri_common::hal::session` and lives next to `simulation`.

pub mod simulation;
