//! FRI session contract.
//!
//! A session is the real-time link to one robot controller. It is owned
//! exclusively by a hardware component and driven from a single thread:
//! one `read_cycle()`, one `update_command()` and one `write_cycle()` per
//! tick. The wire protocol behind it is not part of this contract.

use crate::hal::types::{RobotCommand, RobotState};
use thiserror::Error;

/// Error types reported by a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The link could not be established.
    #[error("connect to port {port} failed: {reason}")]
    ConnectFailed {
        /// Local FRI port.
        port: u16,
        /// Failure description.
        reason: String,
    },

    /// Exchange attempted without an open link.
    #[error("session not connected")]
    NotConnected,

    /// Receiving the state message failed.
    #[error("receive failed: {0}")]
    Receive(String),

    /// Sending the command message failed.
    #[error("send failed: {0}")]
    Send(String),
}

/// Real-time session with a robot controller.
///
/// # Cycle
///
/// 1. `read_cycle()` - blocks until the next state message arrives
/// 2. `robot_state()` - borrow the decoded state
/// 3. `update_command()` - hand over the command to transmit
/// 4. `write_cycle()` - send the command message
pub trait FriSession: Send {
    /// Session implementation name (e.g. "simulation").
    fn name(&self) -> &'static str;

    /// Open the link on `port`; `remote_host` restricts the accepted peer.
    fn connect(&mut self, port: u16, remote_host: Option<&str>) -> Result<(), SessionError>;

    /// Close the link. Must be safe to call when not connected.
    fn disconnect(&mut self);

    /// True while the link is open.
    fn is_connected(&self) -> bool;

    /// Receive and decode one state message.
    fn read_cycle(&mut self) -> Result<(), SessionError>;

    /// State decoded by the last successful `read_cycle()`.
    fn robot_state(&self) -> &RobotState;

    /// Stage the command for the next `write_cycle()`.
    fn update_command(&mut self, command: &RobotCommand);

    /// Encode and send the staged command.
    fn write_cycle(&mut self) -> Result<(), SessionError>;
}

impl<S: FriSession + ?Sized> FriSession for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn connect(&mut self, port: u16, remote_host: Option<&str>) -> Result<(), SessionError> {
        (**self).connect(port, remote_host)
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn read_cycle(&mut self) -> Result<(), SessionError> {
        (**self).read_cycle()
    }

    fn robot_state(&self) -> &RobotState {
        (**self).robot_state()
    }

    fn update_command(&mut self, command: &RobotCommand) {
        (**self).update_command(command)
    }

    fn write_cycle(&mut self) -> Result<(), SessionError> {
        (**self).write_cycle()
    }
}
