//! Named interface handles backed by shared scalar cells.
//!
//! A hardware component owns one `InterfaceCell` per exported value and
//! hands out `StateInterface` (read-only) and `CommandInterface`
//! (read-write) handles that share the cell. Cells are relaxed atomics:
//! no locking, last writer wins, a read never observes a torn `f64`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free storage for one `f64` value.
#[derive(Default)]
pub struct InterfaceCell(AtomicU64);

impl InterfaceCell {
    /// Create a cell holding `value`.
    pub fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Overwrite the value.
    #[inline]
    pub fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl fmt::Debug for InterfaceCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InterfaceCell").field(&self.get()).finish()
    }
}

/// Shared handle to a cell.
pub type SharedCell = Arc<InterfaceCell>;

/// Read-only handle to a measured value.
#[derive(Debug, Clone)]
pub struct StateInterface {
    prefix_name: String,
    interface_name: String,
    cell: SharedCell,
}

impl StateInterface {
    /// Create a handle over an existing cell.
    pub fn new(
        prefix_name: impl Into<String>,
        interface_name: impl Into<String>,
        cell: SharedCell,
    ) -> Self {
        Self {
            prefix_name: prefix_name.into(),
            interface_name: interface_name.into(),
            cell,
        }
    }

    /// Full name, `<prefix>/<interface>`.
    pub fn name(&self) -> String {
        format!("{}/{}", self.prefix_name, self.interface_name)
    }

    /// Prefix (joint name or group).
    pub fn prefix_name(&self) -> &str {
        &self.prefix_name
    }

    /// Interface name (`position`, `effort`, ...).
    pub fn interface_name(&self) -> &str {
        &self.interface_name
    }

    /// Current value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.cell.get()
    }
}

/// Read-write handle to a command value.
#[derive(Debug, Clone)]
pub struct CommandInterface {
    prefix_name: String,
    interface_name: String,
    cell: SharedCell,
}

impl CommandInterface {
    /// Create a handle over an existing cell.
    pub fn new(
        prefix_name: impl Into<String>,
        interface_name: impl Into<String>,
        cell: SharedCell,
    ) -> Self {
        Self {
            prefix_name: prefix_name.into(),
            interface_name: interface_name.into(),
            cell,
        }
    }

    /// Full name, `<prefix>/<interface>`.
    pub fn name(&self) -> String {
        format!("{}/{}", self.prefix_name, self.interface_name)
    }

    /// Prefix (joint name or group).
    pub fn prefix_name(&self) -> &str {
        &self.prefix_name
    }

    /// Interface name (`position`, `effort`, ...).
    pub fn interface_name(&self) -> &str {
        &self.interface_name
    }

    /// Current value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.cell.get()
    }

    /// Write a new command value.
    #[inline]
    pub fn set_value(&self, value: f64) {
        self.cell.set(value);
    }
}

/// Find a handle by its full name.
pub fn find_state<'a>(handles: &'a [StateInterface], name: &str) -> Option<&'a StateInterface> {
    handles.iter().find(|h| h.name() == name)
}

/// Find a handle by its full name.
pub fn find_command<'a>(
    handles: &'a [CommandInterface],
    name: &str,
) -> Option<&'a CommandInterface> {
    handles.iter().find(|h| h.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_roundtrip_special_values() {
        let cell = InterfaceCell::default();
        assert_eq!(cell.get(), 0.0);
        cell.set(-1.5);
        assert_eq!(cell.get(), -1.5);
        cell.set(f64::NAN);
        assert!(cell.get().is_nan());
    }

    #[test]
    fn test_handles_share_cell() {
        let cell: SharedCell = Arc::new(InterfaceCell::new(0.25));
        let cmd = CommandInterface::new("joint_a1", "position", Arc::clone(&cell));
        let state = StateInterface::new("joint_a1", "position", Arc::clone(&cell));

        assert_eq!(cmd.name(), "joint_a1/position");
        assert_eq!(state.value(), 0.25);

        cmd.set_value(1.0);
        assert_eq!(state.value(), 1.0);
        assert_eq!(cell.get(), 1.0);
    }

    #[test]
    fn test_find_by_name() {
        let cell: SharedCell = Arc::new(InterfaceCell::new(3.0));
        let handles = vec![
            CommandInterface::new("timing", "receive_multiplier", Arc::clone(&cell)),
            CommandInterface::new("joint_a1", "effort", Arc::new(InterfaceCell::default())),
        ];
        let found = find_command(&handles, "timing/receive_multiplier").unwrap();
        assert_eq!(found.value(), 3.0);
        assert!(find_command(&handles, "joint_a2/effort").is_none());
    }
}
