//! System-wide constants for the FRI workspace.
//!
//! Single source of truth for numeric limits and default values.

use static_assertions::const_assert;
use std::time::Duration;

/// Maximum number of joints a single manipulator exposes (LBR iiwa / Med).
pub const MAX_JOINTS: usize = 7;

/// Default FRI port on the robot controller.
pub const DEFAULT_FRI_PORT: u16 = 30200;

/// Default command downsample multiplier (recompute every tick).
pub const DEFAULT_RECEIVE_MULTIPLIER: u32 = 1;

/// Default hosting-loop cycle time in microseconds (1 kHz).
pub const CYCLE_TIME_US: u64 = 1000;

/// Backoff applied when `read()` is called on an inactive interface.
pub const NOT_ACTIVE_BACKOFF: Duration = Duration::from_millis(50);

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/fri/lbr.toml";

const_assert!(MAX_JOINTS > 0);
const_assert!(CYCLE_TIME_US > 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert_eq!(MAX_JOINTS, 7);
        assert!(DEFAULT_RECEIVE_MULTIPLIER >= 1);
        assert!(NOT_ACTIVE_BACKOFF < Duration::from_micros(CYCLE_TIME_US * 100));
    }
}
