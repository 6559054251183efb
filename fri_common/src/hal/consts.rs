//! Hardware interface names.
//!
//! Interface handles are addressed as `<prefix>/<interface>`, e.g.
//! `joint_a1/position` or `timing/receive_multiplier`.

/// Position interface name.
pub const HW_IF_POSITION: &str = "position";

/// Effort (joint torque) interface name.
pub const HW_IF_EFFORT: &str = "effort";

/// Prefix of the session-phase state interface.
pub const FRI_STATE_PREFIX: &str = "state";

/// Session-phase state interface name.
pub const FRI_STATE_INTERFACE: &str = "fri_state";

/// Prefix of the downsample multiplier command interface.
pub const TIMING_PREFIX: &str = "timing";

/// Downsample multiplier command interface name.
pub const RECEIVE_MULTIPLIER_INTERFACE: &str = "receive_multiplier";

