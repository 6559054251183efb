//! Joint physics simulator.
//!
//! The `JointSimulator` moves one revolute joint towards its position
//! target with a trapezoidal velocity profile and reports the applied
//! torque as measured torque.

use std::time::Duration;
use tracing::trace;

/// Default joint velocity limit [rad/s].
pub const DEFAULT_MAX_VELOCITY: f64 = 1.7;

/// Default joint acceleration limit [rad/s²].
pub const DEFAULT_MAX_ACCELERATION: f64 = 10.0;

/// Single-joint motion simulator.
#[derive(Debug, Clone)]
pub struct JointSimulator {
    /// Current position [rad]
    position: f64,
    /// Current velocity [rad/s]
    velocity: f64,
    /// Position reference the joint tracks [rad]
    target_position: f64,
    /// Torque applied in the last step [Nm]
    torque: f64,
    /// Velocity limit [rad/s]
    max_velocity: f64,
    /// Acceleration limit [rad/s²]
    max_acceleration: f64,
}

impl JointSimulator {
    /// Create a joint at rest at `position`.
    pub fn new(position: f64) -> Self {
        Self {
            position,
            velocity: 0.0,
            target_position: position,
            torque: 0.0,
            max_velocity: DEFAULT_MAX_VELOCITY,
            max_acceleration: DEFAULT_MAX_ACCELERATION,
        }
    }

    /// Override velocity and acceleration limits.
    pub fn with_limits(mut self, max_velocity: f64, max_acceleration: f64) -> Self {
        self.max_velocity = max_velocity;
        self.max_acceleration = max_acceleration;
        self
    }

    /// Current position [rad].
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity [rad/s].
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Position reference [rad].
    pub fn target_position(&self) -> f64 {
        self.target_position
    }

    /// Last applied torque [Nm].
    pub fn torque(&self) -> f64 {
        self.torque
    }

    /// Advance one step towards `target` while applying `torque`.
    ///
    /// Non-finite targets are ignored and the previous target is kept.
    pub fn update(&mut self, target: f64, torque: f64, dt: Duration) {
        let dt_s = dt.as_secs_f64();
        if target.is_finite() {
            self.target_position = target;
        }
        self.torque = if torque.is_finite() { torque } else { 0.0 };

        if dt_s <= 0.0 {
            return;
        }

        let position_error = self.target_position - self.position;

        // Triangular profile: brake once inside the stopping distance.
        let stopping_distance = self.velocity * self.velocity / (2.0 * self.max_acceleration);
        let desired_velocity = if position_error.abs() <= stopping_distance {
            position_error.signum()
                * (2.0 * self.max_acceleration * position_error.abs())
                    .sqrt()
                    .min(self.max_velocity)
        } else {
            position_error.signum() * self.max_velocity
        };

        let max_vel_change = self.max_acceleration * dt_s;
        self.velocity += (desired_velocity - self.velocity).clamp(-max_vel_change, max_vel_change);
        self.velocity = self.velocity.clamp(-self.max_velocity, self.max_velocity);

        // Do not overshoot the target within one step.
        let step = self.velocity * dt_s;
        if step.abs() >= position_error.abs() {
            self.position = self.target_position;
            self.velocity = 0.0;
        } else {
            self.position += step;
        }

        trace!(
            "Joint: pos={:.4}, vel={:.4}, target={:.4}",
            self.position, self.velocity, self.target_position
        );
    }
}
