//! Per-joint storage cells.
//!
//! The joint set is allocated once at initialization and never resized.
//! Measured cells are written only by the client's `read()`; commanded
//! cells are written only by the host through exported command handles.

use fri_common::hal::config::JointInfo;
use fri_common::hal::interface::{InterfaceCell, SharedCell};
use std::sync::Arc;

/// Storage cells of one joint.
#[derive(Debug)]
pub struct JointRecord {
    name: String,
    pub(crate) measured_position: SharedCell,
    pub(crate) measured_effort: SharedCell,
    pub(crate) commanded_position: SharedCell,
    pub(crate) commanded_effort: SharedCell,
}

impl JointRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            measured_position: Arc::new(InterfaceCell::default()),
            measured_effort: Arc::new(InterfaceCell::default()),
            commanded_position: Arc::new(InterfaceCell::default()),
            commanded_effort: Arc::new(InterfaceCell::default()),
        }
    }

    /// Joint name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last measured position [rad].
    #[inline]
    pub fn measured_position(&self) -> f64 {
        self.measured_position.get()
    }

    /// Last measured torque [Nm].
    #[inline]
    pub fn measured_effort(&self) -> f64 {
        self.measured_effort.get()
    }

    /// Latest host position command [rad].
    #[inline]
    pub fn commanded_position(&self) -> f64 {
        self.commanded_position.get()
    }

    /// Latest host torque command [Nm].
    #[inline]
    pub fn commanded_effort(&self) -> f64 {
        self.commanded_effort.get()
    }
}

/// Ordered, fixed-size set of joint records.
#[derive(Debug)]
pub struct JointSet {
    joints: Vec<JointRecord>,
}

impl JointSet {
    /// Allocate one record per declared joint.
    pub fn new(joints: &[JointInfo]) -> Self {
        Self {
            joints: joints.iter().map(|j| JointRecord::new(&j.name)).collect(),
        }
    }

    /// Number of joints.
    #[inline]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// True if the set holds no joints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Iterate joints in robot order.
    pub fn iter(&self) -> std::slice::Iter<'_, JointRecord> {
        self.joints.iter()
    }

    /// Joint at `index`.
    pub fn get(&self, index: usize) -> Option<&JointRecord> {
        self.joints.get(index)
    }

    /// Copy measured values; both slices must hold at least `len()` entries.
    pub(crate) fn store_measured(&self, positions: &[f64], efforts: &[f64]) {
        for ((joint, &position), &effort) in self.joints.iter().zip(positions).zip(efforts) {
            joint.measured_position.set(position);
            joint.measured_effort.set(effort);
        }
    }

    /// Latest host position commands, in robot order.
    pub fn commanded_positions(&self) -> impl Iterator<Item = f64> + '_ {
        self.joints.iter().map(JointRecord::commanded_position)
    }

    /// Latest host torque commands, in robot order.
    pub fn commanded_efforts(&self) -> impl Iterator<Item = f64> + '_ {
        self.joints.iter().map(JointRecord::commanded_effort)
    }
}
