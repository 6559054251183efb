//! Command downsampler.
//!
//! Decouples the command computation rate from the I/O cycle rate: the
//! command is recomputed once every `multiplier` ticks. The multiplier
//! lives in a shared cell exported as `timing/receive_multiplier` and is
//! re-read on every tick.
//!
//! The trigger condition is `counter >= multiplier`. When the host lowers
//! the multiplier below the current count, the next tick fires and the
//! counter restarts from zero; the counter itself is never reset on a
//! multiplier change.

use fri_common::hal::interface::{InterfaceCell, SharedCell};
use std::sync::Arc;

/// Tick counter triggering command recomputation.
#[derive(Debug)]
pub struct CommandDownsampler {
    counter: u32,
    multiplier: SharedCell,
}

impl CommandDownsampler {
    /// Create a downsampler with an initial multiplier.
    pub fn new(initial_multiplier: u32) -> Self {
        Self {
            counter: 0,
            multiplier: Arc::new(InterfaceCell::new(f64::from(initial_multiplier))),
        }
    }

    /// Cell backing the multiplier command interface.
    pub fn multiplier_cell(&self) -> SharedCell {
        Arc::clone(&self.multiplier)
    }

    /// Multiplier currently in effect.
    #[inline]
    pub fn multiplier(&self) -> u32 {
        effective_multiplier(self.multiplier.get())
    }

    /// Ticks counted since the last trigger.
    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Restart counting from zero.
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Count one tick. Returns true when the command must be recomputed.
    #[inline]
    pub fn tick(&mut self) -> bool {
        self.counter = self.counter.saturating_add(1);
        if self.counter >= self.multiplier() {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}

/// Interpret the raw cell value: fractional values truncate, anything
/// non-finite or below one means "every tick".
#[inline]
fn effective_multiplier(raw: f64) -> u32 {
    if raw.is_finite() && raw >= 1.0 {
        raw as u32
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_multiplier_three_sequence() {
        let mut ds = CommandDownsampler::new(3);
        let mut counters = Vec::new();
        let mut fired = Vec::new();
        for _ in 0..3 {
            fired.push(ds.tick());
            counters.push(ds.counter());
        }
        assert_eq!(counters, vec![1, 2, 0]);
        assert_eq!(fired, vec![false, false, true]);
    }

    #[test]
    fn test_multiplier_one_fires_every_tick() {
        let mut ds = CommandDownsampler::new(1);
        assert!((0..10).all(|_| ds.tick()));
        assert_eq!(ds.counter(), 0);
    }

    #[test]
    fn test_reduction_below_counter_fires_next_tick() {
        let mut ds = CommandDownsampler::new(10);
        for _ in 0..5 {
            assert!(!ds.tick());
        }
        ds.multiplier_cell().set(2.0);
        assert!(ds.tick());
        assert_eq!(ds.counter(), 0);
        assert!(!ds.tick());
        assert!(ds.tick());
    }

    #[test]
    fn test_increase_extends_current_window() {
        let mut ds = CommandDownsampler::new(2);
        assert!(!ds.tick());
        ds.multiplier_cell().set(4.0);
        assert!(!ds.tick());
        assert!(!ds.tick());
        assert!(ds.tick());
    }

    #[test]
    fn test_effective_multiplier_edge_values() {
        assert_eq!(effective_multiplier(0.0), 1);
        assert_eq!(effective_multiplier(-3.0), 1);
        assert_eq!(effective_multiplier(f64::NAN), 1);
        assert_eq!(effective_multiplier(f64::INFINITY), 1);
        assert_eq!(effective_multiplier(2.9), 2);
        assert_eq!(effective_multiplier(1e12), u32::MAX);
    }

    #[test]
    fn test_reset() {
        let mut ds = CommandDownsampler::new(5);
        ds.tick();
        ds.tick();
        ds.reset();
        assert_eq!(ds.counter(), 0);
    }

    proptest! {
        #[test]
        fn prop_one_trigger_per_window(multiplier in 1u32..50, windows in 1u32..20) {
            let mut ds = CommandDownsampler::new(multiplier);
            let ticks = multiplier * windows;
            let mut triggers = 0u32;
            for _ in 0..ticks {
                if ds.tick() {
                    triggers += 1;
                }
                prop_assert!(ds.counter() < multiplier);
            }
            prop_assert_eq!(triggers, windows);
            prop_assert_eq!(ds.counter(), 0);
        }
    }
}
