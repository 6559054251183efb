//! Hosting loop.
//!
//! `ControlLoop` drives one hardware component and one controller at a
//! fixed period: `read()` → `controller.update()` → `write()`, then sleeps
//! for the rest of the cycle. It stands in for the host framework's
//! controller manager.

use crate::controller::Controller;
use fri_common::hal::driver::{HalError, HardwareInterface};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// SCHED_FIFO priority requested with the `rt` feature.
pub const RT_PRIORITY: i32 = 80;

/// Hosting loop errors.
#[derive(Debug, Error)]
pub enum LoopError {
    /// The hardware component refused an operation.
    #[error("hardware error: {0}")]
    Hardware(#[from] HalError),

    /// Real-time setup failed.
    #[error("RT setup failed: {0}")]
    RtSetup(String),
}

/// Timing statistics for RT loop monitoring.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimingStats {
    /// Number of cycles executed
    pub cycle_count: u64,
    /// Number of cycles that exceeded the period
    pub overruns: u64,
    /// Maximum observed cycle time
    pub max_cycle_time_us: u64,
    /// Sum of cycle times for average calculation
    pub total_cycle_time_us: u64,
    /// Failed `read()` or `write()` calls
    pub io_errors: u64,
}

impl TimingStats {
    /// Average cycle time, zero before the first cycle.
    pub fn avg_cycle_time_us(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.total_cycle_time_us / self.cycle_count
        }
    }

    fn record(&mut self, cycle_time_us: u64, budget_us: u64) {
        self.cycle_count += 1;
        self.total_cycle_time_us += cycle_time_us;
        self.max_cycle_time_us = self.max_cycle_time_us.max(cycle_time_us);
        if cycle_time_us > budget_us {
            self.overruns += 1;
            if self.overruns <= 10 || self.overruns % 1000 == 0 {
                warn!(
                    "Timing violation #{}: cycle took {}us (target {}us)",
                    self.overruns, cycle_time_us, budget_us
                );
            }
        }
    }

    fn record_io_error(&mut self, what: &str, e: &HalError) {
        self.io_errors += 1;
        if self.io_errors <= 10 || self.io_errors % 1000 == 0 {
            warn!("{} failed (#{}): {}", what, self.io_errors, e);
        }
    }
}

/// Fixed-period loop over one hardware component and one controller.
pub struct ControlLoop<H: HardwareInterface, K: Controller> {
    hardware: H,
    controller: K,
    period: Duration,
    max_cycles: Option<u64>,
    running: Arc<AtomicBool>,
    stats: TimingStats,
}

impl<H: HardwareInterface, K: Controller> ControlLoop<H, K> {
    /// Bind `controller` to the handles exported by `hardware`.
    ///
    /// # Errors
    /// Returns the controller's configuration error.
    pub fn new(hardware: H, mut controller: K, period: Duration) -> Result<Self, LoopError> {
        let state = hardware.export_state_interfaces();
        let command = hardware.export_command_interfaces();
        controller.configure(&state, &command)?;

        info!(
            "Control loop created: hardware={}, controller={}, period={}us",
            hardware.name(),
            controller.name(),
            period.as_micros()
        );

        Ok(Self {
            hardware,
            controller,
            period,
            max_cycles: None,
            running: Arc::new(AtomicBool::new(false)),
            stats: TimingStats::default(),
        })
    }

    /// Stop after `cycles` cycles.
    pub fn with_max_cycles(mut self, cycles: Option<u64>) -> Self {
        self.max_cycles = cycles;
        self
    }

    /// Get the running flag for signal handlers.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Get timing statistics.
    pub fn stats(&self) -> TimingStats {
        self.stats
    }

    /// Hardware component.
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Hardware component, mutable (for lifecycle calls around `run()`).
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    /// Run until the running flag is cleared or the cycle limit is reached.
    ///
    /// Read failures skip the controller update and the write of that cycle.
    ///
    /// # Errors
    /// `LoopError::Hardware(HalError::NotActive)` when the component is not
    /// active; `LoopError::RtSetup` when RT setup fails.
    pub fn run(&mut self) -> Result<(), LoopError> {
        rt_setup(RT_PRIORITY)?;
        if detect_rt_mode() {
            info!("Running in real-time mode");
        } else {
            info!("Running in standard (non-RT) mode");
        }

        info!(
            "Starting control loop (cycle_time={}us)...",
            self.period.as_micros()
        );
        self.running.store(true, Ordering::SeqCst);

        let budget_us = self.period.as_micros() as u64;
        let loop_start = Instant::now();

        while self.running.load(Ordering::SeqCst) {
            if self
                .max_cycles
                .is_some_and(|max| self.stats.cycle_count >= max)
            {
                break;
            }

            let cycle_start = Instant::now();

            match self.hardware.read(cycle_start, self.period) {
                Ok(()) => {
                    self.controller
                        .update(cycle_start.duration_since(loop_start), self.period);
                    if let Err(e) = self.hardware.write(cycle_start, self.period) {
                        self.stats.record_io_error("write", &e);
                    }
                }
                Err(HalError::NotActive) => {
                    self.running.store(false, Ordering::SeqCst);
                    return Err(HalError::NotActive.into());
                }
                Err(e) => self.stats.record_io_error("read", &e),
            }

            let elapsed = cycle_start.elapsed();
            self.stats.record(elapsed.as_micros() as u64, budget_us);

            if elapsed < self.period {
                std::thread::sleep(self.period - elapsed);
            }

            if self.stats.cycle_count % 1000 == 0 {
                debug!(
                    "RT loop: {} cycles, avg={}us, max={}us, violations={}, io_errors={}",
                    self.stats.cycle_count,
                    self.stats.avg_cycle_time_us(),
                    self.stats.max_cycle_time_us,
                    self.stats.overruns,
                    self.stats.io_errors
                );
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!(
            "Control loop stopped after {} cycles (violations: {}, io errors: {})",
            self.stats.cycle_count, self.stats.overruns, self.stats.io_errors
        );
        Ok(())
    }
}

// ─── RT setup ───────────────────────────────────────────────────────

/// Lock all current and future memory pages.
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), LoopError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| LoopError::RtSetup(format!("mlockall failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), LoopError> {
    Ok(())
}

/// Set SCHED_FIFO with the given RT priority.
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), LoopError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(LoopError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_priority: i32) -> Result<(), LoopError> {
    Ok(())
}

/// Lock memory and switch to SCHED_FIFO before entering the loop.
pub fn rt_setup(priority: i32) -> Result<(), LoopError> {
    rt_mlockall()?;
    rt_set_scheduler(priority)
}

/// Detect if running in real-time mode by checking scheduler policy.
fn detect_rt_mode() -> bool {
    #[cfg(target_os = "linux")]
    {
        use libc::{SCHED_FIFO, SCHED_RR, sched_getscheduler};
        unsafe {
            let policy = sched_getscheduler(0);
            policy == SCHED_FIFO || policy == SCHED_RR
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_average_and_max() {
        let mut stats = TimingStats::default();
        assert_eq!(stats.avg_cycle_time_us(), 0);
        stats.record(100, 1000);
        stats.record(300, 1000);
        assert_eq!(stats.avg_cycle_time_us(), 200);
        assert_eq!(stats.max_cycle_time_us, 300);
        assert_eq!(stats.overruns, 0);
    }

    #[test]
    fn test_stats_overrun_counted() {
        let mut stats = TimingStats::default();
        stats.record(1500, 1000);
        stats.record(1000, 1000);
        assert_eq!(stats.overruns, 1);
    }

    #[test]
    fn test_stats_io_errors() {
        let mut stats = TimingStats::default();
        stats.record_io_error("read", &HalError::IoError("x".into()));
        assert_eq!(stats.io_errors, 1);
    }
}
