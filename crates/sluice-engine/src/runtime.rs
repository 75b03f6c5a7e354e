//! Accumulated compute-stage timing.

use std::time::Duration;

/// A pair of clock readings taken around one compute stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassTiming {
    /// Reading before the first cell entered the kernel.
    pub start: Duration,
    /// Reading after the kernel emitted its last cell.
    pub end: Duration,
}

impl PassTiming {
    /// `end - start`, clamped at zero.
    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

/// Running totals of compute-stage durations.
///
/// Accumulation only: a sample is never reset, only replaced with a fresh
/// one.
///
/// ```
/// use sluice_engine::RuntimeSample;
///
/// let mut sample = RuntimeSample::new();
/// sample.add_pass(3.0);
/// sample.add_pass(2.0);
/// assert_eq!(sample.total_runtime(), 5.0);
/// assert_eq!(sample.mean_speed(), 2.5);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeSample {
    makespan: f64,
    n_passes: u64,
}

impl RuntimeSample {
    /// An empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one pass that took `seconds`.
    pub fn add_pass(&mut self, seconds: f64) {
        self.makespan += seconds;
        self.n_passes += 1;
    }

    /// Record one pass from a pair of clock readings.
    pub fn add_pass_timing(&mut self, timing: PassTiming) {
        self.add_pass(timing.duration().as_secs_f64());
    }

    /// Sum of all recorded durations, in seconds.
    pub fn total_runtime(&self) -> f64 {
        self.makespan
    }

    /// Mean seconds per pass. NaN if no pass was recorded.
    pub fn mean_speed(&self) -> f64 {
        self.makespan / self.n_passes as f64
    }

    /// Number of recorded passes.
    pub fn n_passes(&self) -> u64 {
        self.n_passes
    }
}
