//! Progress reporting for the smoothing passes.
//!
//! Smoothing runs a fixed number of sweeps; a progress callback is told
//! after each completed sweep. Callbacks observe only, they cannot stop a
//! pass early.
//!
//! # Example
//!
//! ```
//! use mesh_field::progress::{Progress, ProgressCallback};
//!
//! let callback: ProgressCallback = Box::new(|progress: &Progress| {
//!     println!("{}% {}", progress.percent(), progress.message);
//! });
//! callback(&Progress::new(1, 4, "orientation sweep"));
//! ```

use std::time::{Duration, Instant};

/// Snapshot handed to a [`ProgressCallback`] after each sweep.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Sweeps finished so far in this pass.
    pub current: u64,
    /// Sweeps the pass will run in total.
    pub total: u64,
    /// Pass name with a `(current/total)` suffix.
    pub message: String,
    /// Wall time since the pass began.
    pub elapsed: Duration,
}

impl Progress {
    pub fn new(current: u64, total: u64, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
            elapsed: Duration::ZERO,
        }
    }

    /// Share of the pass that is done, in `[0, 1]`. An empty pass reports 0.
    pub fn fraction(&self) -> f64 {
        match self.total {
            0 => 0.0,
            total => self.current.min(total) as f64 / total as f64,
        }
    }

    /// [`fraction`](Self::fraction) rounded to whole percent.
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }
}

/// Observer of smoothing progress. Called on the smoothing thread.
pub type ProgressCallback = Box<dyn Fn(&Progress) + Send + Sync>;

/// Tracks sweeps of one pass and forwards them to an optional callback.
#[derive(Debug)]
pub(crate) struct SweepTracker {
    total: u64,
    stage: &'static str,
    start: Instant,
}

impl SweepTracker {
    pub(crate) fn new(total: usize, stage: &'static str) -> Self {
        Self {
            total: total as u64,
            stage,
            start: Instant::now(),
        }
    }

    /// Report that `completed` sweeps are done.
    pub(crate) fn report(&self, completed: usize, callback: Option<&ProgressCallback>) {
        crate::tracing_ext::log_progress(self.stage, completed, self.total as usize);
        if let Some(cb) = callback {
            let mut progress = Progress::new(
                completed as u64,
                self.total,
                format!("{} ({}/{})", self.stage, completed, self.total),
            );
            progress.elapsed = self.start.elapsed();
            cb(&progress);
        }
    }
}
