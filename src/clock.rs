// Run-scoped timestamp source: monotonic clock for elapsed spans, wall
// clock for whole-second offsets.

use std::time::{Duration, Instant, SystemTime};

use crate::error::RunError;

/// Timing anchors recorded once when a run starts.
///
/// Elapsed durations come from the monotonic clock and cannot fail.
/// The whole-second offset comes from the wall clock and errors if the
/// wall clock has stepped behind the run start.
#[derive(Debug, Clone)]
pub struct RunClock {
    started_mono: Instant,
    started_wall: SystemTime,
}

impl RunClock {
    pub fn start() -> Self {
        Self {
            started_mono: Instant::now(),
            started_wall: SystemTime::now(),
        }
    }

    /// Monotonic time since run start.
    pub fn elapsed(&self) -> Duration {
        self.started_mono.elapsed()
    }

    /// Whole seconds of wall time since run start. Used to bucket
    /// samples for offline time-series analysis.
    pub fn second_offset(&self) -> Result<u64, RunError> {
        let elapsed = SystemTime::now().duration_since(self.started_wall)?;
        Ok(elapsed.as_secs())
    }
}
