// Issues units of work and measures elapsed wall time around them.
//
// Batch timing measures one span for the whole batch and divides it
// evenly across units. No finer per-unit signal exists inside a batch;
// the even split is an accepted approximation.

use std::time::{Duration, Instant};

use crate::clock::RunClock;
use crate::error::RunError;
use crate::models::Sample;
use crate::probe::Probe;

pub struct Sampler<'a, P: Probe> {
    probe: &'a P,
    clock: &'a RunClock,
}

impl<'a, P: Probe> Sampler<'a, P> {
    pub fn new(probe: &'a P, clock: &'a RunClock) -> Self {
        Self { probe, clock }
    }

    /// Issue `batch_size` units and return one sample per unit, indexed
    /// from `start_index`. A failed unit never aborts the call; only a
    /// clock fault does. Every sample in the call shares one second
    /// offset, taken after the work completes.
    pub async fn measure(
        &self,
        batch_size: u32,
        start_index: u64,
    ) -> Result<Vec<Sample>, RunError> {
        debug_assert!(batch_size >= 1);

        if batch_size == 1 {
            let t0 = Instant::now();
            let succeeded = self.probe.attempt().await;
            let elapsed = t0.elapsed();
            let second_offset = self.clock.second_offset()?;
            return Ok(vec![Sample {
                index: start_index,
                latency: succeeded.then_some(elapsed),
                second_offset,
            }]);
        }

        let t0 = Instant::now();
        let succeeded = self.probe.attempt_batch(batch_size).await;
        let elapsed = t0.elapsed();
        let second_offset = self.clock.second_offset()?;
        Ok(apportion_batch(
            batch_size,
            succeeded,
            elapsed,
            start_index,
            second_offset,
        ))
    }
}

/// Split a batch's elapsed time evenly across its units.
///
/// The first `succeeded` units carry the per-unit share; the remainder
/// are recorded as failures.
pub fn apportion_batch(
    batch_size: u32,
    succeeded: u32,
    elapsed: Duration,
    start_index: u64,
    second_offset: u64,
) -> Vec<Sample> {
    let per_unit = elapsed / batch_size;
    (0..batch_size as u64)
        .map(|i| Sample {
            index: start_index + i,
            latency: (i < succeeded as u64).then_some(per_unit),
            second_offset,
        })
        .collect()
}
