// Summary statistics over a result log.
//
// The two timeout policies are intentionally distinct per mode and must
// not be unified: send mode drops timeouts from mean/stddev, connect
// mode substitutes a fixed sentinel RTT so a timeout counts as a large
// but finite latency.

use std::time::Duration;

use crate::models::{ProbeMode, RunSummary, Sample};

/// Stand-in RTT for a timed-out connect probe, in the mode's native
/// unit (milliseconds).
pub const TIMEOUT_SENTINEL_MS: f64 = 999.0;

/// Compute the run summary over the full sample sequence.
///
/// `total_duration` is the wall-clock span of the run, independent of
/// the latency sum. An empty sequence yields an all-zero summary.
pub fn summarize(samples: &[Sample], mode: ProbeMode, total_duration: Duration) -> RunSummary {
    let sample_count = samples.len() as u64;

    let latencies_secs: Vec<f64> = match mode {
        // Send mode: failures contribute nothing to the latency stats.
        ProbeMode::Send => samples
            .iter()
            .filter_map(|s| s.latency)
            .map(|d| d.as_secs_f64())
            .collect(),
        // Connect mode: a timeout is the sentinel RTT, not an exclusion.
        ProbeMode::Connect => samples
            .iter()
            .map(|s| match s.latency {
                Some(d) => d.as_secs_f64(),
                None => TIMEOUT_SENTINEL_MS / 1_000.0,
            })
            .collect(),
    };

    let mean = mean_f64(&latencies_secs);
    let stddev = stddev_f64(&latencies_secs, mean);

    // All samples count here, failures included.
    let avg_per_unit = if sample_count == 0 {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(total_duration.as_secs_f64() / sample_count as f64)
    };

    RunSummary {
        sample_count,
        mean_latency: Duration::from_secs_f64(mean),
        stddev_latency: Duration::from_secs_f64(stddev),
        total_duration,
        avg_per_unit,
    }
}

fn mean_f64(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.iter().sum::<f64>() / (v.len() as f64)
}

/// Population standard deviation.
fn stddev_f64(v: &[f64], mean: f64) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    let variance = v.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (v.len() as f64);
    variance.sqrt()
}
