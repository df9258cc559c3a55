// Domain models: measured units, the derived run summary, probe mode.

use std::time::Duration;

use serde::Deserialize;

/// Which kind of unit of work a run issues. Selected in config
/// ([run].mode), never interactively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    /// Timed one-way datagram sends; latencies reported in microseconds.
    Send,
    /// Bounded-timeout TCP connect round trips; latencies reported in
    /// milliseconds.
    Connect,
}

impl ProbeMode {
    /// Unit label used in report output.
    pub fn unit_label(&self) -> &'static str {
        match self {
            ProbeMode::Send => "µs",
            ProbeMode::Connect => "ms",
        }
    }
}

/// One measured unit of work.
///
/// `latency: None` records a timeout/failure; the unit still occupies
/// its position in the run. Created once by the sampler, immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// 1-based position in the run, assigned at capture time.
    pub index: u64,
    /// Elapsed time attributed to this unit; `None` for a failed unit.
    pub latency: Option<Duration>,
    /// Whole seconds since run start when this sample was captured.
    /// Non-decreasing across the run.
    pub second_offset: u64,
}

/// Summary statistics computed once over the full result log at run
/// end. Recomputable on demand from the raw samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub sample_count: u64,
    pub mean_latency: Duration,
    pub stddev_latency: Duration,
    /// Wall-clock span of the whole run, not the sum of per-sample
    /// latencies.
    pub total_duration: Duration,
    /// total_duration / sample_count; failures count in the denominator.
    pub avg_per_unit: Duration,
}
