// Run orchestration: drives the sampler, owns the result log and the
// cancellation boundary. Every exit path - completion, interruption,
// fatal fault - goes through finalization, so whatever was measured is
// persisted.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::clock::RunClock;
use crate::error::RunError;
use crate::models::{ProbeMode, RunSummary};
use crate::probe::Probe;
use crate::report;
use crate::result_log::ResultLog;
use crate::sampler::Sampler;
use crate::stats;

/// Loop parameters for one run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub mode: ProbeMode,
    /// Total units of work to issue.
    pub total_units: u64,
    /// Units per iteration; 1 means per-unit timing.
    pub batch_size: u32,
    /// Pause between iterations; zero means back-to-back.
    pub interval: Duration,
    /// Emit a progress line every this many units.
    pub progress_every: u64,
    pub text_path: PathBuf,
    pub csv_path: PathBuf,
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub summary: RunSummary,
    pub interrupted: bool,
}

pub struct Runner<P: Probe> {
    plan: RunPlan,
    probe: P,
}

impl<P: Probe> Runner<P> {
    pub fn new(plan: RunPlan, probe: P) -> Self {
        Self { plan, probe }
    }

    /// Execute the run to completion or interruption, then finalize.
    ///
    /// Consumes the runner; a new run needs a new runner with a fresh
    /// log. The shutdown signal is honored only between iterations, so
    /// an in-flight batch always lands in the log before the run ends.
    pub async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) -> Result<RunReport, RunError> {
        let plan = self.plan;
        let clock = RunClock::start();
        let sampler = Sampler::new(&self.probe, &clock);
        let mut log = ResultLog::new();

        let mut interrupted = false;
        let mut fatal: Option<RunError> = None;
        let mut issued: u64 = 0;
        let mut next_progress = plan.progress_every;

        while issued < plan.total_units {
            // Iteration boundary: the only place the signal is honored.
            match shutdown_rx.try_recv() {
                Err(TryRecvError::Empty) => {}
                Ok(()) | Err(TryRecvError::Closed) => {
                    interrupted = true;
                    break;
                }
            }

            let remaining = plan.total_units - issued;
            let batch = (plan.batch_size as u64).min(remaining) as u32;

            match sampler.measure(batch, issued + 1).await {
                Ok(samples) => {
                    for sample in samples {
                        debug!(index = sample.index, latency = ?sample.latency, "sample");
                        log.append(sample);
                    }
                    issued += batch as u64;
                }
                Err(e) => {
                    fatal = Some(e);
                    break;
                }
            }

            if issued >= next_progress {
                info!(issued, total = plan.total_units, "progress");
                next_progress = (issued / plan.progress_every + 1) * plan.progress_every;
            }

            if issued >= plan.total_units {
                break;
            }

            // The pacing sleep is interruptible; appended samples are
            // already safe in the log.
            if plan.interval > Duration::ZERO {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => {
                        interrupted = true;
                        break;
                    }
                    _ = tokio::time::sleep(plan.interval) => {}
                }
            }
        }

        if interrupted {
            info!(samples = log.len(), "run interrupted, saving partial results");
        }
        if let Some(e) = &fatal {
            warn!(error = %e, samples = log.len(), "fatal fault, finalizing with partial results");
        }

        // Finalizing: summary and both reports, on every exit path.
        let total_duration = clock.elapsed();
        let summary = stats::summarize(log.snapshot(), plan.mode, total_duration);
        let persisted = report::write_reports(
            log.snapshot(),
            &summary,
            plan.mode,
            &plan.text_path,
            &plan.csv_path,
        );

        match (fatal, persisted) {
            (Some(e), _) => Err(e),
            (None, Err(e)) => Err(e),
            (None, Ok(())) => Ok(RunReport {
                summary,
                interrupted,
            }),
        }
    }
}
