// Fatal error taxonomy. A failed unit of work is data
// (Sample.latency = None), never an error.

use std::path::PathBuf;
use std::time::SystemTimeError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// Wall clock stepped behind the run start; second offsets are
    /// unusable, the run cannot continue.
    #[error("wall clock fault: {0}")]
    Clock(#[from] SystemTimeError),

    /// A report file could not be opened or written. Fatal for that
    /// output only; the sibling output is still attempted.
    #[error("failed to write {kind} report to {}: {source}", path.display())]
    Persist {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
