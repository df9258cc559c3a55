// Dual-format persistence: a human-readable text report and a CSV
// carrying the same values. The two outputs are independent at the
// write boundary; a fault in one never stops the other.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::RunError;
use crate::models::{ProbeMode, RunSummary, Sample};

/// Literal failure marker in the CSV latency column.
pub const CSV_TIMEOUT_MARKER: &str = "Timeout";

/// Latency rendered in the mode's native unit: microseconds with 3
/// decimals for sends, milliseconds with 2 decimals for connect RTTs.
pub fn format_latency(mode: ProbeMode, latency: Duration) -> String {
    match mode {
        ProbeMode::Send => format!("{:.3}", latency.as_secs_f64() * 1e6),
        ProbeMode::Connect => format!("{:.2}", latency.as_secs_f64() * 1e3),
    }
}

fn report_title(mode: ProbeMode) -> &'static str {
    match mode {
        ProbeMode::Send => "Send Timing Results",
        ProbeMode::Connect => "Connect Probe Results",
    }
}

fn latency_column(mode: ProbeMode) -> &'static str {
    match mode {
        ProbeMode::Send => "Elapsed_Usec",
        ProbeMode::Connect => "RTT_Ms",
    }
}

/// Write both outputs, attempting each independently. Written and
/// failed outputs are reported to the operator; the first failure is
/// returned after both attempts.
pub fn write_reports(
    samples: &[Sample],
    summary: &RunSummary,
    mode: ProbeMode,
    text_path: &Path,
    csv_path: &Path,
) -> Result<(), RunError> {
    let text_result = write_text(text_path, samples, summary, mode);
    match &text_result {
        Ok(()) => info!(path = %text_path.display(), samples = samples.len(), "text report written"),
        Err(e) => warn!(error = %e, path = %text_path.display(), "text report failed"),
    }

    let csv_result = write_csv(csv_path, samples, summary, mode);
    match &csv_result {
        Ok(()) => info!(path = %csv_path.display(), samples = samples.len(), "csv report written"),
        Err(e) => warn!(error = %e, path = %csv_path.display(), "csv report failed"),
    }

    if let Err(source) = text_result {
        return Err(RunError::Persist {
            kind: "text",
            path: text_path.to_path_buf(),
            source,
        });
    }
    if let Err(source) = csv_result {
        return Err(RunError::Persist {
            kind: "csv",
            path: csv_path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

/// Line-oriented report: title, one line per sample, blank separator,
/// then the summary. Written even for an empty run.
pub fn write_text(
    path: &Path,
    samples: &[Sample],
    summary: &RunSummary,
    mode: ProbeMode,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut w = BufWriter::new(File::create(path)?);

    writeln!(w, "{}", report_title(mode))?;
    writeln!(w, "============")?;
    for s in samples {
        match s.latency {
            Some(latency) => writeln!(
                w,
                "Sample #{}: {} {}",
                s.index,
                format_latency(mode, latency),
                mode.unit_label()
            )?,
            None => writeln!(w, "Sample #{}: timed out", s.index)?,
        }
    }
    writeln!(w)?;

    let metric = match mode {
        ProbeMode::Send => "Average send time",
        ProbeMode::Connect => "Average RTT",
    };
    writeln!(
        w,
        "{}: {} {}",
        metric,
        format_latency(mode, summary.mean_latency),
        mode.unit_label()
    )?;
    writeln!(
        w,
        "Std deviation: {} {}",
        format_latency(mode, summary.stddev_latency),
        mode.unit_label()
    )?;
    writeln!(
        w,
        "Total execution time: {:.3} seconds",
        summary.total_duration.as_secs_f64()
    )?;
    writeln!(
        w,
        "Average time per unit: {:.6} seconds",
        summary.avg_per_unit.as_secs_f64()
    )?;

    w.flush()
}

/// CSV report: header, one row per sample, a blank row, then summary
/// key/value rows. Timeouts render as the literal marker so the offline
/// analyzer can apply its own substitution policy.
pub fn write_csv(
    path: &Path,
    samples: &[Sample],
    summary: &RunSummary,
    mode: ProbeMode,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut w = BufWriter::new(File::create(path)?);

    writeln!(w, "Sample,{},Second", latency_column(mode))?;
    for s in samples {
        match s.latency {
            Some(latency) => writeln!(
                w,
                "{},{},{}",
                s.index,
                format_latency(mode, latency),
                s.second_offset
            )?,
            None => writeln!(w, "{},{},{}", s.index, CSV_TIMEOUT_MARKER, s.second_offset)?,
        }
    }
    writeln!(w)?;

    let avg_key = match mode {
        ProbeMode::Send => "Average_Elapsed_Usec",
        ProbeMode::Connect => "Average_RTT_Ms",
    };
    let stddev_key = match mode {
        ProbeMode::Send => "Std_Dev_Usec",
        ProbeMode::Connect => "Std_Dev_Ms",
    };
    writeln!(w, "{},{}", avg_key, format_latency(mode, summary.mean_latency))?;
    writeln!(
        w,
        "{},{}",
        stddev_key,
        format_latency(mode, summary.stddev_latency)
    )?;
    writeln!(w, "Total_Samples,{}", summary.sample_count)?;
    writeln!(
        w,
        "Total_Time_Seconds,{:.3}",
        summary.total_duration.as_secs_f64()
    )?;
    writeln!(
        w,
        "Avg_Time_Per_Unit_Usec,{:.3}",
        summary.avg_per_unit.as_secs_f64() * 1e6
    )?;

    w.flush()
}
