// Runner integration tests: full runs, batching, interruption paths

mod common;

use std::path::Path;
use std::time::Duration;

use common::FakeProbe;
use netpulse::models::ProbeMode;
use netpulse::runner::{RunPlan, Runner};

fn plan(dir: &Path, mode: ProbeMode, total_units: u64, batch_size: u32) -> RunPlan {
    RunPlan {
        mode,
        total_units,
        batch_size,
        interval: Duration::ZERO,
        progress_every: 1_000,
        text_path: dir.join("out.txt"),
        csv_path: dir.join("out.csv"),
    }
}

/// Data rows of the CSV body (between header and the blank separator).
fn csv_data_rows(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("read csv")
        .lines()
        .skip(1)
        .take_while(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect()
}

#[tokio::test]
async fn per_unit_run_completes_all_units() {
    let dir = tempfile::TempDir::new().unwrap();
    let plan = plan(dir.path(), ProbeMode::Connect, 5, 1);
    let csv_path = plan.csv_path.clone();
    let runner = Runner::new(plan, FakeProbe::always_ok());

    let (_shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let report = runner.run(shutdown_rx).await.expect("run");

    assert!(!report.interrupted);
    assert_eq!(report.summary.sample_count, 5);

    let rows = csv_data_rows(&csv_path);
    assert_eq!(rows.len(), 5);
    for (i, row) in rows.iter().enumerate() {
        assert!(row.starts_with(&format!("{},", i + 1)));
    }
}

#[tokio::test]
async fn batched_run_covers_total_units_with_short_final_batch() {
    let dir = tempfile::TempDir::new().unwrap();
    let plan = plan(dir.path(), ProbeMode::Send, 10, 4);
    let csv_path = plan.csv_path.clone();
    let probe = FakeProbe::always_ok();
    let runner = Runner::new(plan, probe);

    let (_shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let report = runner.run(shutdown_rx).await.expect("run");

    assert!(!report.interrupted);
    assert_eq!(report.summary.sample_count, 10);

    let rows = csv_data_rows(&csv_path);
    assert_eq!(rows.len(), 10);
    assert!(rows[0].starts_with("1,"));
    assert!(rows[9].starts_with("10,"));
}

#[tokio::test]
async fn failures_are_recorded_not_fatal() {
    let dir = tempfile::TempDir::new().unwrap();
    let plan = plan(dir.path(), ProbeMode::Connect, 4, 1);
    let csv_path = plan.csv_path.clone();
    // Alternate success/timeout.
    let runner = Runner::new(plan, FakeProbe::scripted(vec![true, false]));

    let (_shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let report = runner.run(shutdown_rx).await.expect("run");

    assert_eq!(report.summary.sample_count, 4);
    let rows = csv_data_rows(&csv_path);
    assert_eq!(rows.len(), 4);
    assert!(rows[1].contains("Timeout"));
    assert!(rows[3].contains("Timeout"));
}

#[tokio::test]
async fn interrupt_before_first_iteration_persists_empty_run() {
    let dir = tempfile::TempDir::new().unwrap();
    let plan = plan(dir.path(), ProbeMode::Connect, 100, 1);
    let text_path = plan.text_path.clone();
    let csv_path = plan.csv_path.clone();
    let runner = Runner::new(plan, FakeProbe::always_ok());

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    shutdown_tx.send(()).unwrap();
    let report = runner.run(shutdown_rx).await.expect("run");

    assert!(report.interrupted);
    assert_eq!(report.summary.sample_count, 0);
    assert!(text_path.exists());
    assert!(csv_path.exists());
    assert!(csv_data_rows(&csv_path).is_empty());
}

#[tokio::test]
async fn interrupt_during_pacing_sleep_persists_partial_results() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut plan = plan(dir.path(), ProbeMode::Connect, 1_000, 1);
    plan.interval = Duration::from_secs(60);
    let csv_path = plan.csv_path.clone();
    let runner = Runner::new(plan, FakeProbe::always_ok());

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = shutdown_tx.send(());
    });

    let report = runner.run(shutdown_rx).await.expect("run");

    assert!(report.interrupted);
    assert!(report.summary.sample_count >= 1);
    assert!(report.summary.sample_count < 1_000);

    let rows = csv_data_rows(&csv_path);
    assert_eq!(rows.len() as u64, report.summary.sample_count);
}

#[tokio::test]
async fn interrupted_batch_run_keeps_whole_batches_only() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut plan = plan(dir.path(), ProbeMode::Send, 1_000, 10);
    plan.interval = Duration::from_secs(60);
    let csv_path = plan.csv_path.clone();
    let runner = Runner::new(plan, FakeProbe::always_ok());

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = shutdown_tx.send(());
    });

    let report = runner.run(shutdown_rx).await.expect("run");

    assert!(report.interrupted);
    // The in-flight batch always completes; nothing is torn.
    assert_eq!(report.summary.sample_count % 10, 0);
    assert!(report.summary.sample_count >= 10);

    let rows = csv_data_rows(&csv_path);
    assert_eq!(rows.len() as u64, report.summary.sample_count);
}

#[tokio::test]
async fn summary_counts_match_persisted_rows_after_completion() {
    let dir = tempfile::TempDir::new().unwrap();
    let plan = plan(dir.path(), ProbeMode::Send, 12, 3);
    let text_path = plan.text_path.clone();
    let runner = Runner::new(plan, FakeProbe::always_ok());

    let (_shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let report = runner.run(shutdown_rx).await.expect("run");

    let text = std::fs::read_to_string(&text_path).unwrap();
    let sample_lines = text.lines().filter(|l| l.starts_with("Sample #")).count();
    assert_eq!(sample_lines as u64, report.summary.sample_count);
    assert_eq!(report.summary.sample_count, 12);
}
