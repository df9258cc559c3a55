use anyhow::{Context, Result};
use netpulse::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    tracing::info!(version = version::VERSION, "{} starting", version::NAME);

    let app_config = config::AppConfig::load()?;

    let addr = tokio::net::lookup_host((app_config.target.host.as_str(), app_config.target.port))
        .await
        .with_context(|| format!("resolving {}", app_config.target.host))?
        .next()
        .with_context(|| format!("no address found for {}", app_config.target.host))?;

    tracing::info!(
        addr = %addr,
        mode = ?app_config.run.mode,
        total_units = app_config.run.total_units,
        batch_size = app_config.run.batch_size,
        "run configured"
    );

    let plan = runner::RunPlan {
        mode: app_config.run.mode,
        total_units: app_config.run.total_units,
        batch_size: app_config.run.batch_size,
        interval: app_config.interval(),
        progress_every: app_config.run.progress_every,
        text_path: app_config.output.text_path.clone(),
        csv_path: app_config.output.csv_path.clone(),
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    });

    let report = match app_config.run.mode {
        models::ProbeMode::Send => {
            let probe = probe::DatagramSender::bind(addr, app_config.run.payload_bytes)
                .await
                .context("binding send socket")?;
            runner::Runner::new(plan, probe).run(shutdown_rx).await?
        }
        models::ProbeMode::Connect => {
            let probe = probe::TcpConnectProbe::new(addr, app_config.timeout());
            runner::Runner::new(plan, probe).run(shutdown_rx).await?
        }
    };

    tracing::info!(
        samples = report.summary.sample_count,
        interrupted = report.interrupted,
        total_secs = report.summary.total_duration.as_secs_f64(),
        "run finished"
    );

    Ok(())
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
