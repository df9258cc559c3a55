use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::models::ProbeMode;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub target: TargetConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    80
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// "send" (timed datagram sends) or "connect" (RTT probes).
    pub mode: ProbeMode,
    /// Total units of work to issue over the run.
    pub total_units: u64,
    /// Units issued per iteration; 1 gives per-unit timing, larger
    /// values amortize per-call overhead and split the batch time
    /// evenly.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Pause between iterations in seconds. Pacing for connect mode;
    /// leave 0 for back-to-back sends.
    #[serde(default)]
    pub interval_secs: u64,
    /// Per-probe connect timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Datagram payload size in bytes (send mode).
    #[serde(default = "default_payload_bytes")]
    pub payload_bytes: usize,
    /// Emit a progress log line every this many units.
    #[serde(default = "default_progress_every")]
    pub progress_every: u64,
}

fn default_batch_size() -> u32 {
    1
}

fn default_timeout_ms() -> u64 {
    1_000
}

fn default_payload_bytes() -> usize {
    992
}

fn default_progress_every() -> u64 {
    1_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub text_path: PathBuf,
    pub csv_path: PathBuf,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.run.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.run.timeout_ms)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.target.host.is_empty(), "target.host must be non-empty");
        anyhow::ensure!(
            self.target.port > 0,
            "target.port must be between 1 and 65535, got {}",
            self.target.port
        );
        anyhow::ensure!(
            self.run.total_units > 0,
            "run.total_units must be > 0, got {}",
            self.run.total_units
        );
        anyhow::ensure!(
            self.run.batch_size > 0,
            "run.batch_size must be > 0, got {}",
            self.run.batch_size
        );
        anyhow::ensure!(
            self.run.timeout_ms > 0,
            "run.timeout_ms must be > 0, got {}",
            self.run.timeout_ms
        );
        anyhow::ensure!(
            self.run.payload_bytes > 0,
            "run.payload_bytes must be > 0, got {}",
            self.run.payload_bytes
        );
        anyhow::ensure!(
            self.run.progress_every > 0,
            "run.progress_every must be > 0, got {}",
            self.run.progress_every
        );
        anyhow::ensure!(
            !self.output.text_path.as_os_str().is_empty(),
            "output.text_path must be non-empty"
        );
        anyhow::ensure!(
            !self.output.csv_path.as_os_str().is_empty(),
            "output.csv_path must be non-empty"
        );
        Ok(())
    }
}
