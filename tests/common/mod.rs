// Shared test helpers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use netpulse::models::Sample;
use netpulse::probe::Probe;

/// Probe double with scripted outcomes; cycles through the script.
#[allow(dead_code)]
pub struct FakeProbe {
    outcomes: Vec<bool>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeProbe {
    pub fn always_ok() -> Self {
        Self::scripted(vec![true])
    }

    pub fn scripted(outcomes: Vec<bool>) -> Self {
        assert!(!outcomes.is_empty());
        Self {
            outcomes,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Probe for FakeProbe {
    async fn attempt(&self) -> bool {
        let i = self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes[i % self.outcomes.len()]
    }
}

/// Successful sample with a millisecond latency.
#[allow(dead_code)]
pub fn sample_ms(index: u64, latency_ms: u64, second_offset: u64) -> Sample {
    Sample {
        index,
        latency: Some(Duration::from_millis(latency_ms)),
        second_offset,
    }
}

/// Timed-out sample.
#[allow(dead_code)]
pub fn sample_timeout(index: u64, second_offset: u64) -> Sample {
    Sample {
        index,
        latency: None,
        second_offset,
    }
}
