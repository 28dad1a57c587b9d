//! Metrics emission contract.

use std::sync::Mutex;

/// Accepts named numeric metric records.
///
/// The retry client emits exactly one stream-outcome record per call chain.
/// Implementations must be safe for concurrent use.
pub trait MetricsSink: Send + Sync {
    /// Records one metric sample.
    fn record(&self, name: &str, value: f64);
}

/// Default sink that writes records to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMetrics;

impl MetricsSink for LogMetrics {
    fn record(&self, name: &str, value: f64) {
        log::info!("metric {}={}", name, value);
    }
}

/// Collecting sink for tests.
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    records: Mutex<Vec<(String, f64)>>,
}

impl RecordingMetrics {
    /// All records seen so far, in emission order.
    pub fn records(&self) -> Vec<(String, f64)> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl MetricsSink for RecordingMetrics {
    fn record(&self, name: &str, value: f64) {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((name.to_string(), value));
    }
}
