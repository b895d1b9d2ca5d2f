//! Test doubles for the recording engine and the error reporter.
//!
//! Provides:
//! - A recorder that captures every data point with its queue name tag
//! - An error handler that captures every reported error

#![allow(dead_code)]

use queuestat::stats::measure::{Measure, MeasurementValue};
use queuestat::stats::{Measurement, Recorder, TagMap};
use queuestat::{ErrorHandler, QueueMetricsProvider, NAME};
use std::sync::{Arc, Mutex};

/// One captured data point.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    /// Queue name tag, if it was attached
    pub queue: Option<String>,
    pub measure: &'static str,
    pub value: MeasurementValue,
}

/// Recorder that keeps every data point in submission order.
#[derive(Debug, Default)]
pub struct CapturingRecorder {
    recorded: Mutex<Vec<Recorded>>,
}

impl CapturingRecorder {
    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    /// Data points recorded against `measure`.
    pub fn for_measure(&self, measure: &Measure) -> Vec<Recorded> {
        self.recorded()
            .into_iter()
            .filter(|r| r.measure == measure.name())
            .collect()
    }
}

impl Recorder for CapturingRecorder {
    fn record(&self, tags: &TagMap, measurement: Measurement) {
        self.recorded.lock().unwrap().push(Recorded {
            queue: tags.value(&NAME).map(str::to_string),
            measure: measurement.measure.name(),
            value: measurement.value,
        });
    }
}

/// Error handler that keeps every reported error message.
#[derive(Debug, Default)]
pub struct CapturingErrorHandler {
    errors: Mutex<Vec<String>>,
}

impl CapturingErrorHandler {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl ErrorHandler for CapturingErrorHandler {
    fn handle_error(&self, err: &(dyn std::error::Error + 'static)) {
        self.errors.lock().unwrap().push(err.to_string());
    }
}

/// Provider wired to fresh capturing doubles.
pub struct Harness {
    pub provider: QueueMetricsProvider,
    pub recorder: Arc<CapturingRecorder>,
    pub errors: Arc<CapturingErrorHandler>,
}

impl Harness {
    pub fn new() -> Self {
        let recorder = Arc::new(CapturingRecorder::default());
        let errors = Arc::new(CapturingErrorHandler::default());
        let provider = QueueMetricsProvider::new(recorder.clone(), errors.clone());
        Self {
            provider,
            recorder,
            errors,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a condition to become true with timeout.
///
/// Returns `true` if the condition was met, `false` if the timeout expired.
pub async fn wait_for<F>(timeout: std::time::Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    false
}
