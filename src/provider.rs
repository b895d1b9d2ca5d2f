//! Work queue metrics provider backed by the stats recorder.
//!
//! Each sink is bound to one measure and one queue name. Every call tags
//! the queue name and records a single data point. Tagging failures go to
//! the [`ErrorHandler`] and the data point is recorded anyway, without the
//! tag.

use crate::config::MetricsConfig;
use crate::error::{ErrorHandler, TracingErrorHandler};
use crate::otel::OtelRecorder;
use crate::stats::measure::{
    Measure, MeasurementValue, QUEUE_ADDS, QUEUE_DEPTH, QUEUE_LATENCY, QUEUE_RETRIES,
    QUEUE_WORK_DURATION,
};
use crate::stats::tag::{TagMap, NAME};
use crate::stats::Recorder;
use std::sync::Arc;
use workqueue_metrics::{CounterMetric, GaugeMetric, MetricsProvider, SummaryMetric};

/// Identity shared by all three sink shapes.
struct Binding {
    measure: &'static Measure,
    name: String,
    recorder: Arc<dyn Recorder>,
    errors: Arc<dyn ErrorHandler>,
}

impl Binding {
    fn record(&self, value: impl Into<MeasurementValue>) {
        let (tags, err) = TagMap::from_upserts([(NAME, self.name.as_str())]);
        if let Some(err) = err {
            self.errors.handle_error(&err);
        }
        self.recorder.record(&tags, self.measure.m(value));
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("measure", &self.measure.name())
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Queue depth: +1 on add, -1 on get.
#[derive(Debug)]
pub struct DepthGauge(Binding);

impl GaugeMetric for DepthGauge {
    fn inc(&self) {
        self.0.record(1_i64);
    }

    fn dec(&self) {
        self.0.record(-1_i64);
    }
}

/// Monotonic count (adds, retries).
#[derive(Debug)]
pub struct CountSink(Binding);

impl CounterMetric for CountSink {
    fn inc(&self) {
        self.0.record(1_i64);
    }
}

/// Duration observations in milliseconds, recorded unmodified.
#[derive(Debug)]
pub struct DurationSummary(Binding);

impl SummaryMetric for DurationSummary {
    fn observe(&self, value: f64) {
        self.0.record(value);
    }
}

/// [`MetricsProvider`] that records through a [`Recorder`].
#[derive(Clone)]
pub struct QueueMetricsProvider {
    recorder: Arc<dyn Recorder>,
    errors: Arc<dyn ErrorHandler>,
}

impl QueueMetricsProvider {
    pub fn new(recorder: Arc<dyn Recorder>, errors: Arc<dyn ErrorHandler>) -> Self {
        Self { recorder, errors }
    }

    /// Provider recording through the configured global meter, logging
    /// errors at the configured interval.
    pub fn from_config(config: &MetricsConfig) -> Self {
        Self::new(
            Arc::new(OtelRecorder::from_config(config)),
            Arc::new(config.error_handler()),
        )
    }

    fn bind(&self, measure: &'static Measure, name: &str) -> Binding {
        Binding {
            measure,
            name: name.to_string(),
            recorder: Arc::clone(&self.recorder),
            errors: Arc::clone(&self.errors),
        }
    }
}

impl std::fmt::Debug for QueueMetricsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueMetricsProvider").finish_non_exhaustive()
    }
}

impl MetricsProvider for QueueMetricsProvider {
    fn new_depth_metric(&self, name: &str) -> Box<dyn GaugeMetric> {
        Box::new(DepthGauge(self.bind(&QUEUE_DEPTH, name)))
    }

    fn new_adds_metric(&self, name: &str) -> Box<dyn CounterMetric> {
        Box::new(CountSink(self.bind(&QUEUE_ADDS, name)))
    }

    fn new_latency_metric(&self, name: &str) -> Box<dyn SummaryMetric> {
        Box::new(DurationSummary(self.bind(&QUEUE_LATENCY, name)))
    }

    fn new_work_duration_metric(&self, name: &str) -> Box<dyn SummaryMetric> {
        Box::new(DurationSummary(self.bind(&QUEUE_WORK_DURATION, name)))
    }

    fn new_retries_metric(&self, name: &str) -> Box<dyn CounterMetric> {
        Box::new(CountSink(self.bind(&QUEUE_RETRIES, name)))
    }
}

/// Provider covering every workqueue metric (depth, adds, latency, work
/// duration, retries), recorded through the global OpenTelemetry meter.
///
/// Register the default views before any data is collected, see
/// [`crate::otel::with_default_views`].
pub fn metrics_provider() -> QueueMetricsProvider {
    QueueMetricsProvider::new(
        Arc::new(OtelRecorder::global()),
        Arc::new(TracingErrorHandler::default()),
    )
}
