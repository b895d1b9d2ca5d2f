//! Aggregation views over the workqueue measures.
//!
//! Views must be registered with the recording engine before any data is
//! collected. Measures with no registered view are recorded but never
//! aggregated.

use super::measure::{
    Measure, QUEUE_ADDS, QUEUE_DEPTH, QUEUE_LATENCY, QUEUE_RETRIES, QUEUE_WORK_DURATION,
};
use super::tag::{TagKey, NAME};
use crate::error::ViewError;
use opentelemetry::Key;
use opentelemetry_sdk::metrics::{self as sdk, Instrument, Stream};

/// How recorded values combine into a reported metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregation {
    /// Running sum of every recorded value.
    Sum,
    /// Histogram over the given bucket boundaries.
    Distribution(&'static [f64]),
}

impl Aggregation {
    fn to_sdk(self) -> sdk::Aggregation {
        match self {
            Aggregation::Sum => sdk::Aggregation::Sum,
            Aggregation::Distribution(bounds) => sdk::Aggregation::ExplicitBucketHistogram {
                boundaries: bounds.to_vec(),
                record_min_max: true,
            },
        }
    }
}

/// A named binding of one measure and its tag keys to an aggregation.
#[derive(Debug, PartialEq)]
pub struct View {
    pub name: &'static str,
    pub description: &'static str,
    pub measure: &'static Measure,
    pub tag_keys: &'static [TagKey],
    pub aggregation: Aggregation,
}

impl View {
    /// Translate into an OpenTelemetry SDK view matching the instrument
    /// created for this view's measure.
    pub fn to_sdk_view(&self) -> Result<Box<dyn sdk::View>, ViewError> {
        let criteria = Instrument::new().name(self.measure.name());
        let mask = Stream::new()
            .name(self.name)
            .description(self.description)
            .aggregation(self.aggregation.to_sdk())
            .allowed_attribute_keys(self.tag_keys.iter().map(|k| Key::from_static_str(k.name())));
        sdk::new_view(criteria, mask).map_err(|source| ViewError::Sdk {
            view: self.name,
            source,
        })
    }
}

/// Millisecond bucket boundaries shared by the duration views.
pub static DEFAULT_MILLISECONDS_DISTRIBUTION: [f64; 41] = [
    0.0, 0.01, 0.05, 0.1, 0.3, 0.6, 0.8, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 13.0, 16.0,
    20.0, 25.0, 30.0, 40.0, 50.0, 65.0, 80.0, 100.0, 130.0, 160.0, 200.0, 250.0, 300.0, 400.0,
    500.0, 650.0, 800.0, 1000.0, 2000.0, 5000.0, 10000.0, 20000.0, 50000.0, 100000.0,
];

static NAME_ONLY: [TagKey; 1] = [NAME];

pub static QUEUE_DEPTH_VIEW: View = View {
    name: "opencensus.io/k8s/client-go/workqueue/depth",
    description: "Sum of items in the queue",
    measure: &QUEUE_DEPTH,
    tag_keys: &NAME_ONLY,
    aggregation: Aggregation::Sum,
};

pub static QUEUE_ADDS_VIEW: View = View {
    name: "opencensus.io/k8s/client-go/workqueue/adds",
    description: "Sum of items added to the queue",
    measure: &QUEUE_ADDS,
    tag_keys: &NAME_ONLY,
    aggregation: Aggregation::Sum,
};

pub static QUEUE_LATENCY_VIEW: View = View {
    name: "opencensus.io/k8s/client-go/workqueue/latency",
    description: "Distribution of how long items stay in the workqueue",
    measure: &QUEUE_LATENCY,
    tag_keys: &NAME_ONLY,
    aggregation: Aggregation::Distribution(&DEFAULT_MILLISECONDS_DISTRIBUTION),
};

// Exported as "workduration"; the measure is "work_duration".
pub static QUEUE_WORK_DURATION_VIEW: View = View {
    name: "opencensus.io/k8s/client-go/workqueue/workduration",
    description: "Distribution of how long items take to be processed",
    measure: &QUEUE_WORK_DURATION,
    tag_keys: &NAME_ONLY,
    aggregation: Aggregation::Distribution(&DEFAULT_MILLISECONDS_DISTRIBUTION),
};

pub static QUEUE_RETRIES_VIEW: View = View {
    name: "opencensus.io/k8s/client-go/workqueue/retries",
    description: "Sum of items re-added to the workqueue",
    measure: &QUEUE_RETRIES,
    tag_keys: &NAME_ONLY,
    aggregation: Aggregation::Sum,
};

/// The default views exported by this crate.
pub static DEFAULT_VIEWS: [&View; 5] = [
    &QUEUE_DEPTH_VIEW,
    &QUEUE_ADDS_VIEW,
    &QUEUE_LATENCY_VIEW,
    &QUEUE_WORK_DURATION_VIEW,
    &QUEUE_RETRIES_VIEW,
];
