//! OpenTelemetry recording engine.
//!
//! Each workqueue measure maps to one instrument:
//! - depth: `i64` up-down counter
//! - adds, retries: `u64` counter
//! - latency, work duration: `f64` histogram
//!
//! The default views rename streams and set the millisecond buckets. They
//! are installed on the meter provider, not on the recorder.

use crate::config::MetricsConfig;
use crate::error::ViewError;
use crate::stats::measure::{
    Measure, MeasurementValue, QUEUE_ADDS, QUEUE_DEPTH, QUEUE_LATENCY, QUEUE_RETRIES,
    QUEUE_WORK_DURATION,
};
use crate::stats::view::DEFAULT_VIEWS;
use crate::stats::{Measurement, Recorder, TagMap};
use opentelemetry::global;
use opentelemetry::metrics::{Counter, Histogram, Meter, UpDownCounter};
use opentelemetry_sdk::metrics::reader::MetricReader;
use opentelemetry_sdk::metrics::{ManualReader, MeterProviderBuilder, SdkMeterProvider, View};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Meter name used when none is configured.
pub const DEFAULT_METER_NAME: &str = "workqueue";

enum Instrument {
    UpDown(UpDownCounter<i64>),
    Counter(Counter<u64>),
    Histogram(Histogram<f64>),
}

#[derive(Clone, Copy)]
enum Shape {
    UpDown,
    Counter,
    Histogram,
}

static SHAPES: [(&Measure, Shape); 5] = [
    (&QUEUE_DEPTH, Shape::UpDown),
    (&QUEUE_ADDS, Shape::Counter),
    (&QUEUE_LATENCY, Shape::Histogram),
    (&QUEUE_WORK_DURATION, Shape::Histogram),
    (&QUEUE_RETRIES, Shape::Counter),
];

impl Instrument {
    fn new(meter: &Meter, measure: &'static Measure, shape: Shape) -> Self {
        let (name, description, unit) = (
            measure.name(),
            measure.description(),
            measure.unit().as_str(),
        );
        match shape {
            Shape::UpDown => Instrument::UpDown(
                meter
                    .i64_up_down_counter(name)
                    .with_description(description)
                    .with_unit(unit)
                    .init(),
            ),
            Shape::Counter => Instrument::Counter(
                meter
                    .u64_counter(name)
                    .with_description(description)
                    .with_unit(unit)
                    .init(),
            ),
            Shape::Histogram => Instrument::Histogram(
                meter
                    .f64_histogram(name)
                    .with_description(description)
                    .with_unit(unit)
                    .init(),
            ),
        }
    }
}

/// [`Recorder`] that forwards data points to OpenTelemetry instruments.
pub struct OtelRecorder {
    instruments: HashMap<&'static str, Instrument>,
}

impl OtelRecorder {
    /// Create instruments for every workqueue measure on `meter`.
    pub fn new(meter: &Meter) -> Self {
        let instruments = SHAPES
            .iter()
            .map(|&(measure, shape)| (measure.name(), Instrument::new(meter, measure, shape)))
            .collect();
        Self { instruments }
    }

    /// Create instruments on the global meter provider.
    pub fn global() -> Self {
        Self::new(&global::meter(DEFAULT_METER_NAME))
    }

    /// Create instruments on the global provider's meter named in `config`.
    pub fn from_config(config: &MetricsConfig) -> Self {
        Self::new(&global::meter(Box::leak(config.meter_name.clone().into_boxed_str())))
    }
}

impl std::fmt::Debug for OtelRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.instruments.keys().collect();
        names.sort();
        f.debug_struct("OtelRecorder")
            .field("instruments", &names)
            .finish()
    }
}

impl Recorder for OtelRecorder {
    fn record(&self, tags: &TagMap, measurement: Measurement) {
        let name = measurement.measure.name();
        let Some(instrument) = self.instruments.get(name) else {
            tracing::debug!(measure = name, "No instrument for measure, dropping");
            return;
        };

        let attrs = tags.to_attributes();
        match (instrument, measurement.value) {
            (Instrument::UpDown(c), MeasurementValue::I64(v)) => c.add(v, &attrs),
            (Instrument::Counter(c), MeasurementValue::I64(v)) => match u64::try_from(v) {
                Ok(v) => c.add(v, &attrs),
                Err(_) => {
                    tracing::warn!(measure = name, value = v, "Negative value for counter, dropping");
                }
            },
            (Instrument::Histogram(h), value) => h.record(value.as_f64(), &attrs),
            (_, MeasurementValue::F64(v)) => {
                tracing::warn!(measure = name, value = v, "Float value for integer instrument, dropping");
            }
        }
    }
}

/// SDK translation of every default view.
pub fn default_sdk_views() -> Result<Vec<Box<dyn View>>, ViewError> {
    DEFAULT_VIEWS.iter().map(|view| view.to_sdk_view()).collect()
}

/// Register the SDK translation of every default view on `builder`.
pub fn with_default_views(
    mut builder: MeterProviderBuilder,
) -> Result<MeterProviderBuilder, ViewError> {
    for view in default_sdk_views()? {
        builder = builder.with_view(view);
    }
    Ok(builder)
}

static PROVIDER: OnceLock<()> = OnceLock::new();

/// Install a global meter provider with the default views and a manual
/// reader.
///
/// No handle to the reader is kept, so the aggregates can never be
/// collected: this is a no-op sink. Use [`init_metrics_with_reader`] or build
/// your own provider with [`with_default_views`] to read the data.
pub fn init_metrics(config: &MetricsConfig) {
    init_metrics_with_reader(config, ManualReader::builder().build());
}

/// Install a global meter provider with the default views, collected by
/// `reader`.
///
/// This should be called once at startup. Subsequent calls are ignored and
/// drop `reader`.
pub fn init_metrics_with_reader<R: MetricReader>(config: &MetricsConfig, reader: R) {
    PROVIDER.get_or_init(|| {
        let mut builder = SdkMeterProvider::builder().with_reader(reader);
        match default_sdk_views() {
            Ok(views) => {
                for view in views {
                    builder = builder.with_view(view);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to register default views, aggregating raw instruments");
            }
        }
        global::set_meter_provider(builder.build());
        tracing::info!(meter = %config.meter_name, "Workqueue metrics initialized");
    });
}
