//! Logging and metrics setup for applications embedding the workqueue
//! metrics.

pub mod tracing;

use crate::config::MetricsConfig;
use crate::otel::{init_metrics, init_metrics_with_reader};
use opentelemetry_sdk::metrics::reader::MetricReader;

/// Initialize tracing at the configured log level and install the global
/// meter provider with the default views.
///
/// # Panics
///
/// Panics if tracing has already been initialized.
pub fn init(config: &MetricsConfig) {
    self::tracing::init_tracing(&config.log_level);
    init_metrics(config);
}

/// Like [`init`], with the meter provider collected by `reader`.
///
/// # Panics
///
/// Panics if tracing has already been initialized.
pub fn init_with_reader<R: MetricReader>(config: &MetricsConfig, reader: R) {
    self::tracing::init_tracing(&config.log_level);
    init_metrics_with_reader(config, reader);
}
