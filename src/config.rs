//! Configuration for workqueue metrics.
//!
//! Supports:
//! - CLI arguments via clap, flattened into the host application's parser
//! - Environment variable overrides
//! - Sensible defaults for quick start

use crate::error::TracingErrorHandler;
use crate::otel::DEFAULT_METER_NAME;
use clap::Args;
use std::time::Duration;

/// Workqueue metrics options.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Name of the OpenTelemetry meter the workqueue instruments live on
    #[arg(long, env = "QUEUESTAT_METER_NAME", default_value = DEFAULT_METER_NAME)]
    pub meter_name: String,

    /// Minimum spacing between two logged metrics errors, in milliseconds
    #[arg(long, env = "QUEUESTAT_ERROR_LOG_INTERVAL_MS", default_value_t = 1)]
    pub error_log_interval_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl MetricsConfig {
    pub fn error_log_interval(&self) -> Duration {
        Duration::from_millis(self.error_log_interval_ms)
    }

    /// Error handler honoring the configured log interval.
    pub fn error_handler(&self) -> TracingErrorHandler {
        TracingErrorHandler::new(self.error_log_interval())
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            meter_name: DEFAULT_METER_NAME.into(),
            error_log_interval_ms: 1,
            log_level: "info".into(),
        }
    }
}
