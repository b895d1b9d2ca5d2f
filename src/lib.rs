//! Queuestat: OpenTelemetry-backed metrics for rate-limited work queues.
//!
//! Implements the [`workqueue_metrics::MetricsProvider`] contract. Every
//! depth, adds, latency, work duration and retries call made by a queue is
//! recorded as one data point tagged with the queue's name.
//!
//! # Usage
//!
//! ```no_run
//! use queuestat::config::MetricsConfig;
//! use workqueue_metrics::QueueMetrics;
//!
//! // Views must be registered before any data is collected.
//! queuestat::observability::init(&MetricsConfig::default());
//!
//! let provider = queuestat::metrics_provider();
//! let metrics = QueueMetrics::new(&provider, "test_queue");
//! metrics.add();
//! ```
//!
//! # Modules
//!
//! - [`config`]: CLI and environment configuration
//! - [`error`]: Tag errors and the error reporting capability
//! - [`observability`]: Tracing and meter provider setup
//! - [`otel`]: OpenTelemetry recorder and view registration
//! - [`provider`]: The metrics provider and its sinks
//! - [`stats`]: Measures, tags and views

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions, // stats::measure::Measure is fine
    clippy::must_use_candidate,      // Not all functions need #[must_use]
    clippy::missing_errors_doc       // Error docs can be verbose
)]

pub mod config;
pub mod error;
pub mod observability;
pub mod otel;
pub mod provider;
pub mod stats;

pub use error::{ErrorHandler, TagError, TracingErrorHandler};
pub use provider::{metrics_provider, QueueMetricsProvider};
pub use stats::measure::{
    QUEUE_ADDS, QUEUE_DEPTH, QUEUE_LATENCY, QUEUE_RETRIES, QUEUE_WORK_DURATION,
};
pub use stats::tag::{NAME, NAME_ATTRIBUTE};
pub use stats::view::{
    DEFAULT_MILLISECONDS_DISTRIBUTION, DEFAULT_VIEWS, QUEUE_ADDS_VIEW, QUEUE_DEPTH_VIEW,
    QUEUE_LATENCY_VIEW, QUEUE_RETRIES_VIEW, QUEUE_WORK_DURATION_VIEW,
};
pub use stats::Recorder;
