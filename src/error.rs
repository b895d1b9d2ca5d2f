//! Error types and the process-wide error reporting capability.
//!
//! Sinks never return errors to the queue that drives them. Anything that
//! goes wrong while tagging a recording is handed to an [`ErrorHandler`]
//! and the recording proceeds.

use crate::stats::tag::MAX_TAG_LEN;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Failure to attach a dimension to a recording context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// Key is empty, too long, or contains non-printable characters.
    #[error("invalid tag key {key:?}: must be 1..={max} printable ASCII bytes", max = MAX_TAG_LEN)]
    InvalidKey { key: String },

    /// Value is too long or contains non-printable characters.
    #[error(
        "invalid value {value:?} for tag key {key:?}: must be at most {max} printable ASCII bytes",
        max = MAX_TAG_LEN
    )]
    InvalidValue { key: String, value: String },
}

/// Failure to translate a view into an OpenTelemetry SDK view.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("view {view}: {source}")]
    Sdk {
        view: &'static str,
        #[source]
        source: opentelemetry::metrics::MetricsError,
    },
}

/// Out-of-band sink for errors that have no caller to return to.
///
/// Implementations must not block and must not panic.
pub trait ErrorHandler: Send + Sync {
    fn handle_error(&self, err: &(dyn std::error::Error + 'static));
}

/// Default [`ErrorHandler`]: logs through `tracing`.
///
/// Reports arriving within `min_interval` of the last logged report are
/// counted instead of logged; the count is attached to the next line that
/// is emitted.
#[derive(Debug)]
pub struct TracingErrorHandler {
    min_interval: Duration,
    last_logged: Mutex<Option<Instant>>,
    suppressed: AtomicU64,
}

impl TracingErrorHandler {
    /// Default spacing between two logged reports.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1);

    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_logged: Mutex::new(None),
            suppressed: AtomicU64::new(0),
        }
    }

    /// Number of reports swallowed since the last logged one.
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Decide whether a report arriving at `now` gets logged.
    fn admit(&self, now: Instant) -> bool {
        // A poisoned or contended lock means another reporter is logging.
        let Ok(mut last) = self.last_logged.try_lock() else {
            return false;
        };
        match *last {
            Some(prev) if now.saturating_duration_since(prev) < self.min_interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

impl Default for TracingErrorHandler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl ErrorHandler for TracingErrorHandler {
    fn handle_error(&self, err: &(dyn std::error::Error + 'static)) {
        if !self.admit(Instant::now()) {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let suppressed = self.suppressed.swap(0, Ordering::Relaxed);
        if suppressed > 0 {
            tracing::error!(error = %err, suppressed, "Queue metrics error");
        } else {
            tracing::error!(error = %err, "Queue metrics error");
        }
    }
}
