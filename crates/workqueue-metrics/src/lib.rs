//! Metrics contract for rate-limited work queues.
//!
//! A queue asks its [`MetricsProvider`] for one sink per role when it is
//! created, then drives those sinks as items move through it:
//!
//! - depth: [`GaugeMetric`], incremented on add and decremented on get
//! - adds: [`CounterMetric`], incremented on every add
//! - latency: [`SummaryMetric`], time an item waited before being processed
//! - work duration: [`SummaryMetric`], time spent processing an item
//! - retries: [`CounterMetric`], incremented on every rate-limited re-add
//!
//! Sink calls have no return value. A provider must never make a queue
//! operation fail or block.

/// A metric that can go up and down.
pub trait GaugeMetric: Send + Sync {
    fn inc(&self);
    fn dec(&self);
}

/// A metric that only goes up.
pub trait CounterMetric: Send + Sync {
    fn inc(&self);
}

/// A metric that observes arbitrary values (durations in milliseconds).
pub trait SummaryMetric: Send + Sync {
    fn observe(&self, value: f64);
}

/// Factory for the sinks a named queue reports through.
pub trait MetricsProvider: Send + Sync {
    fn new_depth_metric(&self, name: &str) -> Box<dyn GaugeMetric>;
    fn new_adds_metric(&self, name: &str) -> Box<dyn CounterMetric>;
    fn new_latency_metric(&self, name: &str) -> Box<dyn SummaryMetric>;
    fn new_work_duration_metric(&self, name: &str) -> Box<dyn SummaryMetric>;
    fn new_retries_metric(&self, name: &str) -> Box<dyn CounterMetric>;
}

/// Provider used when no other provider is configured. Every sink discards
/// its input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetricsProvider;

#[derive(Debug, Default, Clone, Copy)]
struct Noop;

impl GaugeMetric for Noop {
    fn inc(&self) {}
    fn dec(&self) {}
}

impl CounterMetric for Noop {
    fn inc(&self) {}
}

impl SummaryMetric for Noop {
    fn observe(&self, _value: f64) {}
}

impl MetricsProvider for NoopMetricsProvider {
    fn new_depth_metric(&self, _name: &str) -> Box<dyn GaugeMetric> {
        Box::new(Noop)
    }

    fn new_adds_metric(&self, _name: &str) -> Box<dyn CounterMetric> {
        Box::new(Noop)
    }

    fn new_latency_metric(&self, _name: &str) -> Box<dyn SummaryMetric> {
        Box::new(Noop)
    }

    fn new_work_duration_metric(&self, _name: &str) -> Box<dyn SummaryMetric> {
        Box::new(Noop)
    }

    fn new_retries_metric(&self, _name: &str) -> Box<dyn CounterMetric> {
        Box::new(Noop)
    }
}

/// The full set of sinks owned by one queue instance.
///
/// Sinks live as long as the queue that requested them.
pub struct QueueMetrics {
    pub depth: Box<dyn GaugeMetric>,
    pub adds: Box<dyn CounterMetric>,
    pub latency: Box<dyn SummaryMetric>,
    pub work_duration: Box<dyn SummaryMetric>,
    pub retries: Box<dyn CounterMetric>,
}

impl QueueMetrics {
    /// Request every sink for the queue `name` from `provider`.
    pub fn new(provider: &dyn MetricsProvider, name: &str) -> Self {
        Self {
            depth: provider.new_depth_metric(name),
            adds: provider.new_adds_metric(name),
            latency: provider.new_latency_metric(name),
            work_duration: provider.new_work_duration_metric(name),
            retries: provider.new_retries_metric(name),
        }
    }

    /// Report an item entering the queue.
    pub fn add(&self) {
        self.adds.inc();
        self.depth.inc();
    }

    /// Report an item leaving the queue after waiting `waited_ms`.
    pub fn get(&self, waited_ms: f64) {
        self.depth.dec();
        self.latency.observe(waited_ms);
    }

    /// Report an item finishing processing after `worked_ms`.
    pub fn done(&self, worked_ms: f64) {
        self.work_duration.observe(worked_ms);
    }

    /// Report a rate-limited re-add.
    pub fn retry(&self) {
        self.retries.inc();
    }
}

impl std::fmt::Debug for QueueMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueMetrics").finish_non_exhaustive()
    }
}
