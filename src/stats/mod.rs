//! Measures, tags and views for work queue metrics.
//!
//! - [`measure`]: the five workqueue measures
//! - [`tag`]: the queue name dimension and tag maps
//! - [`view`]: default aggregations for bulk registration

pub mod measure;
pub mod tag;
pub mod view;

pub use measure::{Measure, Measurement, MeasurementValue};
pub use tag::{TagKey, TagMap};
pub use view::{Aggregation, View};

/// Recording engine capability.
///
/// Takes one data point and the tags it is recorded under. Recording is
/// fire-and-forget: implementations swallow their own failures and must be
/// safe to call from any number of threads at once.
pub trait Recorder: Send + Sync {
    fn record(&self, tags: &TagMap, measurement: Measurement);
}
