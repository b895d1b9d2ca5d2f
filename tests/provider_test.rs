//! Provider tests against a capturing recorder.
//!
//! Tests:
//! - Each sink records one tagged data point per call
//! - Values pass through unmodified
//! - Tagging failures are reported and the value is still recorded
//! - Sinks are safe under concurrent use

mod common;

use common::{Harness, Recorded};
use queuestat::stats::measure::{Measure, MeasurementValue};
use queuestat::{QUEUE_ADDS, QUEUE_DEPTH, QUEUE_LATENCY, QUEUE_RETRIES, QUEUE_WORK_DURATION};
use std::sync::Arc;
use std::thread;
use workqueue_metrics::{MetricsProvider, QueueMetrics};

fn point(queue: &str, measure: &Measure, value: MeasurementValue) -> Recorded {
    Recorded {
        queue: Some(queue.to_string()),
        measure: measure.name(),
        value,
    }
}

#[test]
fn test_every_role_records_one_tagged_point() {
    let h = Harness::new();
    let p = &h.provider;

    p.new_depth_metric("q").inc();
    p.new_adds_metric("q").inc();
    p.new_latency_metric("q").observe(1.0);
    p.new_work_duration_metric("q").observe(2.0);
    p.new_retries_metric("q").inc();

    assert_eq!(
        h.recorder.recorded(),
        vec![
            point("q", &QUEUE_DEPTH, MeasurementValue::I64(1)),
            point("q", &QUEUE_ADDS, MeasurementValue::I64(1)),
            point("q", &QUEUE_LATENCY, MeasurementValue::F64(1.0)),
            point("q", &QUEUE_WORK_DURATION, MeasurementValue::F64(2.0)),
            point("q", &QUEUE_RETRIES, MeasurementValue::I64(1)),
        ]
    );
    assert!(h.errors.errors().is_empty());
}

#[test]
fn test_depth_inc_inc_dec_preserves_order() {
    let h = Harness::new();
    let depth = h.provider.new_depth_metric("test_queue");

    depth.inc();
    depth.inc();
    depth.dec();

    let values: Vec<_> = h
        .recorder
        .for_measure(&QUEUE_DEPTH)
        .into_iter()
        .map(|r| {
            assert_eq!(r.queue.as_deref(), Some("test_queue"));
            r.value
        })
        .collect();
    assert_eq!(
        values,
        vec![
            MeasurementValue::I64(1),
            MeasurementValue::I64(1),
            MeasurementValue::I64(-1),
        ]
    );
}

#[test]
fn test_retries_sum_to_call_count() {
    let h = Harness::new();
    let retries = h.provider.new_retries_metric("jobs");

    for _ in 0..5 {
        retries.inc();
    }

    let recorded = h.recorder.for_measure(&QUEUE_RETRIES);
    assert_eq!(recorded.len(), 5);
    assert!(recorded.iter().all(|r| r.queue.as_deref() == Some("jobs")));
    let sum: f64 = recorded.iter().map(|r| r.value.as_f64()).sum();
    assert_eq!(sum, 5.0);
}

#[test]
fn test_summary_values_are_not_modified() {
    let h = Harness::new();
    let work = h.provider.new_work_duration_metric("q");

    for v in [0.0, -3.25, 1e-9, 250_000.0] {
        work.observe(v);
    }

    let values: Vec<_> = h
        .recorder
        .recorded()
        .into_iter()
        .map(|r| r.value)
        .collect();
    assert_eq!(
        values,
        vec![
            MeasurementValue::F64(0.0),
            MeasurementValue::F64(-3.25),
            MeasurementValue::F64(1e-9),
            MeasurementValue::F64(250_000.0),
        ]
    );
}

#[test]
fn test_queue_names_are_distinguishable() {
    let h = Harness::new();
    let a = h.provider.new_adds_metric("alpha");
    let b = h.provider.new_adds_metric("beta");

    a.inc();
    b.inc();
    a.inc();

    let queues: Vec<_> = h
        .recorder
        .for_measure(&QUEUE_ADDS)
        .into_iter()
        .filter_map(|r| r.queue)
        .collect();
    assert_eq!(queues, vec!["alpha", "beta", "alpha"]);
}

#[test]
fn test_tag_failure_is_reported_and_value_still_recorded() {
    let h = Harness::new();
    let bad_name = "x".repeat(300);
    let depth = h.provider.new_depth_metric(&bad_name);
    let latency = h.provider.new_latency_metric("tab\there");

    depth.inc();
    latency.observe(4.0);

    assert_eq!(
        h.recorder.recorded(),
        vec![
            Recorded {
                queue: None,
                measure: QUEUE_DEPTH.name(),
                value: MeasurementValue::I64(1),
            },
            Recorded {
                queue: None,
                measure: QUEUE_LATENCY.name(),
                value: MeasurementValue::F64(4.0),
            },
        ]
    );
    assert_eq!(h.errors.errors().len(), 2);
}

#[test]
fn test_queue_metrics_bundle() {
    let h = Harness::new();
    let metrics = QueueMetrics::new(&h.provider, "bundle");

    metrics.add();
    metrics.get(10.0);
    metrics.done(20.0);
    metrics.retry();

    let recorded = h.recorder.recorded();
    assert_eq!(recorded.len(), 6);
    assert!(recorded.iter().all(|r| r.queue.as_deref() == Some("bundle")));
    assert_eq!(h.recorder.for_measure(&QUEUE_DEPTH).len(), 2);
}

#[test]
fn test_concurrent_sinks() {
    let h = Harness::new();
    let depth: Arc<dyn workqueue_metrics::GaugeMetric> =
        Arc::from(h.provider.new_depth_metric("shared"));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let depth = Arc::clone(&depth);
            let adds = h.provider.new_adds_metric(&format!("worker-{i}"));
            thread::spawn(move || {
                for _ in 0..100 {
                    depth.inc();
                    adds.inc();
                    depth.dec();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let depth_points = h.recorder.for_measure(&QUEUE_DEPTH);
    assert_eq!(depth_points.len(), 1600);
    let net: f64 = depth_points.iter().map(|r| r.value.as_f64()).sum();
    assert_eq!(net, 0.0);
    assert_eq!(h.recorder.for_measure(&QUEUE_ADDS).len(), 800);
}
