//! Measurement definitions for work queue metrics.
//!
//! The names below are exported series identifiers. Renaming any of them
//! breaks every consumer reading the exported data.

/// Unit of a measure, in UCUM notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Dimensionless,
    Milliseconds,
}

impl Unit {
    pub const fn as_str(self) -> &'static str {
        match self {
            Unit::Dimensionless => "1",
            Unit::Milliseconds => "ms",
        }
    }
}

/// Numeric type recorded against a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureKind {
    Int64,
    Float64,
}

/// A kind of number that can be recorded over time.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Measure {
    name: &'static str,
    description: &'static str,
    unit: Unit,
    kind: MeasureKind,
}

impl Measure {
    pub const fn int64(name: &'static str, description: &'static str, unit: Unit) -> Self {
        Self {
            name,
            description,
            unit,
            kind: MeasureKind::Int64,
        }
    }

    pub const fn float64(name: &'static str, description: &'static str, unit: Unit) -> Self {
        Self {
            name,
            description,
            unit,
            kind: MeasureKind::Float64,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn description(&self) -> &'static str {
        self.description
    }

    pub const fn unit(&self) -> Unit {
        self.unit
    }

    pub const fn kind(&self) -> MeasureKind {
        self.kind
    }

    /// Build a data point for this measure.
    ///
    /// Integer measures truncate fractional values toward zero.
    pub fn m(&'static self, value: impl Into<MeasurementValue>) -> Measurement {
        let value = match (self.kind, value.into()) {
            (MeasureKind::Int64, MeasurementValue::F64(v)) => MeasurementValue::I64(v as i64),
            (MeasureKind::Float64, MeasurementValue::I64(v)) => MeasurementValue::F64(v as f64),
            (_, v) => v,
        };
        Measurement {
            measure: self,
            value,
        }
    }
}

/// Value carried by a single data point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasurementValue {
    I64(i64),
    F64(f64),
}

impl MeasurementValue {
    pub fn as_f64(self) -> f64 {
        match self {
            MeasurementValue::I64(v) => v as f64,
            MeasurementValue::F64(v) => v,
        }
    }
}

impl From<i64> for MeasurementValue {
    fn from(v: i64) -> Self {
        MeasurementValue::I64(v)
    }
}

impl From<f64> for MeasurementValue {
    fn from(v: f64) -> Self {
        MeasurementValue::F64(v)
    }
}

/// One data point bound to the measure it was recorded against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub measure: &'static Measure,
    pub value: MeasurementValue,
}

/// Current depth of the workqueue.
pub static QUEUE_DEPTH: Measure = Measure::int64(
    "opencensus.io/k8s/client-go/workqueue/depth",
    "Current depth of the workqueue",
    Unit::Dimensionless,
);

/// Total number of items added to the queue.
pub static QUEUE_ADDS: Measure = Measure::int64(
    "opencensus.io/k8s/client-go/workqueue/adds",
    "Total number of items added to the queue",
    Unit::Dimensionless,
);

/// How long an item stays in a workqueue.
pub static QUEUE_LATENCY: Measure = Measure::float64(
    "opencensus.io/k8s/client-go/workqueue/latency",
    "How long an item stays in a workqueue",
    Unit::Milliseconds,
);

/// How long processing an item from a workqueue takes.
pub static QUEUE_WORK_DURATION: Measure = Measure::float64(
    "opencensus.io/k8s/client-go/workqueue/work_duration",
    "How long processing an item from a workqueue takes",
    Unit::Milliseconds,
);

/// Total number of items re-added to the workqueue.
pub static QUEUE_RETRIES: Measure = Measure::int64(
    "opencensus.io/k8s/client-go/workqueue/retries",
    "Total number of items re-added to the workqueue",
    Unit::Dimensionless,
);

/// Every workqueue measure, in provider order.
pub static ALL_MEASURES: [&Measure; 5] = [
    &QUEUE_DEPTH,
    &QUEUE_ADDS,
    &QUEUE_LATENCY,
    &QUEUE_WORK_DURATION,
    &QUEUE_RETRIES,
];
