//! QGate Core: measures, conditions and metrics
//!
//! Immutable value types shared by the condition evaluator and its callers.
//! Nothing here performs I/O: measures arrive through [`MeasureLookup`],
//! metric definitions through [`MetricFinder`].

pub mod condition;
pub mod error;
pub mod measure;
pub mod metric;
pub mod rating;

pub use condition::{Condition, Operator, QualityGate};
pub use error::QualityGateError;
pub use measure::{Measure, MeasureLookup};
pub use metric::{keys, Direction, Metric, MetricCatalog, MetricFinder, ValueType};
pub use rating::Rating;
