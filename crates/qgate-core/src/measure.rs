//! Measures and the lookup the evaluator reads them through

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::metric::ValueType;

/// Snapshot of one metric on one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Value over the new code period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leak_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

impl Measure {
    /// A measure with no value at all
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            value: None,
            leak_value: None,
            string_value: None,
        }
    }

    pub fn int(value: i64) -> Self {
        Self::new(ValueType::Int).with_value(value as f64)
    }

    pub fn float(value: f64) -> Self {
        Self::new(ValueType::Float).with_value(value)
    }

    pub fn level(value: impl Into<String>) -> Self {
        Self::new(ValueType::Level).with_string_value(value)
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_leak_value(mut self, value: f64) -> Self {
        self.leak_value = Some(value);
        self
    }

    pub fn with_string_value(mut self, value: impl Into<String>) -> Self {
        self.string_value = Some(value.into());
        self
    }

    /// The numeric slot a condition compares against
    pub fn value_for(&self, on_leak: bool) -> Option<f64> {
        if on_leak {
            self.leak_value
        } else {
            self.value
        }
    }
}

/// Measure lookup by metric key
///
/// Implemented by whatever holds the measures of the component being
/// evaluated. The engine never caches what it reads.
pub trait MeasureLookup {
    fn get(&self, metric_key: &str) -> Option<&Measure>;
}

impl MeasureLookup for HashMap<String, Measure> {
    fn get(&self, metric_key: &str) -> Option<&Measure> {
        HashMap::get(self, metric_key)
    }
}

impl MeasureLookup for BTreeMap<String, Measure> {
    fn get(&self, metric_key: &str) -> Option<&Measure> {
        BTreeMap::get(self, metric_key)
    }
}

impl<T: MeasureLookup + ?Sized> MeasureLookup for &T {
    fn get(&self, metric_key: &str) -> Option<&Measure> {
        (**self).get(metric_key)
    }
}
