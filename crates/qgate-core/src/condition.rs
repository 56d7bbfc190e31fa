//! Conditions and quality gates

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Comparison operator of a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "EQ")]
    Equals,
    #[serde(rename = "NE")]
    NotEquals,
    #[serde(rename = "GT")]
    GreaterThan,
    #[serde(rename = "LT")]
    LessThan,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::LessThan,
    ];

    /// Short code the operator is stored with
    pub fn db_value(&self) -> &'static str {
        match self {
            Self::Equals => "EQ",
            Self::NotEquals => "NE",
            Self::GreaterThan => "GT",
            Self::LessThan => "LT",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.db_value() == value)
    }

    /// Whether a value ordered `ordering` against a threshold breaches it.
    ///
    /// `None` means the two are not comparable (NaN); only NOT_EQUALS
    /// breaches then.
    pub fn is_breached_by(&self, ordering: Option<Ordering>) -> bool {
        match self {
            Self::Equals => ordering == Some(Ordering::Equal),
            Self::NotEquals => ordering != Some(Ordering::Equal),
            Self::GreaterThan => ordering == Some(Ordering::Greater),
            Self::LessThan => ordering == Some(Ordering::Less),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::GreaterThan => "GREATER_THAN",
            Self::LessThan => "LESS_THAN",
        };
        f.write_str(name)
    }
}

/// A pass/fail rule on one metric
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub metric_key: String,
    pub operator: Operator,
    pub error_threshold: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_threshold: Option<String>,
    /// Compare the leak value instead of the absolute value
    #[serde(default)]
    pub on_leak: bool,
}

impl Condition {
    pub fn new(
        metric_key: impl Into<String>,
        operator: Operator,
        error_threshold: impl Into<String>,
    ) -> Self {
        Self {
            metric_key: metric_key.into(),
            operator,
            error_threshold: error_threshold.into(),
            warning_threshold: None,
            on_leak: false,
        }
    }

    pub fn with_warning(mut self, warning_threshold: impl Into<String>) -> Self {
        self.warning_threshold = Some(warning_threshold.into());
        self
    }

    pub fn on_leak(mut self) -> Self {
        self.on_leak = true;
        self
    }

    /// Warning threshold, an empty string counting as absent
    pub fn warning_threshold(&self) -> Option<&str> {
        self.warning_threshold
            .as_deref()
            .filter(|threshold| !threshold.is_empty())
    }
}

/// A named set of conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityGate {
    pub id: String,
    pub name: String,
    pub conditions: Vec<Condition>,
}

impl QualityGate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, conditions: Vec<Condition>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            conditions,
        }
    }

    /// Gate wrapping a bare condition list
    pub fn ad_hoc(conditions: Vec<Condition>) -> Self {
        Self::new("ad-hoc", "Ad hoc conditions", conditions)
    }
}
