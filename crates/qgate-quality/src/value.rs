//! Numeric domains
//!
//! Each evaluable [`ValueType`] maps to one [`Domain`], which owns how a
//! threshold string is parsed, how a measure value is read and how both are
//! compared and rendered.

use qgate_core::{Measure, QualityGateError, ValueType};
use std::cmp::Ordering;
use thiserror::Error;

/// Parse/compare strategy of a value type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// INT, MILLISEC, WORK_DUR: truncated toward zero
    Integer,
    /// FLOAT, PERCENT
    Decimal,
    /// RATING: integers 1 (A) to 5 (E)
    Rating,
    /// BOOL: 0 or 1
    Bool,
    /// LEVEL: string value, equality only
    Level,
}

/// A value ready for comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Comparable {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

/// A threshold that does not belong to the expected domain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{raw}' is not a valid {expected} value")]
pub struct ParseThresholdError {
    pub raw: String,
    pub expected: &'static str,
}

impl Domain {
    pub fn of(value_type: ValueType) -> Result<Self, QualityGateError> {
        match value_type {
            ValueType::Int | ValueType::Millisec | ValueType::WorkDur => Ok(Self::Integer),
            ValueType::Float | ValueType::Percent => Ok(Self::Decimal),
            ValueType::Rating => Ok(Self::Rating),
            ValueType::Bool => Ok(Self::Bool),
            ValueType::Level => Ok(Self::Level),
            ValueType::String | ValueType::Data => {
                Err(QualityGateError::UnsupportedValueType(value_type))
            }
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Rating => "rating",
            Self::Bool => "boolean",
            Self::Level => "level",
        }
    }

    /// Only LEVEL lacks an order
    pub fn is_ordered(&self) -> bool {
        !matches!(self, Self::Level)
    }

    pub fn parse_threshold(&self, raw: &str) -> Result<Comparable, ParseThresholdError> {
        let trimmed = raw.trim();
        let parsed = match self {
            // badly stored thresholds such as "10.9" are truncated, not rounded
            Self::Integer => parse_finite(trimmed).map(|v| Comparable::Integer(v.trunc() as i64)),
            Self::Decimal => parse_finite(trimmed).map(Comparable::Decimal),
            Self::Rating => trimmed.parse::<i64>().ok().map(Comparable::Integer),
            Self::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "1" | "true" => Some(Comparable::Integer(1)),
                "0" | "false" => Some(Comparable::Integer(0)),
                _ => None,
            },
            Self::Level if !trimmed.is_empty() => Some(Comparable::Text(trimmed.to_string())),
            Self::Level => None,
        };
        parsed.ok_or_else(|| ParseThresholdError {
            raw: raw.to_string(),
            expected: self.expected(),
        })
    }

    /// Value of the selected slot, `None` when the measure has none
    pub fn measure_value(&self, measure: &Measure, on_leak: bool) -> Option<Comparable> {
        match self {
            // levels have no leak variant
            Self::Level if on_leak => None,
            Self::Level => measure.string_value.clone().map(Comparable::Text),
            Self::Integer | Self::Rating | Self::Bool => measure
                .value_for(on_leak)
                .map(|v| Comparable::Integer(v.trunc() as i64)),
            Self::Decimal => measure.value_for(on_leak).map(Comparable::Decimal),
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Comparable {
    /// Ordering of `self` against `other`, `None` if they cannot be compared
    pub fn compare(&self, other: &Comparable) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Decimal(a), Self::Decimal(b)) => a.partial_cmp(b),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Text form reported back to the caller
    pub fn render(&self) -> String {
        match self {
            Self::Integer(v) => v.to_string(),
            Self::Decimal(v) => render_decimal(*v),
            Self::Text(v) => v.clone(),
        }
    }
}

/// Plain decimal notation with at least one decimal: 10.0, 10.1, 0.00001
fn render_decimal(value: f64) -> String {
    let rendered = value.to_string();
    if !value.is_finite() || rendered.contains('.') {
        rendered
    } else {
        format!("{}.0", rendered)
    }
}
