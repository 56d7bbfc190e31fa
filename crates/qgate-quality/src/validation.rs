//! Configuration-time validation of conditions
//!
//! Everything the evaluator trusts is checked here, when a condition is
//! created or updated: the metric can carry a condition, the operator suits
//! the metric, the thresholds parse in the metric's domain.

use qgate_core::{keys, Condition, Direction, Metric, MetricFinder, Operator, Rating, ValueType};
use thiserror::Error;

use crate::value::{Comparable, Domain, ParseThresholdError};

/// A condition rejected at creation time
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionError {
    #[error("There is no metric with key={0}")]
    MetricNotFound(String),

    #[error("Metric '{0}' cannot be used to define a condition")]
    AlertStatusMetric(String),

    #[error("Metric '{0}' is hidden and cannot be used to define a condition")]
    HiddenMetric(String),

    #[error("Metric '{metric}' of type {value_type} cannot be used to define a condition")]
    UnsupportedValueType { metric: String, value_type: ValueType },

    #[error("Operator {operator} is not allowed for metric type {value_type}")]
    OperatorNotAllowed { operator: Operator, value_type: ValueType },

    #[error("Operator {operator} is not allowed for metric '{metric}': higher values are {direction}")]
    OperatorAgainstDirection {
        operator: Operator,
        metric: String,
        direction: &'static str,
    },

    #[error("An error threshold must be provided")]
    MissingErrorThreshold,

    #[error("Invalid value '{value}' for metric '{metric}': {source}")]
    InvalidThreshold {
        metric: String,
        value: String,
        #[source]
        source: ParseThresholdError,
    },

    #[error("'{value}' is not a valid rating for metric '{metric}', expected {best} to {worst}")]
    RatingOutOfRange {
        metric: String,
        value: String,
        best: Rating,
        worst: Rating,
    },

    #[error("There's no worse rating than E ({0})")]
    NoWorseRating(String),

    #[error("A condition on metric '{0}' must be defined on the leak period")]
    LeakPeriodRequired(String),

    #[error("Condition on metric '{0}' already exists.")]
    DuplicateCondition(String),

    #[error("Condition on metric '{0}' over leak period already exists.")]
    DuplicateLeakCondition(String),
}

/// Operators accepted for a value type
pub fn allowed_operators(value_type: ValueType) -> &'static [Operator] {
    use Operator::{Equals, GreaterThan, LessThan, NotEquals};
    match value_type {
        ValueType::Int | ValueType::Float | ValueType::Percent | ValueType::Millisec | ValueType::WorkDur => {
            &[LessThan, GreaterThan, Equals, NotEquals]
        }
        ValueType::Bool | ValueType::Level => &[Equals, NotEquals],
        ValueType::Rating => &[GreaterThan],
        ValueType::String | ValueType::Data => &[],
    }
}

/// Validate a new condition against the metric catalog and the conditions
/// already defined on the same gate.
///
/// Returns the metric the condition is defined on.
pub fn validate_condition<'m, F>(
    condition: &Condition,
    metrics: &'m F,
    existing: &[Condition],
) -> Result<&'m Metric, ConditionError>
where
    F: MetricFinder + ?Sized,
{
    let metric = metrics
        .find_by_key(&condition.metric_key)
        .ok_or_else(|| ConditionError::MetricNotFound(condition.metric_key.clone()))?;

    check_metric(metric)?;
    check_operator(metric, condition.operator)?;
    check_thresholds(metric, condition)?;

    if metric.is_leak_only() && !condition.on_leak {
        return Err(ConditionError::LeakPeriodRequired(metric.key.clone()));
    }

    let duplicate = existing
        .iter()
        .any(|c| c.metric_key == condition.metric_key && c.on_leak == condition.on_leak);
    if duplicate {
        return Err(if condition.on_leak {
            ConditionError::DuplicateLeakCondition(metric.name.clone())
        } else {
            ConditionError::DuplicateCondition(metric.name.clone())
        });
    }

    Ok(metric)
}

/// Validate every condition of a gate, in order, each against the ones
/// before it
pub fn validate_conditions<F>(conditions: &[Condition], metrics: &F) -> Result<(), (usize, ConditionError)>
where
    F: MetricFinder + ?Sized,
{
    for (index, condition) in conditions.iter().enumerate() {
        validate_condition(condition, metrics, &conditions[..index]).map_err(|e| (index, e))?;
    }
    Ok(())
}

fn check_metric(metric: &Metric) -> Result<(), ConditionError> {
    if metric.key == keys::ALERT_STATUS {
        return Err(ConditionError::AlertStatusMetric(metric.key.clone()));
    }
    if metric.hidden {
        return Err(ConditionError::HiddenMetric(metric.key.clone()));
    }
    if !metric.value_type.is_evaluable() {
        return Err(ConditionError::UnsupportedValueType {
            metric: metric.key.clone(),
            value_type: metric.value_type,
        });
    }
    Ok(())
}

fn check_operator(metric: &Metric, operator: Operator) -> Result<(), ConditionError> {
    if !allowed_operators(metric.value_type).contains(&operator) {
        return Err(ConditionError::OperatorNotAllowed {
            operator,
            value_type: metric.value_type,
        });
    }
    let against = match (metric.direction, operator) {
        (Direction::Better, Operator::GreaterThan) => Some("better"),
        (Direction::Worse, Operator::LessThan) => Some("worse"),
        _ => None,
    };
    match against {
        Some(direction) => Err(ConditionError::OperatorAgainstDirection {
            operator,
            metric: metric.key.clone(),
            direction,
        }),
        None => Ok(()),
    }
}

fn check_thresholds(metric: &Metric, condition: &Condition) -> Result<(), ConditionError> {
    if condition.error_threshold.trim().is_empty() {
        return Err(ConditionError::MissingErrorThreshold);
    }
    check_threshold(metric, condition.operator, &condition.error_threshold)?;
    if let Some(warning) = condition.warning_threshold() {
        check_threshold(metric, condition.operator, warning)?;
    }
    Ok(())
}

fn check_threshold(metric: &Metric, operator: Operator, raw: &str) -> Result<(), ConditionError> {
    let domain = Domain::of(metric.value_type).map_err(|_| ConditionError::UnsupportedValueType {
        metric: metric.key.clone(),
        value_type: metric.value_type,
    })?;
    let parsed = domain.parse_threshold(raw).map_err(|source| ConditionError::InvalidThreshold {
        metric: metric.key.clone(),
        value: raw.to_string(),
        source,
    })?;

    if let (Domain::Rating, Comparable::Integer(value)) = (domain, &parsed) {
        let rating = Rating::from_value(*value).ok_or_else(|| ConditionError::RatingOutOfRange {
            metric: metric.key.clone(),
            value: raw.to_string(),
            best: Rating::BEST,
            worst: Rating::WORST,
        })?;
        if operator == Operator::GreaterThan && rating == Rating::WORST {
            return Err(ConditionError::NoWorseRating(metric.key.clone()));
        }
    }
    Ok(())
}
