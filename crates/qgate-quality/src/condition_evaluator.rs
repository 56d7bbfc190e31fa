//! Evaluation of a single condition against the measures of a component

use qgate_core::{Condition, MeasureLookup, Operator, QualityGateError, ValueType};

use crate::gate::{EvaluatedCondition, EvaluationStatus};
use crate::value::{Comparable, Domain};

/// Evaluate one condition.
///
/// A condition whose measure (or selected value slot) is missing is OK with
/// no value: a gate never fails because a metric has not been computed yet.
/// The error threshold is checked first, the warning threshold only when the
/// error threshold is not breached.
pub fn evaluate<M>(condition: &Condition, measures: &M) -> Result<EvaluatedCondition, QualityGateError>
where
    M: MeasureLookup + ?Sized,
{
    let Some(measure) = measures.get(&condition.metric_key) else {
        return Ok(EvaluatedCondition::new(condition.clone(), EvaluationStatus::Ok, None));
    };

    let domain = Domain::of(measure.value_type)?;
    let Some(value) = domain.measure_value(measure, condition.on_leak) else {
        return Ok(EvaluatedCondition::new(condition.clone(), EvaluationStatus::Ok, None));
    };

    let status = if is_breached(condition, measure.value_type, domain, &value, &condition.error_threshold)? {
        EvaluationStatus::Error
    } else if let Some(warning) = condition.warning_threshold() {
        if is_breached(condition, measure.value_type, domain, &value, warning)? {
            EvaluationStatus::Warn
        } else {
            EvaluationStatus::Ok
        }
    } else {
        EvaluationStatus::Ok
    };

    let rendered = value.render();
    tracing::debug!(
        metric = %condition.metric_key,
        operator = %condition.operator,
        on_leak = condition.on_leak,
        status = ?status,
        value = %rendered,
        "condition evaluated"
    );
    Ok(EvaluatedCondition::new(condition.clone(), status, Some(rendered)))
}

fn is_breached(
    condition: &Condition,
    value_type: ValueType,
    domain: Domain,
    value: &Comparable,
    threshold: &str,
) -> Result<bool, QualityGateError> {
    if !domain.is_ordered() && matches!(condition.operator, Operator::GreaterThan | Operator::LessThan) {
        tracing::warn!(metric = %condition.metric_key, operator = %condition.operator, "unsupported operator");
        return Err(QualityGateError::UnsupportedOperator {
            operator: condition.operator,
            value_type,
        });
    }

    let threshold = domain.parse_threshold(threshold).map_err(|e| {
        tracing::warn!(metric = %condition.metric_key, error = %e, "stored threshold does not parse");
        QualityGateError::UnparseableThreshold {
            metric: condition.metric_key.clone(),
            value: e.raw,
            value_type,
        }
    })?;

    Ok(condition.operator.is_breached_by(value.compare(&threshold)))
}
