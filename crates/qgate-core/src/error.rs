//! Unified Error Model
use thiserror::Error;

use crate::condition::Operator;
use crate::metric::ValueType;

/// Errors raised while evaluating a quality gate.
///
/// None of these are expected on the normal path: conditions are validated
/// when they are created, so reaching one of them means a malformed gate was
/// persisted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QualityGateError {
    #[error("TYPE/Conditions on value type {0} are not supported")]
    UnsupportedValueType(ValueType),

    #[error("THRESHOLD/Unable to parse value '{value}' to compare against {metric} ({value_type})")]
    UnparseableThreshold {
        metric: String,
        value: String,
        value_type: ValueType,
    },

    #[error("OPERATOR/Operator {operator} is not supported on value type {value_type}")]
    UnsupportedOperator {
        operator: Operator,
        value_type: ValueType,
    },

    #[error("EVAL/{0}")]
    IncompleteEvaluation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = QualityGateError::UnparseableThreshold {
            metric: "coverage".to_string(),
            value: "polop".to_string(),
            value_type: ValueType::Percent,
        };
        assert_eq!(
            err.to_string(),
            "THRESHOLD/Unable to parse value 'polop' to compare against coverage (PERCENT)"
        );

        let err = QualityGateError::UnsupportedValueType(ValueType::Data);
        assert_eq!(err.to_string(), "TYPE/Conditions on value type DATA are not supported");
    }
}
