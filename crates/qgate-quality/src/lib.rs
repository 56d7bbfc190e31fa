//! QGate Quality: Condition and Quality Gate Evaluation
//!
//! Decides, per condition and in aggregate, whether the measures of a
//! component are OK, in WARN or in ERROR.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use qgate_core::{Condition, Measure, Operator, QualityGate};
//! use qgate_quality::{EvaluationStatus, QualityGateEvaluator};
//!
//! let gate = QualityGate::new("1", "Issues", vec![
//!     Condition::new("bugs", Operator::GreaterThan, "0"),
//!     Condition::new("coverage", Operator::LessThan, "80").with_warning("90"),
//! ]);
//!
//! let mut measures = HashMap::new();
//! measures.insert("bugs".to_string(), Measure::int(0));
//! measures.insert("coverage".to_string(), Measure::float(85.0));
//!
//! let result = QualityGateEvaluator::new().evaluate(&gate, &measures).unwrap();
//! assert_eq!(result.status, EvaluationStatus::Warn);
//! ```

pub mod condition_evaluator;
pub mod definition;
pub mod gate;
pub mod validation;
pub mod value;

pub use condition_evaluator::evaluate as evaluate_condition;
pub use definition::{ConditionDefinition, DefinitionError, GateDefinition};
pub use gate::{EvaluatedCondition, EvaluatedQualityGate, EvaluatedQualityGateBuilder, EvaluationStatus, QualityGateEvaluator};
pub use validation::{allowed_operators, validate_condition, validate_conditions, ConditionError};

use qgate_core::{Condition, MeasureLookup, QualityGate, QualityGateError};

/// Evaluate a bare list of conditions
pub fn evaluate<M>(conditions: &[Condition], measures: &M) -> Result<EvaluatedQualityGate, QualityGateError>
where
    M: MeasureLookup + ?Sized,
{
    QualityGateEvaluator::new().evaluate(&QualityGate::ad_hoc(conditions.to_vec()), measures)
}

/// Check if the measures would pass the conditions
pub fn would_pass<M>(conditions: &[Condition], measures: &M) -> Result<bool, QualityGateError>
where
    M: MeasureLookup + ?Sized,
{
    Ok(evaluate(conditions, measures)?.is_passing())
}
