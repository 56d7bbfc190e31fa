//! Fixed quality gate for short-lived branches
//!
//! No persisted gate applies to a short-lived branch. Its status is computed
//! on demand from the unresolved issues in the index: any open bug,
//! vulnerability or code smell fails the gate.

use qgate_core::{Condition, Measure, Operator, QualityGate, QualityGateError, ValueType};
use qgate_quality::{EvaluatedQualityGate, QualityGateEvaluator};
use std::collections::HashMap;
use thiserror::Error;

use crate::issue_index::{IndexError, IssueCounts, IssueIndex, RuleType, UnresolvedIssueQuery};
use crate::metrics::LiveGateMetrics;

/// Identity of the hardcoded gate
pub const SHORT_LIVING_BRANCH_GATE_ID: i64 = -1_963_456_987;
pub const SHORT_LIVING_BRANCH_GATE_NAME: &str = "Hardcoded short living branch quality gate";

/// One fixed condition: no issue of this type may be open
struct FixedCondition {
    rule_type: RuleType,
    error_threshold: &'static str,
}

const FIXED_CONDITIONS: [FixedCondition; 3] = [
    FixedCondition { rule_type: RuleType::Bug, error_threshold: "0" },
    FixedCondition { rule_type: RuleType::Vulnerability, error_threshold: "0" },
    FixedCondition { rule_type: RuleType::CodeSmell, error_threshold: "0" },
];

/// The fixed gate: bugs, vulnerabilities, code smells, each GREATER_THAN 0
pub fn short_living_branch_gate() -> QualityGate {
    let conditions = FIXED_CONDITIONS
        .iter()
        .map(|fixed| Condition::new(fixed.rule_type.metric_key(), Operator::GreaterThan, fixed.error_threshold))
        .collect();
    QualityGate::new(
        SHORT_LIVING_BRANCH_GATE_ID.to_string(),
        SHORT_LIVING_BRANCH_GATE_NAME,
        conditions,
    )
}

/// Issue counts as INT measures, absolute value only
pub fn measures_from_counts(counts: &IssueCounts) -> HashMap<String, Measure> {
    RuleType::ALL
        .iter()
        .map(|rule_type| {
            let measure = Measure::new(ValueType::Int).with_value(counts.count(*rule_type) as f64);
            (rule_type.metric_key().to_string(), measure)
        })
        .collect()
}

#[derive(Error, Debug)]
pub enum LiveGateError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Evaluation(#[from] QualityGateError),
}

/// Computes the fixed gate of a component from live issue counts
#[derive(Debug)]
pub struct LiveQualityGateFactory<I> {
    index: I,
    evaluator: QualityGateEvaluator,
    metrics: Option<LiveGateMetrics>,
}

impl<I: IssueIndex> LiveQualityGateFactory<I> {
    pub fn new(index: I) -> Self {
        Self {
            index,
            evaluator: QualityGateEvaluator::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: LiveGateMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Query the index, synthesize the measures and evaluate the fixed gate.
    ///
    /// The count ignores the caller's permissions: the gate must see every
    /// issue, including those the caller is not allowed to browse.
    pub async fn compute(&self, component_key: &str) -> Result<EvaluatedQualityGate, LiveGateError> {
        let query = UnresolvedIssueQuery::new(component_key).ignoring_permissions();
        tracing::debug!(component = %component_key, "counting unresolved issues");

        let counts = match self.index.count_unresolved_by_type(&query).await {
            Ok(counts) => counts,
            Err(e) => {
                tracing::warn!(component = %component_key, kind = e.kind(), error = %e, "issue index query failed");
                if let Some(metrics) = &self.metrics {
                    metrics.record_index_failure(&e);
                }
                return Err(e.into());
            }
        };

        let measures = measures_from_counts(&counts);
        let evaluated = self.evaluator.evaluate(&short_living_branch_gate(), &measures)?;

        if let Some(metrics) = &self.metrics {
            metrics.record_evaluation(evaluated.status);
        }
        tracing::info!(
            component = %component_key,
            status = %evaluated.status,
            bugs = counts.count(RuleType::Bug),
            vulnerabilities = counts.count(RuleType::Vulnerability),
            code_smells = counts.count(RuleType::CodeSmell),
            "live quality gate computed"
        );
        Ok(evaluated)
    }
}
