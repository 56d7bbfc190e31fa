//! Quality Gate evaluation
//!
//! Evaluates every condition of a gate against a measure lookup and
//! aggregates the worst status (ERROR > WARN > OK).

use qgate_core::{Condition, MeasureLookup, QualityGate, QualityGateError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::condition_evaluator;

/// Status of a condition or of a whole gate, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationStatus {
    Ok,
    Warn,
    Error,
}

impl EvaluationStatus {
    /// Worst status of the iterator, OK when it is empty
    pub fn worst<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = EvaluationStatus>,
    {
        statuses.into_iter().max().unwrap_or(EvaluationStatus::Ok)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedCondition {
    pub condition: Condition,
    pub status: EvaluationStatus,
    /// Compared measure value, absent when the measure had none
    pub value: Option<String>,
}

impl EvaluatedCondition {
    pub fn new(condition: Condition, status: EvaluationStatus, value: Option<String>) -> Self {
        Self {
            condition,
            status,
            value,
        }
    }
}

/// Outcome of a whole gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedQualityGate {
    pub quality_gate: QualityGate,
    pub status: EvaluationStatus,
    /// In the order of the gate's conditions
    pub conditions: Vec<EvaluatedCondition>,
}

impl EvaluatedQualityGate {
    pub fn builder() -> EvaluatedQualityGateBuilder {
        EvaluatedQualityGateBuilder::default()
    }

    pub fn is_passing(&self) -> bool {
        self.status != EvaluationStatus::Error
    }

    /// Evaluated conditions with the given status
    pub fn conditions_with(&self, status: EvaluationStatus) -> impl Iterator<Item = &EvaluatedCondition> {
        self.conditions.iter().filter(move |c| c.status == status)
    }

    /// One line summary naming the failing metrics
    pub fn summary(&self) -> String {
        let keys = |status| {
            self.conditions_with(status)
                .map(|c| c.condition.metric_key.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self.status {
            EvaluationStatus::Error => format!("{}: failed on {}", self.quality_gate.name, keys(EvaluationStatus::Error)),
            EvaluationStatus::Warn => format!("{}: warnings on {}", self.quality_gate.name, keys(EvaluationStatus::Warn)),
            EvaluationStatus::Ok => format!("{}: passed", self.quality_gate.name),
        }
    }
}

/// Assembles an [`EvaluatedQualityGate`], checking that every condition of
/// the gate was evaluated exactly once
#[derive(Debug, Default)]
pub struct EvaluatedQualityGateBuilder {
    quality_gate: Option<QualityGate>,
    status: Option<EvaluationStatus>,
    conditions: Vec<EvaluatedCondition>,
}

impl EvaluatedQualityGateBuilder {
    pub fn quality_gate(mut self, quality_gate: QualityGate) -> Self {
        self.quality_gate = Some(quality_gate);
        self
    }

    pub fn status(mut self, status: EvaluationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn add_condition(mut self, condition: Condition, status: EvaluationStatus, value: Option<String>) -> Self {
        self.conditions.push(EvaluatedCondition::new(condition, status, value));
        self
    }

    pub fn add_evaluated(mut self, evaluated: EvaluatedCondition) -> Self {
        self.conditions.push(evaluated);
        self
    }

    pub fn build(self) -> Result<EvaluatedQualityGate, QualityGateError> {
        let quality_gate = self
            .quality_gate
            .ok_or_else(|| QualityGateError::IncompleteEvaluation("quality gate is missing".to_string()))?;
        let status = self
            .status
            .ok_or_else(|| QualityGateError::IncompleteEvaluation("status is missing".to_string()))?;

        let missing: Vec<&str> = quality_gate
            .conditions
            .iter()
            .filter(|c| !self.conditions.iter().any(|e| &e.condition == *c))
            .map(|c| c.metric_key.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(QualityGateError::IncompleteEvaluation(format!(
                "Evaluation missing for the following conditions: {}",
                missing.join(", ")
            )));
        }

        let unknown: Vec<&str> = self
            .conditions
            .iter()
            .filter(|e| !quality_gate.conditions.contains(&e.condition))
            .map(|e| e.condition.metric_key.as_str())
            .collect();
        if !unknown.is_empty() {
            return Err(QualityGateError::IncompleteEvaluation(format!(
                "Evaluation provided for unknown conditions: {}",
                unknown.join(", ")
            )));
        }

        if self.conditions.len() != quality_gate.conditions.len() {
            return Err(QualityGateError::IncompleteEvaluation(
                "Conditions were evaluated more than once".to_string(),
            ));
        }

        Ok(EvaluatedQualityGate {
            quality_gate,
            status,
            conditions: self.conditions,
        })
    }
}

/// Stateless evaluator, safe to share between threads
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityGateEvaluator;

impl QualityGateEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate every condition of the gate and aggregate the worst status
    pub fn evaluate<M>(&self, quality_gate: &QualityGate, measures: &M) -> Result<EvaluatedQualityGate, QualityGateError>
    where
        M: MeasureLookup + ?Sized,
    {
        let mut builder = EvaluatedQualityGate::builder().quality_gate(quality_gate.clone());
        let mut statuses = Vec::with_capacity(quality_gate.conditions.len());

        for condition in &quality_gate.conditions {
            let evaluated = condition_evaluator::evaluate(condition, measures)?;
            statuses.push(evaluated.status);
            builder = builder.add_evaluated(evaluated);
        }

        let status = EvaluationStatus::worst(statuses);
        let evaluated = builder.status(status).build()?;

        tracing::info!(
            gate = %quality_gate.name,
            status = %status,
            conditions = quality_gate.conditions.len(),
            "quality gate evaluated"
        );
        Ok(evaluated)
    }

    /// Metric keys whose measures must be loaded before evaluation
    pub fn metric_keys<'a>(&self, quality_gate: &'a QualityGate) -> BTreeSet<&'a str> {
        quality_gate
            .conditions
            .iter()
            .map(|c| c.metric_key.as_str())
            .collect()
    }
}
