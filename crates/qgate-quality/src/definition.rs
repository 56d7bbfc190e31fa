//! Quality gate definitions loaded from YAML
//!
//! ```yaml
//! name: "Sonar way"
//! conditions:
//!   - metric: new_coverage
//!     op: LT
//!     error: 80
//!     on_leak: true
//! ```

use qgate_core::{Condition, MetricFinder, Operator, QualityGate};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::validation::{validate_condition, ConditionError};

#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Failed to read gate definition: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse gate definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid condition #{index} on '{metric}': {source}")]
    Condition {
        index: usize,
        metric: String,
        #[source]
        source: ConditionError,
    },
}

/// A gate as written by users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDefinition {
    pub name: String,
    #[serde(default)]
    pub conditions: Vec<ConditionDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDefinition {
    pub metric: String,
    pub op: Operator,
    #[serde(default, deserialize_with = "threshold")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "threshold")]
    pub warning: Option<String>,
    #[serde(default)]
    pub on_leak: bool,
}

impl ConditionDefinition {
    pub fn to_condition(&self) -> Condition {
        Condition {
            metric_key: self.metric.clone(),
            operator: self.op,
            error_threshold: self.error.clone().unwrap_or_default(),
            warning_threshold: self.warning.clone(),
            on_leak: self.on_leak,
        }
    }
}

impl GateDefinition {
    /// Load definition from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, DefinitionError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Validate every condition and build the gate
    pub fn into_quality_gate<F>(self, id: impl Into<String>, metrics: &F) -> Result<QualityGate, DefinitionError>
    where
        F: MetricFinder + ?Sized,
    {
        let mut conditions: Vec<Condition> = Vec::with_capacity(self.conditions.len());
        for (index, definition) in self.conditions.iter().enumerate() {
            let condition = definition.to_condition();
            validate_condition(&condition, metrics, &conditions).map_err(|source| DefinitionError::Condition {
                index,
                metric: definition.metric.clone(),
                source,
            })?;
            conditions.push(condition);
        }
        tracing::debug!(gate = %self.name, conditions = conditions.len(), "gate definition loaded");
        Ok(QualityGate::new(id, self.name, conditions))
    }
}

/// Thresholds may be written as YAML numbers or strings
fn threshold<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_yaml::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("invalid threshold: {:?}", other))),
    }
}
