//! Issue index collaborator
//!
//! The index itself lives outside this crate; only the query the live gate
//! needs is modelled here.

use async_trait::async_trait;
use qgate_core::keys;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Type of the rule that raised an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    CodeSmell,
    Bug,
    Vulnerability,
}

impl RuleType {
    pub const ALL: [RuleType; 3] = [RuleType::CodeSmell, RuleType::Bug, RuleType::Vulnerability];

    /// Metric counting the issues of this type
    pub fn metric_key(&self) -> &'static str {
        match self {
            Self::CodeSmell => keys::CODE_SMELLS,
            Self::Bug => keys::BUGS,
            Self::Vulnerability => keys::VULNERABILITIES,
        }
    }
}

/// Count of unresolved issues on a component, grouped by rule type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedIssueQuery {
    pub component_key: String,
    /// Count issues the current user is not allowed to see
    pub ignore_permissions: bool,
}

impl UnresolvedIssueQuery {
    pub fn new(component_key: impl Into<String>) -> Self {
        Self {
            component_key: component_key.into(),
            ignore_permissions: false,
        }
    }

    pub fn ignoring_permissions(mut self) -> Self {
        self.ignore_permissions = true;
        self
    }
}

/// Unresolved issue counts returned by the index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueCounts {
    counts: HashMap<RuleType, u64>,
}

impl IssueCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule_type: RuleType, count: u64) -> Self {
        self.counts.insert(rule_type, count);
        self
    }

    /// A rule type the index did not report has no issue
    pub fn count(&self, rule_type: RuleType) -> u64 {
        self.counts.get(&rule_type).copied().unwrap_or(0)
    }
}

impl FromIterator<(RuleType, u64)> for IssueCounts {
    fn from_iter<I: IntoIterator<Item = (RuleType, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("INDEX/Component not found: {0}")]
    ComponentNotFound(String),

    #[error("INDEX/Query failed: {0}")]
    QueryFailed(String),
}

impl IndexError {
    /// Stable label for the failure, independent of the component
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ComponentNotFound(_) => "not_found",
            Self::QueryFailed(_) => "query_failed",
        }
    }
}

/// Search index holding the issues of every component
///
/// Timeouts and retries belong to the implementation.
#[async_trait]
pub trait IssueIndex: Send + Sync {
    async fn count_unresolved_by_type(&self, query: &UnresolvedIssueQuery) -> Result<IssueCounts, IndexError>;
}

#[async_trait]
impl<T: IssueIndex + ?Sized> IssueIndex for Arc<T> {
    async fn count_unresolved_by_type(&self, query: &UnresolvedIssueQuery) -> Result<IssueCounts, IndexError> {
        (**self).count_unresolved_by_type(query).await
    }
}
