//! QGate Branch: Live Quality Gate for Short-Lived Branches
//!
//! Short-lived branches are not bound to a configured gate. Their status is
//! computed on demand from the unresolved issue counts held by an external
//! [`IssueIndex`], against a fixed set of three conditions.

pub mod issue_index;
pub mod live_gate;
pub mod metrics;

pub use issue_index::{IndexError, IssueCounts, IssueIndex, RuleType, UnresolvedIssueQuery};
pub use live_gate::{
    measures_from_counts, short_living_branch_gate, LiveGateError, LiveQualityGateFactory,
    SHORT_LIVING_BRANCH_GATE_ID, SHORT_LIVING_BRANCH_GATE_NAME,
};
pub use metrics::LiveGateMetrics;
