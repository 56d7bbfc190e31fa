//! Integration tests for the live short-lived branch gate.

use async_trait::async_trait;
use qgate_branch::{
    IndexError, IssueCounts, IssueIndex, LiveGateError, LiveGateMetrics, LiveQualityGateFactory, RuleType,
    UnresolvedIssueQuery, SHORT_LIVING_BRANCH_GATE_NAME,
};
use qgate_core::keys;
use qgate_quality::EvaluationStatus;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// In-memory index keyed by component
#[derive(Debug, Default)]
struct FakeIndex {
    components: HashMap<String, IssueCounts>,
    queries: Mutex<Vec<UnresolvedIssueQuery>>,
}

impl FakeIndex {
    fn with_component(mut self, key: &str, counts: IssueCounts) -> Self {
        self.components.insert(key.to_string(), counts);
        self
    }
}

#[async_trait]
impl IssueIndex for FakeIndex {
    async fn count_unresolved_by_type(&self, query: &UnresolvedIssueQuery) -> Result<IssueCounts, IndexError> {
        self.queries.lock().unwrap().push(query.clone());
        self.components
            .get(&query.component_key)
            .cloned()
            .ok_or_else(|| IndexError::ComponentNotFound(query.component_key.clone()))
    }
}

struct UnavailableIndex;

#[async_trait]
impl IssueIndex for UnavailableIndex {
    async fn count_unresolved_by_type(&self, _query: &UnresolvedIssueQuery) -> Result<IssueCounts, IndexError> {
        Err(IndexError::QueryFailed("index is read-only".to_string()))
    }
}

#[tokio::test]
async fn test_clean_branch_passes() {
    init_tracing();
    let index = FakeIndex::default().with_component("feature/x", IssueCounts::new());
    let factory = LiveQualityGateFactory::new(index);

    let result = factory.compute("feature/x").await.unwrap();

    assert_eq!(result.status, EvaluationStatus::Ok);
    assert_eq!(result.quality_gate.id, "-1963456987");
    assert_eq!(result.quality_gate.name, SHORT_LIVING_BRANCH_GATE_NAME);
    assert_eq!(result.conditions.len(), 3);
    for evaluated in &result.conditions {
        assert_eq!(evaluated.status, EvaluationStatus::Ok);
        assert_eq!(evaluated.value.as_deref(), Some("0"));
    }
}

#[tokio::test]
async fn test_single_code_smell_fails_only_its_condition() {
    init_tracing();
    let counts = IssueCounts::new()
        .with(RuleType::Bug, 0)
        .with(RuleType::Vulnerability, 0)
        .with(RuleType::CodeSmell, 1);
    let factory = LiveQualityGateFactory::new(FakeIndex::default().with_component("feature/y", counts));

    let result = factory.compute("feature/y").await.unwrap();

    assert_eq!(result.status, EvaluationStatus::Error);
    let failed: Vec<_> = result
        .conditions_with(EvaluationStatus::Error)
        .map(|c| c.condition.metric_key.as_str())
        .collect();
    assert_eq!(failed, vec![keys::CODE_SMELLS]);
    assert_eq!(
        result.summary(),
        "Hardcoded short living branch quality gate: failed on code_smells"
    );
}

#[tokio::test]
async fn test_every_issue_type_failing() {
    let counts: IssueCounts = RuleType::ALL.iter().map(|t| (*t, 7)).collect();
    let factory = LiveQualityGateFactory::new(FakeIndex::default().with_component("feature/z", counts));

    let result = factory.compute("feature/z").await.unwrap();

    assert_eq!(result.status, EvaluationStatus::Error);
    assert!(result.conditions.iter().all(|c| c.status == EvaluationStatus::Error));
    assert!(result.conditions.iter().all(|c| c.value.as_deref() == Some("7")));
}

#[tokio::test]
async fn test_query_ignores_permissions() {
    let index = Arc::new(FakeIndex::default().with_component("feature/x", IssueCounts::new()));
    let factory = LiveQualityGateFactory::new(Arc::clone(&index));

    factory.compute("feature/x").await.unwrap();

    let queries = index.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].component_key, "feature/x");
    assert!(queries[0].ignore_permissions);
}

#[tokio::test]
async fn test_unknown_component_is_an_index_error() {
    let factory = LiveQualityGateFactory::new(FakeIndex::default());

    let err = factory.compute("missing").await.unwrap_err();

    assert!(matches!(err, LiveGateError::Index(IndexError::ComponentNotFound(ref key)) if key == "missing"));
    assert_eq!(err.to_string(), "INDEX/Component not found: missing");
}

#[tokio::test]
async fn test_metrics_are_recorded() {
    init_tracing();
    let metrics = LiveGateMetrics::new().unwrap();
    let index = FakeIndex::default()
        .with_component("clean", IssueCounts::new())
        .with_component("dirty", IssueCounts::new().with(RuleType::Bug, 2));
    let factory = LiveQualityGateFactory::new(index).with_metrics(metrics.clone());

    factory.compute("clean").await.unwrap();
    factory.compute("dirty").await.unwrap();
    factory.compute("dirty").await.unwrap();
    assert!(factory.compute("gone").await.is_err());
    assert!(factory.compute("gone-too").await.is_err());

    assert_eq!(metrics.evaluations(EvaluationStatus::Ok), 1);
    assert_eq!(metrics.evaluations(EvaluationStatus::Error), 2);
    assert_eq!(metrics.index_failures("not_found"), 2);

    let text = metrics.encode().unwrap();
    assert!(text.contains("qgate_live_index_failures_total{kind=\"not_found\"} 2"));
    assert!(!text.contains("gone"));
}

#[tokio::test]
async fn test_factory_debug_output() {
    let factory = LiveQualityGateFactory::new(FakeIndex::default()).with_metrics(LiveGateMetrics::new().unwrap());
    let rendered = format!("{:?}", factory);
    assert!(rendered.starts_with("LiveQualityGateFactory"));
    assert!(rendered.contains("LiveGateMetrics"));
}

#[tokio::test]
async fn test_index_failure_without_metrics() {
    let factory = LiveQualityGateFactory::new(UnavailableIndex);
    let err = factory.compute("any").await.unwrap_err();
    assert!(matches!(err, LiveGateError::Index(IndexError::QueryFailed(_))));
}
