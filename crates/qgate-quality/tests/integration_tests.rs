//! Integration tests for qgate-quality with the fixture gate definitions.

use qgate_core::{keys, Condition, Measure, MetricCatalog, Operator, QualityGate, ValueType};
use qgate_quality::{evaluate, evaluate_condition, EvaluationStatus, GateDefinition, QualityGateEvaluator};
use std::collections::HashMap;

/// Path to a gate fixture relative to the workspace root
fn fixture(name: &str) -> String {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    workspace_root
        .join("testing/fixtures/gates")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn load(name: &str) -> QualityGate {
    GateDefinition::from_path(fixture(name))
        .unwrap()
        .into_quality_gate(name, &MetricCatalog::core())
        .unwrap()
}

fn single(key: &str, measure: Measure) -> HashMap<String, Measure> {
    let mut measures = HashMap::new();
    measures.insert(key.to_string(), measure);
    measures
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn test_float_greater_than_not_breached() {
    let condition = Condition::new("foo", Operator::GreaterThan, "10.2");
    let result = evaluate_condition(&condition, &single("foo", Measure::float(10.1))).unwrap();
    assert_eq!(result.status, EvaluationStatus::Ok);
    assert_eq!(result.value.as_deref(), Some("10.1"));
}

#[test]
fn test_float_equals_breached() {
    let condition = Condition::new("foo", Operator::Equals, "10.2");
    let result = evaluate_condition(&condition, &single("foo", Measure::float(10.2))).unwrap();
    assert_eq!(result.status, EvaluationStatus::Error);
    assert_eq!(result.value.as_deref(), Some("10.2"));
}

#[test]
fn test_int_threshold_is_truncated() {
    let condition = Condition::new("foo", Operator::Equals, "10.9");
    let result = evaluate_condition(&condition, &single("foo", Measure::int(11))).unwrap();
    assert_eq!(result.status, EvaluationStatus::Ok);
    assert_eq!(result.value.as_deref(), Some("11"));

    let measures = single("foo", Measure::int(10));
    for threshold in ["10", "10.4", "10.9"] {
        let condition = Condition::new("foo", Operator::Equals, threshold);
        let result = evaluate_condition(&condition, &measures).unwrap();
        assert_eq!(result.status, EvaluationStatus::Error, "threshold {}", threshold);
    }
}

#[test]
fn test_absent_measure() {
    let condition = Condition::new("foo", Operator::LessThan, "9");
    let result = evaluate_condition(&condition, &HashMap::<String, Measure>::new()).unwrap();
    assert_eq!(result.status, EvaluationStatus::Ok);
    assert_eq!(result.value, None);
}

#[test]
fn test_issue_counts_gate() {
    let conditions = vec![
        Condition::new(keys::BUGS, Operator::GreaterThan, "0"),
        Condition::new(keys::VULNERABILITIES, Operator::GreaterThan, "0"),
        Condition::new(keys::CODE_SMELLS, Operator::GreaterThan, "0"),
    ];
    let mut measures = HashMap::new();
    measures.insert(keys::BUGS.to_string(), Measure::int(2));
    measures.insert(keys::VULNERABILITIES.to_string(), Measure::int(0));
    measures.insert(keys::CODE_SMELLS.to_string(), Measure::int(0));

    let result = evaluate(&conditions, &measures).unwrap();

    let statuses: Vec<_> = result.conditions.iter().map(|c| c.status).collect();
    assert_eq!(statuses, vec![EvaluationStatus::Error, EvaluationStatus::Ok, EvaluationStatus::Ok]);
    assert_eq!(result.status, EvaluationStatus::Error);
}

#[test]
fn test_empty_warning_never_warns() {
    let condition = Condition::new("foo", Operator::LessThan, "9").with_warning("");
    let result = evaluate_condition(&condition, &single("foo", Measure::int(10))).unwrap();
    assert_eq!(result.status, EvaluationStatus::Ok);
}

// =============================================================================
// Fixture gates
// =============================================================================

#[test]
fn test_sonar_way_on_clean_new_code() {
    let gate = load("sonar-way.yaml");
    assert_eq!(gate.conditions.len(), 5);

    let mut measures = HashMap::new();
    for key in [keys::NEW_RELIABILITY_RATING, keys::NEW_SECURITY_RATING, keys::NEW_MAINTAINABILITY_RATING] {
        measures.insert(key.to_string(), Measure::new(ValueType::Rating).with_leak_value(1.0));
    }
    measures.insert(
        keys::NEW_COVERAGE.to_string(),
        Measure::new(ValueType::Percent).with_leak_value(91.2),
    );

    let result = QualityGateEvaluator::new().evaluate(&gate, &measures).unwrap();

    assert_eq!(result.status, EvaluationStatus::Ok);
    // duplication was never computed
    let duplication = &result.conditions[4];
    assert_eq!(duplication.condition.metric_key, keys::NEW_DUPLICATED_LINES_DENSITY);
    assert_eq!(duplication.value, None);
    assert_eq!(result.conditions[3].value.as_deref(), Some("91.2"));
}

#[test]
fn test_sonar_way_fails_on_rating_and_coverage() {
    let gate = load("sonar-way.yaml");

    let mut measures = HashMap::new();
    measures.insert(
        keys::NEW_SECURITY_RATING.to_string(),
        Measure::new(ValueType::Rating).with_value(1.0).with_leak_value(3.0),
    );
    measures.insert(
        keys::NEW_COVERAGE.to_string(),
        Measure::new(ValueType::Percent).with_leak_value(42.0),
    );

    let result = QualityGateEvaluator::new().evaluate(&gate, &measures).unwrap();

    assert_eq!(result.status, EvaluationStatus::Error);
    assert_eq!(result.summary(), "Sonar way: failed on new_security_rating, new_coverage");
}

#[test]
fn test_legacy_gate_warnings_and_truncation() {
    let gate = load("legacy.yaml");

    let mut measures = HashMap::new();
    measures.insert(keys::BLOCKER_VIOLATIONS.to_string(), Measure::int(2));
    measures.insert(keys::COVERAGE.to_string(), Measure::new(ValueType::Percent).with_value(55.0));
    // NE 4800.9 only holds once the threshold is truncated to 4800
    measures.insert(keys::TECHNICAL_DEBT.to_string(), Measure::new(ValueType::WorkDur).with_value(4800.0));
    measures.insert(
        keys::TEST_EXECUTION_TIME.to_string(),
        Measure::new(ValueType::Millisec).with_value(12_345.0),
    );

    let result = QualityGateEvaluator::new().evaluate(&gate, &measures).unwrap();

    let statuses: Vec<_> = result.conditions.iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![EvaluationStatus::Warn, EvaluationStatus::Warn, EvaluationStatus::Ok, EvaluationStatus::Ok]
    );
    assert_eq!(result.status, EvaluationStatus::Warn);
    assert_eq!(result.summary(), "Legacy: warnings on blocker_violations, coverage");
    assert_eq!(result.conditions[2].value.as_deref(), Some("4800"));

    measures.insert(keys::TECHNICAL_DEBT.to_string(), Measure::new(ValueType::WorkDur).with_value(4801.0));
    let result = QualityGateEvaluator::new().evaluate(&gate, &measures).unwrap();
    assert_eq!(result.conditions[2].status, EvaluationStatus::Error);
}

#[test]
fn test_evaluation_is_repeatable_across_threads() {
    let gate = std::sync::Arc::new(load("legacy.yaml"));
    let mut measures = HashMap::new();
    measures.insert(keys::BLOCKER_VIOLATIONS.to_string(), Measure::int(9));
    let measures = std::sync::Arc::new(measures);

    let expected = QualityGateEvaluator::new().evaluate(&*gate, &*measures).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let gate = gate.clone();
            let measures = measures.clone();
            std::thread::spawn(move || QualityGateEvaluator::new().evaluate(&*gate, &*measures).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    assert_eq!(expected.status, EvaluationStatus::Error);
}
