//! Metric catalog
//!
//! Metrics are defined outside the engine; this module only models what the
//! evaluator and the condition validator need to know about them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Value domain of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Int,
    Float,
    Percent,
    Millisec,
    WorkDur,
    Rating,
    Bool,
    Level,
    String,
    Data,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Percent => "PERCENT",
            Self::Millisec => "MILLISEC",
            Self::WorkDur => "WORK_DUR",
            Self::Rating => "RATING",
            Self::Bool => "BOOL",
            Self::Level => "LEVEL",
            Self::String => "STRING",
            Self::Data => "DATA",
        }
    }

    /// Whether conditions can be defined on this type
    pub fn is_evaluable(&self) -> bool {
        !matches!(self, Self::String | Self::Data)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Improvement direction of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Higher values are better (coverage)
    Better,
    /// Higher values are worse (bugs, ratings)
    Worse,
    /// No ordering
    None,
}

/// A metric definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub key: String,
    pub name: String,
    pub value_type: ValueType,
    pub direction: Direction,
    #[serde(default)]
    pub hidden: bool,
}

impl Metric {
    pub fn new(key: impl Into<String>, name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            value_type,
            direction: Direction::None,
            hidden: false,
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Metrics computed only over new code carry leak values exclusively
    pub fn is_leak_only(&self) -> bool {
        self.key.starts_with("new_")
    }
}

/// Read-only metric lookup
pub trait MetricFinder {
    fn find_by_key(&self, key: &str) -> Option<&Metric>;
}

/// Well-known metric keys
pub mod keys {
    pub const ALERT_STATUS: &str = "alert_status";
    pub const QUALITY_GATE_DETAILS: &str = "quality_gate_details";
    pub const NCLOC: &str = "ncloc";
    pub const NCLOC_DATA: &str = "ncloc_data";
    pub const BUGS: &str = "bugs";
    pub const NEW_BUGS: &str = "new_bugs";
    pub const VULNERABILITIES: &str = "vulnerabilities";
    pub const NEW_VULNERABILITIES: &str = "new_vulnerabilities";
    pub const CODE_SMELLS: &str = "code_smells";
    pub const NEW_CODE_SMELLS: &str = "new_code_smells";
    pub const BLOCKER_VIOLATIONS: &str = "blocker_violations";
    pub const COVERAGE: &str = "coverage";
    pub const NEW_COVERAGE: &str = "new_coverage";
    pub const DUPLICATED_LINES_DENSITY: &str = "duplicated_lines_density";
    pub const NEW_DUPLICATED_LINES_DENSITY: &str = "new_duplicated_lines_density";
    pub const TEST_EXECUTION_TIME: &str = "test_execution_time";
    pub const TECHNICAL_DEBT: &str = "sqale_index";
    pub const NEW_TECHNICAL_DEBT: &str = "new_technical_debt";
    pub const RELIABILITY_RATING: &str = "reliability_rating";
    pub const NEW_RELIABILITY_RATING: &str = "new_reliability_rating";
    pub const SECURITY_RATING: &str = "security_rating";
    pub const NEW_SECURITY_RATING: &str = "new_security_rating";
    pub const MAINTAINABILITY_RATING: &str = "sqale_rating";
    pub const NEW_MAINTAINABILITY_RATING: &str = "new_maintainability_rating";
    pub const PUBLIC_DOCUMENTED_API_DENSITY: &str = "public_documented_api_density";
}

/// In-memory metric catalog
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    metrics: HashMap<String, Metric>,
}

impl MetricCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the core metrics
    pub fn core() -> Self {
        use Direction::{Better, Worse};
        use ValueType::{Data, Int, Level, Millisec, Percent, Rating, WorkDur};

        let mut catalog = Self::new();
        for metric in [
            Metric::new(keys::ALERT_STATUS, "Quality Gate Status", Level).direction(Better),
            Metric::new(keys::QUALITY_GATE_DETAILS, "Quality Gate Details", Data).hidden(),
            Metric::new(keys::NCLOC, "Lines of Code", Int).direction(Worse),
            Metric::new(keys::NCLOC_DATA, "ncloc_data", Data).hidden(),
            Metric::new(keys::BUGS, "Bugs", Int).direction(Worse),
            Metric::new(keys::NEW_BUGS, "New Bugs", Int).direction(Worse),
            Metric::new(keys::VULNERABILITIES, "Vulnerabilities", Int).direction(Worse),
            Metric::new(keys::NEW_VULNERABILITIES, "New Vulnerabilities", Int).direction(Worse),
            Metric::new(keys::CODE_SMELLS, "Code Smells", Int).direction(Worse),
            Metric::new(keys::NEW_CODE_SMELLS, "New Code Smells", Int).direction(Worse),
            Metric::new(keys::BLOCKER_VIOLATIONS, "Blocker Issues", Int).direction(Worse),
            Metric::new(keys::COVERAGE, "Coverage", Percent).direction(Better),
            Metric::new(keys::NEW_COVERAGE, "Coverage on New Code", Percent).direction(Better),
            Metric::new(keys::DUPLICATED_LINES_DENSITY, "Duplicated Lines (%)", Percent)
                .direction(Worse),
            Metric::new(
                keys::NEW_DUPLICATED_LINES_DENSITY,
                "Duplicated Lines on New Code (%)",
                Percent,
            )
            .direction(Worse),
            Metric::new(keys::TEST_EXECUTION_TIME, "Unit Test Duration", Millisec).direction(Worse),
            Metric::new(keys::TECHNICAL_DEBT, "Technical Debt", WorkDur).direction(Worse),
            Metric::new(keys::NEW_TECHNICAL_DEBT, "Added Technical Debt", WorkDur).direction(Worse),
            Metric::new(keys::RELIABILITY_RATING, "Reliability Rating", Rating).direction(Worse),
            Metric::new(keys::NEW_RELIABILITY_RATING, "Reliability Rating on New Code", Rating)
                .direction(Worse),
            Metric::new(keys::SECURITY_RATING, "Security Rating", Rating).direction(Worse),
            Metric::new(keys::NEW_SECURITY_RATING, "Security Rating on New Code", Rating)
                .direction(Worse),
            Metric::new(keys::MAINTAINABILITY_RATING, "Maintainability Rating", Rating)
                .direction(Worse),
            Metric::new(
                keys::NEW_MAINTAINABILITY_RATING,
                "Maintainability Rating on New Code",
                Rating,
            )
            .direction(Worse),
            Metric::new(
                keys::PUBLIC_DOCUMENTED_API_DENSITY,
                "Public Documented API (%)",
                Percent,
            )
            .direction(Better),
        ] {
            catalog.register(metric);
        }
        catalog
    }

    /// Add or replace a metric
    pub fn register(&mut self, metric: Metric) {
        self.metrics.insert(metric.key.clone(), metric);
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl MetricFinder for MetricCatalog {
    fn find_by_key(&self, key: &str) -> Option<&Metric> {
        self.metrics.get(key)
    }
}
