//! Prometheus counters for live gate computations.
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use qgate_quality::EvaluationStatus;
use std::fmt;

use crate::issue_index::IndexError;

#[derive(Clone)]
pub struct LiveGateMetrics {
    registry: Registry,
    evaluations: IntCounterVec,
    index_failures: IntCounterVec,
}

impl LiveGateMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    /// Register the counters on an existing registry
    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let evaluations = IntCounterVec::new(
            Opts::new("qgate_live_evaluations_total", "Live quality gate computations by status"),
            &["status"],
        )?;
        let index_failures = IntCounterVec::new(
            Opts::new("qgate_live_index_failures_total", "Issue index queries that failed"),
            &["kind"],
        )?;
        registry.register(Box::new(evaluations.clone()))?;
        registry.register(Box::new(index_failures.clone()))?;
        Ok(Self {
            registry,
            evaluations,
            index_failures,
        })
    }

    pub fn record_evaluation(&self, status: EvaluationStatus) {
        self.evaluations.with_label_values(&[status.as_str()]).inc();
    }

    /// Counted by failure kind; the component only goes to the logs
    pub fn record_index_failure(&self, error: &IndexError) {
        self.index_failures.with_label_values(&[error.kind()]).inc();
    }

    pub fn index_failures(&self, kind: &str) -> u64 {
        self.index_failures.with_label_values(&[kind]).get()
    }

    pub fn evaluations(&self, status: EvaluationStatus) -> u64 {
        self.evaluations.with_label_values(&[status.as_str()]).get()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render the registry in the text exposition format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

impl fmt::Debug for LiveGateMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveGateMetrics").finish_non_exhaustive()
    }
}
