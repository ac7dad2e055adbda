//! Metrics registry for sqlgate
//!
//! - `db_queries{procedure}`: summary of engine call latency in nanoseconds
//! - `db_errors{procedure}`: count of failed engine calls
//!
//! The registry is constructed at startup and handed to whoever records into
//! it; there is no process-global instance.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

use super::summary::{Objective, Summary, SummarySnapshot, DEFAULT_OBJECTIVES};
use crate::core::Procedure;

/// One timed engine call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub procedure: Procedure,
    pub duration: Duration,
}

impl Observation {
    pub fn new(procedure: Procedure, duration: Duration) -> Self {
        Self {
            procedure,
            duration,
        }
    }

    /// Duration in nanoseconds, the unit `db_queries` is recorded in
    pub fn nanos(&self) -> f64 {
        self.duration.as_nanos() as f64
    }
}

#[derive(Debug)]
struct ProcedureMetrics {
    queries: Summary,
    errors: AtomicU64,
}

impl ProcedureMetrics {
    fn new(objectives: &[Objective]) -> Self {
        Self {
            queries: Summary::new(objectives),
            errors: AtomicU64::new(0),
        }
    }
}

/// Per-procedure latency summaries and error counters
#[derive(Debug)]
pub struct MetricsRegistry {
    exec: ProcedureMetrics,
    query: ProcedureMetrics,
}

impl MetricsRegistry {
    /// Create a registry with the default quantile objectives
    pub fn new() -> Self {
        Self::with_objectives(&DEFAULT_OBJECTIVES)
    }

    /// Create a registry with custom quantile objectives
    pub fn with_objectives(objectives: &[Objective]) -> Self {
        Self {
            exec: ProcedureMetrics::new(objectives),
            query: ProcedureMetrics::new(objectives),
        }
    }

    fn of(&self, procedure: Procedure) -> &ProcedureMetrics {
        match procedure {
            Procedure::Exec => &self.exec,
            Procedure::Query => &self.query,
        }
    }

    /// Record a duration observation into `db_queries`
    pub fn observe(&self, observation: Observation) {
        self.of(observation.procedure).queries.observe(observation.nanos());
    }

    /// Increment `db_errors`
    pub fn increment_errors(&self, procedure: Procedure) {
        self.of(procedure).errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Current `db_errors` value
    pub fn errors(&self, procedure: Procedure) -> u64 {
        self.of(procedure).errors.load(Ordering::Relaxed)
    }

    /// Current `db_queries` observation count
    pub fn observations(&self, procedure: Procedure) -> u64 {
        self.of(procedure).queries.snapshot().count
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut db_queries = BTreeMap::new();
        let mut db_errors = BTreeMap::new();
        for procedure in Procedure::ALL {
            let metrics = self.of(procedure);
            db_queries.insert(procedure, SummaryView::from(metrics.queries.snapshot()));
            db_errors.insert(procedure, metrics.errors.load(Ordering::Relaxed));
        }
        MetricsSnapshot {
            db_queries,
            db_errors,
        }
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of one summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub count: u64,
    pub sum: f64,
    /// Quantile label ("0.5") to estimate; `None` before the first observation
    pub quantiles: BTreeMap<String, Option<f64>>,
}

impl From<SummarySnapshot> for SummaryView {
    fn from(snapshot: SummarySnapshot) -> Self {
        let quantiles = snapshot
            .quantiles
            .into_iter()
            .map(|(q, v)| (q.to_string(), if v.is_nan() { None } else { Some(v) }))
            .collect();
        Self {
            count: snapshot.count,
            sum: snapshot.sum,
            quantiles,
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub db_queries: BTreeMap<Procedure, SummaryView>,
    pub db_errors: BTreeMap<Procedure, u64>,
}
