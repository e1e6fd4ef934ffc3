//! Result sinks
//!
//! One [`ResultRecord`] is produced per solved (or timed-out) instance and
//! handed to a [`ResultSink`]. The SQLite sink keeps a `results` table that
//! accumulates across runs.

pub mod schema;
pub mod sqlite;

use crate::error::ReportResult;
use crate::graph::{color_count, Graph};
use crate::solver::SolveOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use sqlite::SqliteSink;

/// Solver identifier recorded with every result
pub const SOLVER_NAME: &str = "bnb-color/dsatur-greedy";

/// One row of results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub instance_name: String,
    pub solver_name: String,
    pub solver_version: String,
    pub worker_count: usize,
    pub core_count: usize,
    pub wall_time_secs: f64,
    pub time_limit_secs: f64,
    pub vertices: usize,
    pub edges: usize,
    /// Colors used by the reported coloring
    pub colors: usize,
    pub coloring: Vec<usize>,
    /// The coloring is proper
    pub valid: bool,
    pub proven_optimal: bool,
    pub solved_at: DateTime<Utc>,
}

impl ResultRecord {
    /// Build a record from a finished solve
    pub fn from_outcome(
        instance_name: impl Into<String>,
        graph: &Graph,
        outcome: &SolveOutcome,
        worker_count: usize,
        time_limit_secs: f64,
    ) -> Self {
        Self {
            instance_name: instance_name.into(),
            solver_name: SOLVER_NAME.to_string(),
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
            worker_count,
            core_count: num_cpus::get(),
            wall_time_secs: outcome.elapsed.as_secs_f64(),
            time_limit_secs,
            vertices: graph.len(),
            edges: graph.edge_count(),
            colors: color_count(&outcome.coloring),
            coloring: outcome.coloring.clone(),
            valid: graph.validate(&outcome.coloring),
            proven_optimal: outcome.proven_optimal,
            solved_at: Utc::now(),
        }
    }
}

/// Destination for result records
pub trait ResultSink {
    /// Record one result
    fn report(&mut self, record: &ResultRecord) -> ReportResult<()>;
}

/// Sink that keeps records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<ResultRecord>,
}

impl ResultSink for MemorySink {
    fn report(&mut self, record: &ResultRecord) -> ReportResult<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
