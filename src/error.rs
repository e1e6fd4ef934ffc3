//! Error types for bnb-color
//!
//! This module defines the error hierarchy that covers:
//! - Graph ingestion errors (malformed DIMACS input)
//! - Configuration and CLI errors
//! - Worker thread and coordinator/worker protocol errors
//! - Result sink errors
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - A malformed instance is fatal for that instance only
//! - A protocol violation is fatal for the whole run
//! - Timeouts are outcomes, not errors

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the solver
#[derive(Error, Debug)]
pub enum SolverError {
    /// Graph ingestion errors
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Coordinator/worker message protocol errors
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Result sink errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Interrupted by signal
    #[error("Operation interrupted by signal")]
    Interrupted,
}

/// Graph ingestion errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// Failed to read the instance file
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing or repeated problem line
    #[error("Line {line}: {reason}")]
    ProblemLine { line: usize, reason: String },

    /// Edge line before the problem line
    #[error("Line {line}: edge declared before the problem line")]
    EdgeBeforeProblem { line: usize },

    /// Edge line that could not be parsed
    #[error("Line {line}: malformed edge '{text}'")]
    MalformedEdge { line: usize, text: String },

    /// Edge endpoint outside 1..=n
    #[error("Line {line}: vertex {vertex} out of range 1..={n}")]
    VertexOutOfRange { line: usize, vertex: usize, n: usize },

    /// Self loop (a graph with a loop has no proper coloring)
    #[error("Line {line}: self loop on vertex {vertex}")]
    SelfLoop { line: usize, vertex: usize },

    /// Unrecognised line tag
    #[error("Line {line}: unknown line type '{tag}'")]
    UnknownLine { line: usize, tag: String },

    /// No problem line found at all
    #[error("Missing problem line ('p edge <n> <m>')")]
    MissingProblem,
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid batch size
    #[error("Invalid batch size {size}: must be between {min} and {max}")]
    InvalidBatchSize { size: usize, min: usize, max: usize },

    /// Invalid time limit
    #[error("Invalid time limit: must be greater than zero")]
    InvalidTimeLimit,

    /// Invalid poll interval
    #[error("Invalid poll interval: must be greater than zero")]
    InvalidPollInterval,

    /// Invalid exclude pattern
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },

    /// Output path error
    #[error("Invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },

    /// Instance path error
    #[error("Invalid instance path '{path}': {reason}")]
    InvalidInstancePath { path: PathBuf, reason: String },

    /// Nothing to solve
    #[error("No instances to solve")]
    NoInstances,
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Thread spawn failed
    #[error("Failed to spawn {role} {id}: {reason}")]
    SpawnFailed {
        role: &'static str,
        id: usize,
        reason: String,
    },
}

/// Coordinator/worker message protocol errors
///
/// After any of these, the bound and queue state can no longer be trusted.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The worker end of the link went away while a command was being sent
    #[error("Worker {id} is unreachable: command channel closed")]
    CommandChannelClosed { id: usize },

    /// The worker end of the link went away while a reply was awaited
    #[error("Worker {id} hung up before replying")]
    ReplyChannelClosed { id: usize },

    /// The coordinator end of the link went away
    #[error("Coordinator link for worker {id} closed")]
    CoordinatorGone { id: usize },
}

/// Result sink errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to create results database
    #[error("Failed to create results database at '{path}': {reason}")]
    CreateFailed { path: PathBuf, reason: String },
}

/// Result type alias for SolverError
pub type Result<T> = std::result::Result<T, SolverError>;

/// Result type alias for GraphError
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Result type alias for ReportError
pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Represents the outcome of one instance in a multi-instance run
#[derive(Debug)]
pub enum InstanceOutcome {
    /// Optimality proven
    Solved { instance: String, colors: usize },

    /// Time budget exhausted; best bound is unproven
    TimedOut { instance: String, colors: usize },

    /// Skipped due to malformed input
    Skipped { instance: String, reason: String },
}

impl InstanceOutcome {
    /// Returns true if this outcome carries a proven chromatic number
    pub fn is_proven(&self) -> bool {
        matches!(self, InstanceOutcome::Solved { .. })
    }

    /// Returns the instance associated with this outcome
    pub fn instance(&self) -> &str {
        match self {
            InstanceOutcome::Solved { instance, .. } => instance,
            InstanceOutcome::TimedOut { instance, .. } => instance,
            InstanceOutcome::Skipped { instance, .. } => instance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let graph_err = GraphError::MissingProblem;
        let solver_err: SolverError = graph_err.into();
        assert!(matches!(solver_err, SolverError::Graph(_)));

        let proto_err = ProtocolError::ReplyChannelClosed { id: 3 };
        let solver_err: SolverError = proto_err.into();
        assert!(matches!(solver_err, SolverError::Protocol(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = GraphError::VertexOutOfRange {
            line: 4,
            vertex: 9,
            n: 5,
        };
        assert_eq!(err.to_string(), "Line 4: vertex 9 out of range 1..=5");
    }

    #[test]
    fn test_instance_outcome() {
        let solved = InstanceOutcome::Solved {
            instance: "myciel3.col".into(),
            colors: 4,
        };
        assert!(solved.is_proven());
        assert_eq!(solved.instance(), "myciel3.col");

        let timed_out = InstanceOutcome::TimedOut {
            instance: "le450_15a.col".into(),
            colors: 16,
        };
        assert!(!timed_out.is_proven());
        assert_eq!(timed_out.instance(), "le450_15a.col");

        let skipped = InstanceOutcome::Skipped {
            instance: "broken.col".into(),
            reason: "vertex count too large".into(),
        };
        assert!(!skipped.is_proven());
        assert_eq!(skipped.instance(), "broken.col");
    }
}
