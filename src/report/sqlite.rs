//! SQLite result sink

use super::schema;
use super::{ResultRecord, ResultSink};
use crate::error::{ReportError, ReportResult};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

/// Appends one row per result to a `results` table
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Open or create the results database at `path`
    pub fn open(path: &Path) -> ReportResult<Self> {
        let conn = Connection::open(path).map_err(|e| ReportError::CreateFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        schema::create_database(&conn)?;
        debug!(path = %path.display(), "Results database ready");
        Ok(Self { conn })
    }

    /// In-memory database (tests and dry runs)
    pub fn in_memory() -> ReportResult<Self> {
        let conn = Connection::open_in_memory()?;
        schema::create_database(&conn)?;
        Ok(Self { conn })
    }

    /// Underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Number of stored results
    pub fn count(&self) -> ReportResult<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM results", [], |row| row.get(0))?;
        Ok(n as u64)
    }
}

impl ResultSink for SqliteSink {
    fn report(&mut self, record: &ResultRecord) -> ReportResult<()> {
        let coloring = serde_json::to_string(&record.coloring)?;

        self.conn.execute(
            "INSERT INTO results (
                instance_name, solver_name, solver_version, worker_count, core_count,
                wall_time_secs, time_limit_secs, vertices, edges, colors,
                coloring, valid, proven_optimal, solved_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                record.instance_name,
                record.solver_name,
                record.solver_version,
                record.worker_count as i64,
                record.core_count as i64,
                record.wall_time_secs,
                record.time_limit_secs,
                record.vertices as i64,
                record.edges as i64,
                record.colors as i64,
                coloring,
                record.valid,
                record.proven_optimal,
                record.solved_at.to_rfc3339(),
            ],
        )?;

        debug!(instance = %record.instance_name, colors = record.colors, "Result recorded");
        Ok(())
    }
}
