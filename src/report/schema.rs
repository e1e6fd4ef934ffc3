//! Results database schema

use crate::error::ReportResult;
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: u32 = 1;

/// SQL to create the results table
const CREATE_RESULTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS results (
    id INTEGER PRIMARY KEY,
    instance_name TEXT NOT NULL,
    solver_name TEXT NOT NULL,
    solver_version TEXT NOT NULL,
    worker_count INTEGER NOT NULL,
    core_count INTEGER NOT NULL,
    wall_time_secs REAL NOT NULL,
    time_limit_secs REAL NOT NULL,
    vertices INTEGER NOT NULL,
    edges INTEGER NOT NULL,
    colors INTEGER NOT NULL,
    coloring TEXT NOT NULL,       -- JSON array, color per vertex
    valid INTEGER NOT NULL,       -- 0/1
    proven_optimal INTEGER NOT NULL,
    solved_at TEXT NOT NULL       -- RFC 3339
)
"#;

/// SQL to create run metadata table
const CREATE_META_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT
)
"#;

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_results_instance ON results(instance_name)",
];

/// Pragmas; result rows are few, durability matters more than speed
const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
"#;

/// Create (or open) the results schema
pub fn create_database(conn: &Connection) -> ReportResult<()> {
    conn.execute_batch(PRAGMAS)?;

    conn.execute(CREATE_RESULTS_TABLE, [])?;
    conn.execute(CREATE_META_TABLE, [])?;
    for sql in CREATE_INDEXES {
        conn.execute(sql, [])?;
    }

    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}
