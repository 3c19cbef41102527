//! Query execution with audit logging.
//!
//! Validates the statement, runs it once against the database and emits a
//! log entry for every success. Failures are reported with a short generic
//! message; the engine's detail only goes to the diagnostics log.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error};

use crate::db::DatabaseClient;
use crate::error::{NotebookError, Result};
use crate::journal::{LogEntry, LogSink};
use crate::query::QueryResult;

/// Error message for a missing or blank statement.
pub const MISSING_SQL: &str = "SQL query is missing";

/// Error message returned for any execution failure.
pub const EXECUTION_FAILED: &str = "An error occurred while executing the query";

/// Runs user statements and records successful ones.
pub struct QueryService {
    db: Arc<dyn DatabaseClient>,
    sink: LogSink,
}

impl QueryService {
    /// Creates a service over the given database and log sink.
    pub fn new(db: Arc<dyn DatabaseClient>, sink: LogSink) -> Self {
        Self { db, sink }
    }

    /// Executes `sql` verbatim.
    ///
    /// Blank input fails with `InvalidRequest` before touching the database.
    /// Statements are never retried.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult> {
        if sql.trim().is_empty() {
            return Err(NotebookError::invalid_request(MISSING_SQL));
        }

        let received_at = Utc::now();
        let start = Instant::now();

        let rows = self.db.execute_query(sql).await.map_err(|e| {
            error!(sql, error = %e, "Query execution failed");
            NotebookError::execution(EXECUTION_FAILED)
        })?;

        debug!(
            sql,
            rows = rows.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Query executed"
        );

        self.sink.record(LogEntry::new(sql, rows.clone(), received_at));

        Ok(QueryResult::new(sql, rows))
    }
}
