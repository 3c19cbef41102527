//! Mock database clients for testing and demos.
//!
//! `MockDatabaseClient` answers from memory; `FailingDatabaseClient` fails
//! every call.

use super::{row, DatabaseClient, Row};
use crate::error::{NotebookError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// A mock database client that returns predefined results.
///
/// Scripted statements return their rows; any other SELECT echoes the
/// statement back in a single `result` column; everything else returns no rows.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    tables: Vec<String>,
    scripted: HashMap<String, Vec<Row>>,
    latency: Option<Duration>,
    executed: Mutex<Vec<String>>,
}

impl MockDatabaseClient {
    /// Creates a new mock database client with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table names returned by the catalog.
    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Scripts the rows returned for an exact statement.
    pub fn with_result(mut self, sql: impl Into<String>, rows: Vec<Row>) -> Self {
        self.scripted.insert(sql.into(), rows);
        self
    }

    /// Delays every statement, to make concurrent requests overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns the statements executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn record(&self, sql: &str) {
        if let Ok(mut guard) = self.executed.lock() {
            guard.push(sql.to_string());
        }
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<Vec<Row>> {
        self.record(sql);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(rows) = self.scripted.get(sql) {
            return Ok(rows.clone());
        }

        if sql.trim_start().to_uppercase().starts_with("SELECT") {
            Ok(vec![row([("result", format!("Mock result for: {sql}"))])])
        } else {
            Ok(Vec::new())
        }
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.clone())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client whose every call fails.
#[derive(Debug, Clone)]
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    /// Creates a client failing with the given engine message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingDatabaseClient {
    fn default() -> Self {
        Self::new("connection to server was lost")
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<Vec<Row>> {
        Err(NotebookError::execution(self.message.clone()))
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        Err(NotebookError::catalog(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
