//! Database abstraction layer for sql-notebook.
//!
//! Provides a trait-based interface for the opaque query executor, so the
//! service can run against PostgreSQL or an in-memory mock interchangeably.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use postgres::PostgresClient;
pub use types::{column_names, display_value, row, Row};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Connects a pooled PostgreSQL client for the given configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &ConnectionConfig) -> Result<Arc<dyn DatabaseClient>> {
    let client = PostgresClient::connect(config).await?;
    Ok(Arc::new(client))
}

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with NotebookError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a single SQL statement verbatim and returns its rows.
    async fn execute_query(&self, sql: &str) -> Result<Vec<Row>>;

    /// Lists queryable table names in the order the catalog returns them.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Closes the underlying connections.
    async fn close(&self) -> Result<()>;
}
