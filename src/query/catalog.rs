//! Table catalog lookups.

use std::sync::Arc;

use tracing::error;

use crate::db::DatabaseClient;
use crate::error::{NotebookError, Result};

/// Error message returned when the catalog cannot be read.
pub const CATALOG_FAILED: &str = "Failed to load the list of tables";

/// Lists queryable tables.
pub struct TableCatalog {
    db: Arc<dyn DatabaseClient>,
}

impl TableCatalog {
    /// Creates a catalog over the given database.
    pub fn new(db: Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }

    /// Returns table names in catalog order (not sorted).
    ///
    /// An empty database yields `Ok(vec![])`; only a failed lookup is an error.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        self.db.list_tables().await.map_err(|e| {
            error!(error = %e, "Catalog lookup failed");
            NotebookError::catalog(CATALOG_FAILED)
        })
    }
}
