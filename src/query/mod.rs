//! Query execution, classification and result formatting.
//!
//! This module holds the service-side pipeline (executor, catalog) and the
//! pieces the editor bridge reuses to render results.

pub mod catalog;
pub mod classify;
pub mod executor;
pub mod format;

pub use catalog::TableCatalog;
pub use classify::{classify, StatementKind};
pub use executor::QueryService;
pub use format::format_result;

use crate::db::Row;
use serde::{Deserialize, Serialize};

/// Rows returned by a statement, tagged with the statement's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Rows in the order the engine produced them.
    pub rows: Vec<Row>,

    /// Kind inferred from the statement text.
    pub statement_kind: StatementKind,
}

impl QueryResult {
    /// Creates a result for `sql`, classifying it lexically.
    pub fn new(sql: &str, rows: Vec<Row>) -> Self {
        Self {
            rows,
            statement_kind: classify(sql),
        }
    }

    /// Returns true if the statement returned no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
