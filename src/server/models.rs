//! Request and response bodies shared by the service and its client.

use serde::{Deserialize, Serialize};

/// Body of `POST /query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Statement to execute. Absent and blank are both rejected.
    #[serde(default)]
    pub sql: Option<String>,
}

impl QueryRequest {
    /// Creates a request for `sql`.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: Some(sql.into()),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
