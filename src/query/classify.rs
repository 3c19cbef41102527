//! Lexical statement classification.
//!
//! Only the leading keyword is inspected: comment-prefixed SQL, CTEs and
//! multi-statement text all classify by whatever token comes first.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse statement category used to pick a result rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl StatementKind {
    /// Returns the keyword form of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a statement by its first whitespace-delimited token.
pub fn classify(sql: &str) -> StatementKind {
    let Some(first) = sql.split_whitespace().next() else {
        return StatementKind::Other;
    };

    match first.to_uppercase().as_str() {
        "SELECT" => StatementKind::Select,
        "INSERT" => StatementKind::Insert,
        "UPDATE" => StatementKind::Update,
        "DELETE" => StatementKind::Delete,
        _ => StatementKind::Other,
    }
}
