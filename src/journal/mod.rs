//! Append-only audit trail of executed statements.
//!
//! `QueryLog` owns the log file. `LogSink` is the handle the query service
//! emits entries into; a background writer task drains it into the file so
//! the write never sits on the request path.

mod sink;
mod store;

pub use sink::{LogSink, LogWriter};
pub use store::QueryLog;

use crate::db::Row;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Destination the log writer appends entries to.
#[async_trait]
pub trait LogStore: Send + 'static {
    /// Where entries end up, for diagnostics.
    fn location(&self) -> String;

    /// Appends one entry; a failure affects only that entry.
    async fn append(&mut self, entry: &LogEntry) -> Result<()>;
}

/// One executed statement as written to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// The statement exactly as received.
    pub sql: String,

    /// Rows returned by the statement.
    pub result: Vec<Row>,

    /// When the service received the request.
    #[serde(with = "iso8601_millis")]
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Creates a log entry.
    pub fn new(sql: impl Into<String>, result: Vec<Row>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sql: sql.into(),
            result,
            timestamp,
        }
    }
}

/// ISO-8601 UTC timestamps with millisecond precision (`2024-01-15T10:30:00.000Z`).
mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
