//! PostgreSQL database client implementation.
//!
//! Provides the `PostgresClient` struct that implements the `DatabaseClient` trait
//! for PostgreSQL databases using a bounded sqlx connection pool.

use crate::config::ConnectionConfig;
use crate::db::{DatabaseClient, Row};
use crate::error::{NotebookError, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Number, Value};
use sqlx::postgres::types::{Oid, PgInterval, PgMoney, PgTimeTz};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow, PgTypeInfo, PgTypeKind, Postgres};
use sqlx::types::{BigDecimal, Uuid};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo};
use std::fmt::Write;
use std::time::Duration;
use tracing::{debug, warn};

/// Statement timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 30;

/// Maximum number of connection retry attempts.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay between retry attempts (doubles each retry).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Table names in the public schema. No ORDER BY: callers get catalog order.
const LIST_TABLES_SQL: &str = r#"
    SELECT table_name::text
    FROM information_schema.tables
    WHERE table_schema = 'public'
"#;

/// PostgreSQL database client.
#[derive(Debug, Clone)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Opens a bounded pool, retrying transient connection failures with backoff.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;

        let mut last_error = None;
        let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);

        for attempt in 1..=MAX_RETRY_ATTEMPTS {
            debug!("Connection attempt {} of {}", attempt, MAX_RETRY_ATTEMPTS);

            let result = PgPoolOptions::new()
                .max_connections(config.max_connections.max(1))
                .acquire_timeout(Duration::from_secs(10))
                .connect(&conn_str)
                .await;

            match result {
                Ok(pool) => {
                    debug!(
                        "Connected to {} (max {} connections)",
                        config.display_string(),
                        config.max_connections
                    );
                    return Ok(Self { pool });
                }
                Err(e) => {
                    let is_transient = is_transient_error(&e);
                    last_error = Some(e);

                    if !is_transient {
                        break;
                    }
                    if attempt < MAX_RETRY_ATTEMPTS {
                        warn!(
                            "Connection attempt {} failed (transient error), retrying in {:?}",
                            attempt, delay
                        );
                        tokio::time::sleep(delay).await;
                        delay *= 2; // Exponential backoff
                    }
                }
            }
        }

        match last_error {
            Some(e) => Err(map_connection_error(e, config)),
            None => Err(NotebookError::internal("no connection attempt was made")),
        }
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    async fn execute_query(&self, sql: &str) -> Result<Vec<Row>> {
        let rows = tokio::time::timeout(
            Duration::from_secs(QUERY_TIMEOUT_SECS),
            sqlx::query(sql).fetch_all(&self.pool),
        )
        .await
        .map_err(|_| {
            NotebookError::execution(format!(
                "Query timed out after {QUERY_TIMEOUT_SECS} seconds"
            ))
        })?
        .map_err(|e| NotebookError::execution(format_query_error(e)))?;

        rows.iter().map(convert_row).collect()
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        sqlx::query_scalar(LIST_TABLES_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| NotebookError::catalog(format!("Failed to fetch tables: {e}")))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Converts a sqlx PgRow to a column-ordered JSON row.
fn convert_row(row: &PgRow) -> Result<Row> {
    row.columns()
        .iter()
        .map(|col| {
            let value = convert_value(row, col.ordinal(), col.type_info()).map_err(|e| {
                NotebookError::execution(format!(
                    "Cannot decode column \"{}\" of type {}: {e}",
                    col.name(),
                    col.type_info().name()
                ))
            })?;
            Ok((col.name().to_string(), value))
        })
        .collect()
}

type Decoded = std::result::Result<Value, sqlx::Error>;

/// Converts a single column value from a PgRow to JSON, by Postgres type name.
///
/// NULL maps to `null`; a value that cannot be decoded is an error.
fn convert_value(row: &PgRow, index: usize, type_info: &PgTypeInfo) -> Decoded {
    match type_info.name().to_uppercase().as_str() {
        "BOOL" => decode(row, index, Value::Bool),
        "INT2" => decode(row, index, |v: i16| Value::from(v)),
        "INT4" => decode(row, index, |v: i32| Value::from(v)),
        "INT8" => decode(row, index, |v: i64| Value::from(v)),
        "OID" => decode(row, index, |v: Oid| Value::from(v.0)),
        "FLOAT4" => decode(row, index, |v: f32| float_value(v.into())),
        "FLOAT8" => decode(row, index, float_value),
        // Arbitrary precision; kept as text so no digits are lost.
        "NUMERIC" => decode(row, index, |v: BigDecimal| Value::String(v.to_string())),
        "MONEY" => decode(row, index, |v: PgMoney| Value::String(money_text(v))),
        "UUID" => decode(row, index, |v: Uuid| Value::String(v.to_string())),
        "JSON" | "JSONB" => decode(row, index, |v: Value| v),
        "BYTEA" => decode(row, index, |v: Vec<u8>| Value::String(hex_literal(&v))),
        "TIMESTAMPTZ" => decode(row, index, |v: DateTime<Utc>| Value::String(v.to_rfc3339())),
        "TIMESTAMP" => decode(row, index, |v: NaiveDateTime| Value::String(v.to_string())),
        "DATE" => decode(row, index, |v: NaiveDate| Value::String(v.to_string())),
        "TIME" => decode(row, index, |v: NaiveTime| Value::String(v.to_string())),
        "TIMETZ" => decode(row, index, |v: PgTimeTz<NaiveTime, FixedOffset>| {
            Value::String(format!("{}{}", v.time, v.offset))
        }),
        "INTERVAL" => decode(row, index, |v: PgInterval| Value::String(interval_text(&v))),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" | "UNKNOWN" => {
            decode(row, index, Value::String)
        }

        "BOOL[]" => decode_array(row, index, Value::Bool),
        "INT2[]" => decode_array(row, index, |v: i16| Value::from(v)),
        "INT4[]" => decode_array(row, index, |v: i32| Value::from(v)),
        "INT8[]" => decode_array(row, index, |v: i64| Value::from(v)),
        "FLOAT4[]" => decode_array(row, index, |v: f32| float_value(v.into())),
        "FLOAT8[]" => decode_array(row, index, float_value),
        "NUMERIC[]" => decode_array(row, index, |v: BigDecimal| Value::String(v.to_string())),
        "UUID[]" => decode_array(row, index, |v: Uuid| Value::String(v.to_string())),
        "JSONB[]" | "JSON[]" => decode_array(row, index, |v: Value| v),
        "TEXT[]" | "VARCHAR[]" | "BPCHAR[]" | "NAME[]" => decode_array(row, index, Value::String),

        // Enum labels travel as UTF-8 text in both wire formats.
        _ if matches!(type_info.kind(), PgTypeKind::Enum(_)) => Ok(row
            .try_get_unchecked::<Option<String>, _>(index)?
            .map(Value::String)
            .unwrap_or(Value::Null)),

        other => Err(sqlx::Error::Decode(
            format!("unsupported column type {other}").into(),
        )),
    }
}

/// Decodes a nullable column and converts it with `to_json`.
fn decode<'r, T, F>(row: &'r PgRow, index: usize, to_json: F) -> Decoded
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
    F: FnOnce(T) -> Value,
{
    Ok(row
        .try_get::<Option<T>, _>(index)?
        .map(to_json)
        .unwrap_or(Value::Null))
}

/// Decodes a nullable one-dimensional array, keeping NULL elements.
fn decode_array<'r, T, F>(row: &'r PgRow, index: usize, to_json: F) -> Decoded
where
    Vec<Option<T>>: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
    F: Fn(T) -> Value,
{
    decode(row, index, |items: Vec<Option<T>>| {
        Value::Array(
            items
                .into_iter()
                .map(|item| item.map(&to_json).unwrap_or(Value::Null))
                .collect(),
        )
    })
}

/// NaN and infinities have no JSON number form; keep them as text.
fn float_value(v: f64) -> Value {
    Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(v.to_string()))
}

/// Formats bytes the way psql prints bytea (`\x` followed by hex).
fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Money in the server's default two-decimal form, without currency symbol.
fn money_text(money: PgMoney) -> String {
    let cents = money.0;
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Formats an interval the way Postgres prints it by default,
/// e.g. `1 year 2 mons 3 days 04:05:06.5`.
fn interval_text(interval: &PgInterval) -> String {
    let mut parts = Vec::new();
    let years = interval.months / 12;
    let months = interval.months % 12;

    let unit = |n: i64, singular: &str, plural: &str| {
        format!("{n} {}", if n.abs() == 1 { singular } else { plural })
    };
    if years != 0 {
        parts.push(unit(years.into(), "year", "years"));
    }
    if months != 0 {
        parts.push(unit(months.into(), "mon", "mons"));
    }
    if interval.days != 0 {
        parts.push(unit(interval.days.into(), "day", "days"));
    }

    if interval.microseconds != 0 || parts.is_empty() {
        let sign = if interval.microseconds < 0 { "-" } else { "" };
        let micros = interval.microseconds.unsigned_abs();
        let secs = micros / 1_000_000;
        let mut time = format!(
            "{sign}{:02}:{:02}:{:02}",
            secs / 3600,
            secs / 60 % 60,
            secs % 60
        );
        let fraction = micros % 1_000_000;
        if fraction != 0 {
            let digits = format!("{fraction:06}");
            time.push('.');
            time.push_str(digits.trim_end_matches('0'));
        }
        parts.push(time);
    }

    parts.join(" ")
}

/// Determines if an error is transient and worth retrying.
fn is_transient_error(error: &sqlx::Error) -> bool {
    let error_str = error.to_string().to_lowercase();

    // Authentication and database-not-found errors are not transient
    if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
        || error_str.contains("does not exist")
        || error_str.contains("ssl")
        || error_str.contains("tls")
    {
        return false;
    }

    // Connection refused or timeout are often transient
    error_str.contains("connection refused")
        || error_str.contains("timed out")
        || error_str.contains("timeout")
        || error_str.contains("temporarily unavailable")
        || error_str.contains("connection reset")
        || error_str.contains("broken pipe")
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> NotebookError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config.port();
    let user = config.user.as_deref().unwrap_or("unknown");
    let database = config.database.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        NotebookError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
    {
        NotebookError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("does not exist") && error_str.contains("database") {
        NotebookError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        NotebookError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        NotebookError::connection(error.to_string())
    }
}

/// Formats a query error with Postgres detail and hint when available.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = String::from("ERROR: ");
    result.push_str(db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }
        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }
        if let Some(constraint) = pg_error.constraint() {
            result.push_str("\n  CONSTRAINT: ");
            result.push_str(constraint);
        }
    }

    result
}
