//! Row types shared by the database clients, the service and the formatter.
//!
//! A row is a JSON object keyed by column name. Key order is the column
//! order reported by the database and survives serialization.

use serde_json::{Map, Value};

/// A single result row: column name -> value, in column order.
pub type Row = Map<String, Value>;

/// Builds a row from `(column, value)` pairs, keeping their order.
pub fn row<K, V, I>(pairs: I) -> Row
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Returns the column names of the first row in first-encountered order.
///
/// Later rows are not consulted; an empty row-set has no columns.
pub fn column_names(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default()
}

/// Renders a cell value for display: strings unquoted, `NULL` for null,
/// everything else in its JSON form.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
