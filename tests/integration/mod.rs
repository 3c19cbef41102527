//! Integration tests for sql-notebook.

pub mod bridge_test;
pub mod pipeline_test;
pub mod postgres_test;

use std::path::Path;
use std::time::Duration;

use sql_notebook::journal::LogEntry;

/// Polls the query log until it holds `expected` entries or a second passes.
pub async fn wait_for_entries(path: &Path, expected: usize) -> Vec<LogEntry> {
    for _ in 0..50 {
        let entries = read_entries(path);
        if entries.len() >= expected {
            return entries;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    read_entries(path)
}

fn read_entries(path: &Path) -> Vec<LogEntry> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}
