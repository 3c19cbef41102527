//! Asynchronous log sink.
//!
//! The service records entries without waiting on the filesystem. A writer
//! task owns the log store and appends entries as they arrive; a failed
//! write is reported and dropped, and the writer moves on to the next entry.

use super::{LogEntry, LogStore};
use crate::error::{NotebookError, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Cloneable handle for emitting log entries.
#[derive(Debug, Clone)]
pub struct LogSink {
    tx: mpsc::UnboundedSender<LogEntry>,
}

impl LogSink {
    /// Starts a writer task that appends every recorded entry to `log`.
    ///
    /// The task ends once every `LogSink` clone has been dropped and the
    /// queue is drained; await [`LogWriter::finish`] to wait for that.
    pub fn spawn<S: LogStore>(store: S) -> (Self, LogWriter) {
        let (sink, rx) = Self::channel();
        let handle = tokio::spawn(write_entries(store, rx));
        (sink, LogWriter { handle })
    }

    /// Creates a sink whose entries are delivered to the returned receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LogEntry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queues an entry. Never blocks and never fails the caller.
    pub fn record(&self, entry: LogEntry) {
        if let Err(e) = self.tx.send(entry) {
            warn!(sql = %e.0.sql, "Query log is closed; entry dropped");
        }
    }
}

/// Handle to the background writer task.
#[derive(Debug)]
pub struct LogWriter {
    handle: JoinHandle<usize>,
}

impl LogWriter {
    /// Waits for the writer to drain and returns how many entries it wrote.
    ///
    /// Only completes after all `LogSink` handles are dropped.
    pub async fn finish(self) -> Result<usize> {
        self.handle
            .await
            .map_err(|e| NotebookError::internal(format!("query log writer failed: {e}")))
    }
}

async fn write_entries<S: LogStore>(
    mut store: S,
    mut rx: mpsc::UnboundedReceiver<LogEntry>,
) -> usize {
    let location = store.location();
    let mut written = 0;
    while let Some(entry) = rx.recv().await {
        match store.append(&entry).await {
            Ok(()) => {
                written += 1;
                debug!(sql = %entry.sql, path = %location, "Query logged");
            }
            Err(e) => warn!(sql = %entry.sql, error = %e, "Failed to write query log entry"),
        }
    }
    written
}
