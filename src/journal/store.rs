//! The log file itself.

use super::{LogEntry, LogStore};
use crate::error::{NotebookError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Newline-delimited JSON log, opened for append.
#[derive(Debug)]
pub struct QueryLog {
    path: PathBuf,
    file: File,
}

impl QueryLog {
    /// Opens (creating if needed) the log file at `path` in append mode.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                NotebookError::log_write(format!("{}: {e}", parent.display()))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| NotebookError::log_write(format!("{}: {e}", path.display())))?;

        Ok(Self { path, file })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogStore for QueryLog {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    /// Appends one entry as a single JSON line.
    async fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)
            .map_err(|e| NotebookError::log_write(format!("serialize: {e}")))?;
        line.push('\n');

        self.file
            .write_all(line.as_bytes())
            .await
            .map_err(|e| NotebookError::log_write(format!("{}: {e}", self.path.display())))?;
        self.file
            .flush()
            .await
            .map_err(|e| NotebookError::log_write(format!("{}: {e}", self.path.display())))
    }
}
