//! Editor bridge: runs the editor commands against a text surface.
//!
//! The host editor is reached only through two narrow traits, `TextSurface`
//! for the document and `Notifier` for transient notices. The service is
//! reached through `NotebookApi`, normally `HttpApi`.

mod client;
pub mod commands;
mod document;

pub use client::HttpApi;
pub use commands::{CommandDef, EditorCommand, COMMANDS};
pub use document::{DocumentSurface, LineRange};

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::ResultFormat;
use crate::db::Row;
use crate::error::Result;
use crate::query::{format_result, QueryResult};

/// Heading written above the table list.
pub const TABLES_HEADING: &str = "==Tables in the database:==";

/// Label written above a query result.
pub const RESULT_LABEL: &str = "Result of the query:";

/// Notice for commands that need a selection.
pub const EMPTY_SELECTION_NOTICE: &str = "Select the SQL query to create the block.";

/// Notice when the table list cannot be loaded.
pub const TABLES_FAILED_NOTICE: &str = "Error loading list of tables.";

/// Notice when a query fails.
pub const QUERY_FAILED_NOTICE: &str = "an error occurred while executing the query";

/// The document the user is editing.
pub trait TextSurface {
    /// Returns the selected text (empty when there is only a cursor).
    fn read_selection(&self) -> String;

    /// Replaces the selection (or inserts at the cursor).
    fn write_at_selection(&mut self, text: &str);
}

/// Transient user-visible notices.
pub trait Notifier {
    fn notice(&mut self, message: &str);
}

/// Collects notices in memory.
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    pub notices: Vec<String>,
}

impl Notifier for NoticeLog {
    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

/// Prints notices to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notice(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Service operations the bridge calls.
#[async_trait]
pub trait NotebookApi: Send + Sync {
    /// Fetches table names.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Executes one statement, returning its rows.
    async fn execute(&self, sql: &str) -> Result<Vec<Row>>;
}

/// What a command did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The surface was updated.
    Applied,
    /// A warning notice was shown and nothing was changed.
    Skipped,
}

/// Runs editor commands. Each command awaits its single network call before
/// touching the surface.
pub struct EditorBridge<A, N> {
    api: A,
    notifier: N,
    format: ResultFormat,
}

impl<A: NotebookApi, N: Notifier> EditorBridge<A, N> {
    pub fn new(api: A, notifier: N, format: ResultFormat) -> Self {
        Self {
            api,
            notifier,
            format,
        }
    }

    /// The notifier, for inspecting shown notices.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Runs `command` against `surface`.
    pub async fn dispatch(
        &mut self,
        command: EditorCommand,
        surface: &mut dyn TextSurface,
    ) -> Result<CommandOutcome> {
        info!(command = %command, "Running editor command");
        match command {
            EditorCommand::InsertTables => self.insert_table_list(surface).await,
            EditorCommand::ExecuteSql => self.run_selection_as_query(surface).await,
            EditorCommand::CodeBlock => Ok(self.insert_code_block(surface)),
        }
    }

    /// Writes the table list at the selection.
    pub async fn insert_table_list(
        &mut self,
        surface: &mut dyn TextSurface,
    ) -> Result<CommandOutcome> {
        let tables = match self.api.list_tables().await {
            Ok(tables) => tables,
            Err(e) => {
                error!(
                    kind = e.category(),
                    error = %e,
                    "Error while receiving tables from the service"
                );
                self.notifier.notice(TABLES_FAILED_NOTICE);
                return Err(e);
            }
        };

        surface.write_at_selection(&format!("{TABLES_HEADING}\n{}\n", tables.join("\n")));
        Ok(CommandOutcome::Applied)
    }

    /// Executes the selected SQL and replaces the selection with the result.
    pub async fn run_selection_as_query(
        &mut self,
        surface: &mut dyn TextSurface,
    ) -> Result<CommandOutcome> {
        let Some(sql) = self.selected_sql(surface) else {
            return Ok(CommandOutcome::Skipped);
        };

        let rows = match self.api.execute(&sql).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(sql = %sql, kind = e.category(), error = %e, "Request execution error");
                self.notifier.notice(QUERY_FAILED_NOTICE);
                return Err(e);
            }
        };

        let formatted = format_result(&QueryResult::new(&sql, rows), self.format);
        surface.write_at_selection(&format!("{RESULT_LABEL}\n{formatted}\n"));
        Ok(CommandOutcome::Applied)
    }

    /// Replaces the selection with a fenced SQL code block.
    pub fn insert_code_block(&mut self, surface: &mut dyn TextSurface) -> CommandOutcome {
        let Some(sql) = self.selected_sql(surface) else {
            return CommandOutcome::Skipped;
        };

        surface.write_at_selection(&format!("\n```sql\n{sql}\n```\n"));
        CommandOutcome::Applied
    }

    /// Trimmed selection, or a warning notice when there is none.
    fn selected_sql(&mut self, surface: &dyn TextSurface) -> Option<String> {
        let selection = surface.read_selection();
        let sql = selection.trim();
        if sql.is_empty() {
            self.notifier.notice(EMPTY_SELECTION_NOTICE);
            return None;
        }
        Some(sql.to_string())
    }
}
