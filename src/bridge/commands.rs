//! Editor command registry.
//!
//! Declarative metadata for the commands the bridge exposes to the host
//! editor: a stable id, a display name and an optional default hotkey.

use std::fmt;

/// The commands the editor bridge implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    /// Insert the database's table names at the selection.
    InsertTables,
    /// Execute the selected SQL and write back the formatted result.
    ExecuteSql,
    /// Wrap the selection in a fenced SQL code block.
    CodeBlock,
}

/// Metadata for one editor command.
#[derive(Debug, Clone)]
pub struct CommandDef {
    /// Stable identifier used by the host to bind the command.
    pub id: &'static str,
    /// Human-readable name shown in the command palette.
    pub name: &'static str,
    /// Default hotkey, if any.
    pub hotkey: Option<&'static str>,
    pub command: EditorCommand,
}

/// All commands, in palette order.
pub const COMMANDS: &[CommandDef] = &[
    CommandDef {
        id: "insert-tables",
        name: "Insert list of tables from PostgreSQL",
        hotkey: None,
        command: EditorCommand::InsertTables,
    },
    CommandDef {
        id: "execute-sql",
        name: "Execute selected SQL",
        hotkey: Some("Mod+Enter"),
        command: EditorCommand::ExecuteSql,
    },
    CommandDef {
        id: "code-block-from-selection",
        name: "Code block from selection",
        hotkey: None,
        command: EditorCommand::CodeBlock,
    },
];

impl EditorCommand {
    /// Returns the command's metadata.
    pub fn def(&self) -> &'static CommandDef {
        match self {
            Self::InsertTables => &COMMANDS[0],
            Self::ExecuteSql => &COMMANDS[1],
            Self::CodeBlock => &COMMANDS[2],
        }
    }

}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().id)
    }
}

impl fmt::Display for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<28} {}", self.id, self.name)?;
        if let Some(hotkey) = self.hotkey {
            write!(f, " [{hotkey}]")?;
        }
        Ok(())
    }
}
