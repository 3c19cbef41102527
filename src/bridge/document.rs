//! In-memory text surface over a markdown document.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use super::TextSurface;
use crate::error::{NotebookError, Result};

/// A 1-based, inclusive range of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl FromStr for LineRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| format!("Invalid line number: '{part}'"))
        };

        let (start, end) = match s.split_once('-') {
            Some((a, b)) => (parse(a)?, parse(b)?),
            None => {
                let line = parse(s)?;
                (line, line)
            }
        };

        if start == 0 {
            return Err("Line numbers start at 1".to_string());
        }
        if end < start {
            return Err(format!("Invalid line range: {start}-{end}"));
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A document with a byte-range selection.
///
/// Writing replaces the selection and leaves an empty selection (a cursor)
/// just after the inserted text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSurface {
    text: String,
    selection: Range<usize>,
}

impl DocumentSurface {
    /// Creates a surface with the cursor at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: end..end,
        }
    }

    /// Selects a byte range; both ends must fall on character boundaries.
    pub fn select(&mut self, range: Range<usize>) -> Result<()> {
        if range.start > range.end
            || range.end > self.text.len()
            || !self.text.is_char_boundary(range.start)
            || !self.text.is_char_boundary(range.end)
        {
            return Err(NotebookError::invalid_request(format!(
                "Selection {}..{} is not valid for this note",
                range.start, range.end
            )));
        }
        self.selection = range;
        Ok(())
    }

    /// Selects whole lines, including the last line's newline.
    pub fn select_lines(&mut self, lines: LineRange) -> Result<()> {
        let mut offset = 0;
        let mut start = None;

        for (index, line) in self.text.split_inclusive('\n').enumerate() {
            let number = index + 1;
            if number == lines.start {
                start = Some(offset);
            }
            offset += line.len();
            if number == lines.end {
                if let Some(start) = start {
                    return self.select(start..offset);
                }
            }
        }

        Err(NotebookError::invalid_request(format!(
            "Lines {lines} are outside the note ({} lines)",
            self.line_count()
        )))
    }

    /// Full document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn line_count(&self) -> usize {
        self.text.split_inclusive('\n').count()
    }
}

impl TextSurface for DocumentSurface {
    fn read_selection(&self) -> String {
        self.text[self.selection.clone()].to_string()
    }

    fn write_at_selection(&mut self, text: &str) {
        let start = self.selection.start;
        self.text.replace_range(self.selection.clone(), text);
        let cursor = start + text.len();
        self.selection = cursor..cursor;
    }
}
