//! Result rendering for the note.
//!
//! SELECT results become a table; other statements become a fixed message.

use crate::config::ResultFormat;
use crate::db::{column_names, display_value, Row};
use crate::query::{QueryResult, StatementKind};

/// Rendered in place of a table when a SELECT returns no rows.
pub const NO_DATA: &str = "No data";

/// Message for a successful INSERT.
pub const INSERT_MESSAGE: &str = "Data insertion completed successfully!";

/// Message for a successful UPDATE.
pub const UPDATE_MESSAGE: &str = "Update completed successfully!";

/// Message for any other successful statement, DELETE included.
pub const SUCCESS_MESSAGE: &str = "Action completed successfully!";

/// Renders a query result as display text.
pub fn format_result(result: &QueryResult, format: ResultFormat) -> String {
    match result.statement_kind {
        StatementKind::Select if result.is_empty() => NO_DATA.to_string(),
        StatementKind::Select => match format {
            ResultFormat::Markdown => markdown_table(&result.rows),
            ResultFormat::Html => html_table(&result.rows),
        },
        StatementKind::Insert => INSERT_MESSAGE.to_string(),
        StatementKind::Update => UPDATE_MESSAGE.to_string(),
        StatementKind::Delete | StatementKind::Other => SUCCESS_MESSAGE.to_string(),
    }
}

/// Cell text for `column` in `row`; columns absent from the row render empty.
fn cell(row: &Row, column: &str) -> String {
    row.get(column).map(display_value).unwrap_or_default()
}

fn markdown_table(rows: &[Row]) -> String {
    let headers = column_names(rows);
    let mut out = String::new();

    out.push('|');
    for header in &headers {
        out.push_str(&format!(" {} |", escape_markdown(header)));
    }
    out.push('\n');

    out.push('|');
    for _ in &headers {
        out.push_str(" --- |");
    }

    for row in rows {
        out.push_str("\n|");
        for header in &headers {
            out.push_str(&format!(" {} |", escape_markdown(&cell(row, header))));
        }
    }

    out
}

fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

fn html_table(rows: &[Row]) -> String {
    let headers = column_names(rows);
    let mut out = String::from(r#"<table class="sql-table"><tr>"#);

    for header in &headers {
        out.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    out.push_str("</tr>");

    for row in rows {
        out.push_str("<tr>");
        for header in &headers {
            out.push_str(&format!("<td>{}</td>", escape_html(&cell(row, header))));
        }
        out.push_str("</tr>");
    }

    out.push_str("</table>");
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
