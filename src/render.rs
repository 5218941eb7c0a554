//! Fixed-width text table rendering.
//!
//! Renders query results as plain text: optional title with an underline,
//! a header row, a dashed separator, one line per row and a record count.
//! Columns are auto-sized to their widest value and never truncated.

use crate::db::{QueryResult, Row, Value};

/// Printed instead of a table when there are no rows to show.
pub const NO_ROWS_MESSAGE: &str = "Query executed successfully, but returned no rows.";

/// Column delimiter used in header and data lines.
const COLUMN_SEPARATOR: &str = " | ";

/// Renders a query result under `title`.
pub fn render_result(result: &QueryResult, title: &str) -> String {
    render(&result.column_names(), &result.rows, title)
}

/// Renders `columns` and `rows` as an aligned text table.
///
/// An empty `title` is omitted. When `rows` is empty only the no-rows
/// message is produced, whatever `columns` holds. Every line of the table
/// (header, separator, rows) has the same character length.
pub fn render(columns: &[String], rows: &[Row], title: &str) -> String {
    let mut out = String::new();

    if !title.is_empty() {
        out.push_str(title);
        out.push('\n');
        out.push_str(&"=".repeat(char_len(title)));
        out.push('\n');
    }

    if rows.is_empty() {
        out.push_str(NO_ROWS_MESSAGE);
        out.push('\n');
        return out;
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(Value::to_display_string).collect())
        .collect();
    let widths = column_widths(columns, &cells);

    let header = format_line(columns, &widths);
    let separator = "-".repeat(char_len(&header));
    out.push_str(&header);
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');

    for row in &cells {
        out.push_str(&format_line(row, &widths));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!("Total: {} record(s)", rows.len()));
    out.push('\n');
    out
}

/// Computes the display width of each column: the longest of its header and
/// every rendered cell.
pub fn column_widths(columns: &[String], cells: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = columns.iter().map(|c| char_len(c)).collect();

    for row in cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(char_len(cell));
        }
    }

    widths
}

/// Left-aligns each value to its column width and joins them.
fn format_line(values: &[String], widths: &[usize]) -> String {
    values
        .iter()
        .zip(widths)
        .map(|(value, &width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR)
}

// `format!` pads by chars, so widths are measured the same way.
fn char_len(s: &str) -> usize {
    s.chars().count()
}
