//! Human-readable schema report.
//!
//! Each table is printed as soon as it has been described. Absent (SQL NULL)
//! values print as `NULL` so they stay distinguishable from empty strings.

use crate::models::TableReport;
use crate::walker::WalkObserver;
use crate::{InspectError, Result};
use std::io::Write;

/// Column headings, in descriptor order
pub const HEADINGS: [&str; 6] = ["Field", "Type", "Null", "Key", "Default", "Extra"];

const NULL: &str = "NULL";
const GAP: &str = "  ";
const INDENT: &str = "  ";

/// Writes walk progress as aligned text.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    /// Creates a reporter writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints the selected database name.
    ///
    /// # Errors
    /// Returns error if writing fails
    pub fn write_database(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "Database: {}", name)
            .and_then(|()| writeln!(self.out))
            .map_err(|e| InspectError::io("writing database header", e))
    }

    /// Prints one table report followed by a blank line.
    ///
    /// # Errors
    /// Returns error if writing fails
    pub fn write_table(&mut self, report: &TableReport) -> Result<()> {
        tracing::info!(
            table = %report.table_name,
            columns = report.columns.len(),
            failed = report.is_failed(),
            "table described"
        );
        render_table(report)
            .into_iter()
            .try_for_each(|line| writeln!(self.out, "{}", line))
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush())
            .map_err(|e| InspectError::io(format!("writing table {}", report.table_name), e))
    }
}

impl<W: Write> WalkObserver for Reporter<W> {
    fn database_selected(&mut self, name: &str) -> Result<()> {
        self.write_database(name)
    }

    fn table_described(&mut self, report: &TableReport) -> Result<()> {
        self.write_table(report)
    }
}

/// Renders a table report as lines without trailing newlines.
pub fn render_table(report: &TableReport) -> Vec<String> {
    let mut lines = vec![format!("Table: {}", report.table_name)];

    if let Some(failure) = &report.failure {
        lines.push(format!("{}(describe failed: {})", INDENT, failure));
        return lines;
    }
    if report.columns.is_empty() {
        lines.push(format!("{}(no columns)", INDENT));
        return lines;
    }

    let rows: Vec<[&str; 6]> = report
        .columns
        .iter()
        .map(|column| column.cells().map(|cell| cell.unwrap_or(NULL)))
        .collect();

    let mut widths = HEADINGS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    lines.push(render_row(&HEADINGS, &widths));
    lines.extend(rows.iter().map(|row| render_row(row, &widths)));
    lines
}

fn render_row(cells: &[&str; 6], widths: &[usize; 6]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    format!("{}{}", INDENT, padded.join(GAP)).trim_end().to_string()
}
