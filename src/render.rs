//! Text output for query results.

use std::fmt::Write;
use std::str::FromStr;

use crate::executor::{ExecutionResult, QueryResult};
use crate::table::Row;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Boxed ASCII table.
    #[default]
    Table,
    Csv,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output mode '{other}' (expected table or csv)")),
        }
    }
}

/// Renders a statement result. Row counts become a short message and
/// `CREATE TABLE` renders as nothing.
pub fn render(result: &ExecutionResult, mode: OutputMode) -> String {
    match result {
        ExecutionResult::Rows(query) => render_query(query, mode),
        ExecutionResult::RowsAffected(1) => "1 row affected\n".to_string(),
        ExecutionResult::RowsAffected(n) => format!("{n} rows affected\n"),
        ExecutionResult::Success => String::new(),
    }
}

pub fn render_query(result: &QueryResult, mode: OutputMode) -> String {
    match mode {
        OutputMode::Table => render_table(&result.columns, &result.rows),
        OutputMode::Csv => render_csv(&result.columns, &result.rows),
    }
}

fn separator(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn table_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width - cell.chars().count();
        let _ = write!(line, " {cell}{} |", " ".repeat(pad));
    }
    line.push('\n');
    line
}

/// Boxed table with one column per result column, each as wide as its
/// widest cell. An empty result still prints the header.
pub fn render_table(columns: &[String], rows: &[Row]) -> String {
    if columns.is_empty() {
        return String::new();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(Value::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = separator(&widths);
    let mut out = border.clone();
    out.push_str(&table_line(columns, &widths));
    out.push_str(&border);
    for row in &cells {
        out.push_str(&table_line(row, &widths));
    }
    out.push_str(&border);
    out
}

/// Quotes a CSV field when it contains a comma, a quote or a line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn render_csv(columns: &[String], rows: &[Row]) -> String {
    let mut out = String::new();
    let header: Vec<String> = columns.iter().map(|c| csv_field(c)).collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in rows {
        let fields: Vec<String> = row.iter().map(|v| csv_field(&v.to_string())).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}
