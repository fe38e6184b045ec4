//! Tabular report rendering: console, json, and csv backends.

use std::io::Write;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

/// One tabular report: a title, column names, and stringified rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    pub fn new(title: &str, columns: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            columns: columns.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// Render the report for the requested format and write it out.
///
/// # Errors
///
/// Returns an error if the sink cannot be written.
pub fn emit(report: &Report, format: &str, sink: &mut dyn Write) -> Result<()> {
    let rendered = match format {
        "json" => render_json(report),
        "csv" => render_csv(report),
        _ => render_console(report),
    };
    sink.write_all(rendered.as_bytes())
        .context("writing report")?;
    Ok(())
}

fn column_widths(report: &Report) -> Vec<usize> {
    let mut widths: Vec<usize> = report.columns.iter().map(String::len).collect();
    for row in &report.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.len());
            }
        }
    }
    widths
}

fn render_console(report: &Report) -> String {
    let widths = column_widths(report);
    let mut out = String::new();
    out.push_str(&format!("{}\n", report.title.bright_cyan().bold()));
    out.push_str(&format!("{}\n", "=".repeat(report.title.len()).cyan()));

    let header: Vec<String> = report
        .columns
        .iter()
        .zip(widths.iter().copied())
        .map(|(name, w)| format!("{name:<w$}"))
        .collect();
    out.push_str(&format!("{}\n", header.join("  ").bold()));

    for row in &report.rows {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        out.push_str(&line.join("  "));
        out.push('\n');
    }
    out.push_str(&format!("{} rows\n", report.rows.len()));
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    title: &'a str,
    columns: &'a [String],
    rows: Vec<Value>,
}

fn render_json(report: &Report) -> String {
    let rows: Vec<Value> = report
        .rows
        .iter()
        .map(|row| {
            let object: serde_json::Map<String, Value> = report
                .columns
                .iter()
                .zip(row)
                .map(|(name, cell)| (name.clone(), Value::String(cell.clone())))
                .collect();
            Value::Object(object)
        })
        .collect();
    let payload = JsonReport {
        title: &report.title,
        columns: &report.columns,
        rows,
    };
    let mut text = serde_json::to_string_pretty(&payload).unwrap_or_default();
    text.push('\n');
    text
}

fn csv_escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn render_csv(report: &Report) -> String {
    let mut out = String::new();
    let header: Vec<String> = report.columns.iter().map(|c| csv_escape(c)).collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in &report.rows {
        let line: Vec<String> = row.iter().map(|c| csv_escape(c)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        let mut report = Report::new("Releases per year", &["year", "count"]);
        report.push_row(vec!["2020".to_string(), "2".to_string()]);
        report.push_row(vec!["2021".to_string(), "1".to_string()]);
        report
    }

    #[test]
    fn csv_renders_header_and_rows() {
        let csv = render_csv(&sample_report());
        assert_eq!(csv, "year,count\n2020,2\n2021,1\n");
    }

    #[test]
    fn csv_escapes_embedded_delimiters() {
        let mut report = Report::new("t", &["genre"]);
        report.push_row(vec!["Action, RPG \"GOTY\"".to_string()]);
        let csv = render_csv(&report);
        assert_eq!(csv, "genre\n\"Action, RPG \"\"GOTY\"\"\"\n");
    }

    #[test]
    fn json_rows_are_keyed_by_column() {
        let text = render_json(&sample_report());
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["title"], "Releases per year");
        assert_eq!(value["rows"][0]["year"], "2020");
        assert_eq!(value["rows"][1]["count"], "1");
    }

    #[test]
    fn emit_writes_to_the_sink() {
        let mut buffer: Vec<u8> = Vec::new();
        emit(&sample_report(), "csv", &mut buffer).unwrap();
        assert!(buffer.starts_with(b"year,count"));
    }
}
