//! Table, plaintext and JSON rendering

use super::{reshape_each, OutputMode, OutputOptions};
use crate::utils::error::{classify, AppResult};
use console::{measure_text_width, style};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Gap between table columns
pub const COLUMN_GAP: &str = "   ";

/// Rows and headers for table rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: Option<String>,
}

impl TableData {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    fn column_widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        (0..columns)
            .map(|i| {
                std::iter::once(&self.headers)
                    .chain(self.rows.iter())
                    .filter_map(|row| row.get(i))
                    .map(|cell| measure_text_width(cell))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

/// Cut `s` to at most `max` characters, ending in `...` when cut
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", head)
}

/// Whether table output should carry ANSI styling
pub fn should_color(options: &OutputOptions) -> bool {
    if options.no_color {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    io::stdout().is_terminal()
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(measure_text_width(cell));
    format!("{}{}", cell, " ".repeat(fill))
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let line: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| pad(cells.get(i).map(String::as_str).unwrap_or(""), *width))
        .collect();
    line.join(COLUMN_GAP).trim_end().to_string()
}

/// Padded columns, optional bold cyan headers and a dim footer
pub fn write_table<W: Write>(w: &mut W, table: &TableData, color: bool) -> io::Result<()> {
    let widths = table.column_widths();

    if !table.headers.is_empty() {
        let header = format_row(&table.headers, &widths);
        if color {
            writeln!(w, "{}", style(header).cyan().bold().force_styling(true))?;
        } else {
            writeln!(w, "{}", header)?;
        }
    }

    for row in &table.rows {
        writeln!(w, "{}", format_row(row, &widths))?;
    }

    if let Some(footer) = table.footer.as_deref().filter(|f| !f.is_empty()) {
        if color {
            writeln!(w, "\n{}", style(footer).dim().force_styling(true))?;
        } else {
            writeln!(w, "\n{}", footer)?;
        }
    }

    Ok(())
}

/// Tab-separated rows; the footer is left out
pub fn write_plaintext<W: Write>(w: &mut W, table: &TableData) -> io::Result<()> {
    if !table.headers.is_empty() {
        writeln!(w, "{}", table.headers.join("\t"))?;
    }
    for row in &table.rows {
        writeln!(w, "{}", row.join("\t"))?;
    }
    Ok(())
}

/// Reshape `data` and print each resulting value pretty-printed
pub fn write_json<W: Write, T: Serialize>(w: &mut W, data: &T, options: &OutputOptions) -> AppResult<()> {
    let document = serde_json::to_value(data)?;
    reshape_each(document, &options.fields, options.jq.as_deref(), |value| {
        writeln!(w, "{}", serde_json::to_string_pretty(&value)?)?;
        Ok(())
    })
}

/// Render a response in the selected mode
///
/// `table` is only consulted in table and plaintext modes.
pub fn render<T: Serialize>(table: &TableData, data: &T, options: &OutputOptions) -> AppResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match options.mode {
        OutputMode::Json => write_json(&mut out, data, options)?,
        OutputMode::Plaintext => write_plaintext(&mut out, table)?,
        OutputMode::Table => write_table(&mut out, table, should_color(options))?,
    }
    out.flush()?;
    Ok(())
}

/// Render raw data as JSON regardless of mode
pub fn render_json<T: Serialize>(data: &T, options: &OutputOptions) -> AppResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json(&mut out, data, options)?;
    out.flush()?;
    Ok(())
}

/// Error line for a failed invocation
pub fn format_error(err: &anyhow::Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let report = classify(err);
            serde_json::to_string(&report).unwrap_or_else(|_| {
                format!(r#"{{"code":"{}","recoverable":false}}"#, report.code.as_str())
            })
        }
        _ => format!("Error: {:#}", err),
    }
}

/// Report a top-level error on stderr
pub fn render_error(err: &anyhow::Error, mode: OutputMode) {
    eprintln!("{}", format_error(err, mode));
}

/// Report a completed action
pub fn render_success(message: &str, options: &OutputOptions) {
    match options.mode {
        OutputMode::Json => {
            let status = serde_json::json!({"status": "success", "message": message});
            eprintln!("{}", status);
        }
        _ if should_color(options) => {
            println!("{} {}", style("OK:").green().force_styling(true), message)
        }
        _ => println!("OK: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableData {
        let mut table = TableData::new(["TITLE", "URL"]).with_footer("2 results");
        table.push_row(vec!["A".to_string(), "https://a.example".to_string()]);
        table.push_row(vec!["Longer title".to_string(), "u2".to_string()]);
        table
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 50), "short");
        let long = "x".repeat(60);
        let cut = truncate_str(&long, 50);
        assert_eq!(cut.chars().count(), 50);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_str("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_write_table() {
        let mut buf = Vec::new();
        write_table(&mut buf, &sample(), false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "TITLE          URL\nA              https://a.example\nLonger title   u2\n\n2 results\n"
        );
    }

    #[test]
    fn test_write_table_colored() {
        let mut buf = Vec::new();
        write_table(&mut buf, &sample(), true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("\u{1b}["));
        assert!(text.contains("Longer title   u2"));
    }

    #[test]
    fn test_write_plaintext() {
        let mut buf = Vec::new();
        write_plaintext(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "TITLE\tURL\nA\thttps://a.example\nLonger title\tu2\n");
    }

    #[test]
    fn test_no_color_flag() {
        let options = OutputOptions {
            no_color: true,
            ..Default::default()
        };
        assert!(!should_color(&options));
    }
}
