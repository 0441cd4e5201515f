//! `exa contents`

use super::{cost_prefix, CommandContext};
use crate::models::ContentsResponse;
use crate::output::{render, truncate_str, TableData};
use crate::services::ContentsOptions;
use crate::utils::error::AppResult;
use std::io::Write;

/// Title column width for the contents table
pub const TITLE_WIDTH: usize = 60;

/// Page text printed below the table is cut to this many characters
pub const PAGE_TEXT_LIMIT: usize = 2000;

pub async fn run(ctx: &CommandContext, options: &ContentsOptions) -> AppResult<()> {
    let request = options.build()?;
    let response = ctx.client()?.get_contents(&request).await?;

    render(&pages_table(&response), &response, &ctx.output)?;
    if ctx.output.is_json() {
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_page_details(&mut out, &response)?;
    out.flush()?;
    Ok(())
}

pub fn pages_table(response: &ContentsResponse) -> TableData {
    let mut table = TableData::new(["TITLE", "URL"]);
    for result in &response.results {
        table.push_row(vec![
            truncate_str(result.title(), TITLE_WIDTH),
            result.url.clone(),
        ]);
    }

    let total = response.cost_dollars.as_ref().map(|c| c.total);
    table.with_footer(format!("{}{} pages", cost_prefix(total), response.results.len()))
}

/// Text, summary and highlights of each page
pub fn write_page_details<W: Write>(w: &mut W, response: &ContentsResponse) -> std::io::Result<()> {
    for result in &response.results {
        if let Some(text) = result.text.as_deref().filter(|t| !t.is_empty()) {
            writeln!(w, "\n--- {} ---\n{}", result.url, truncate_str(text, PAGE_TEXT_LIMIT))?;
        }
        if let Some(summary) = result.summary.as_deref().filter(|s| !s.is_empty()) {
            writeln!(w, "\nSummary: {}", summary)?;
        }
        if !result.highlights.is_empty() {
            writeln!(w, "\nHighlights:")?;
            for highlight in &result.highlights {
                writeln!(w, "  • {}", highlight)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> ContentsResponse {
        serde_json::from_value(json!({
            "results": [{
                "title": "Example",
                "url": "https://example.com",
                "id": "https://example.com",
                "text": "x".repeat(2500),
                "summary": "Short summary",
                "highlights": ["first", "second"]
            }],
            "costDollars": {"total": 0.001}
        }))
        .unwrap()
    }

    #[test]
    fn test_pages_table() {
        let table = pages_table(&response());
        assert_eq!(table.rows, vec![vec!["Example", "https://example.com"]]);
        assert_eq!(table.footer.as_deref(), Some("Cost: $0.0010 | 1 pages"));
    }

    #[test]
    fn test_page_details() {
        let mut buf = Vec::new();
        write_page_details(&mut buf, &response()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("\n--- https://example.com ---\n"));
        assert!(text.contains(&format!("{}...", "x".repeat(PAGE_TEXT_LIMIT - 3))));
        assert!(!text.contains(&"x".repeat(PAGE_TEXT_LIMIT)));
        assert!(text.contains("\nSummary: Short summary\n"));
        assert!(text.contains("Highlights:\n  • first\n  • second\n"));
    }
}
