//! `exa search`

use super::{cost_prefix, CommandContext};
use crate::models::SearchResponse;
use crate::output::{render, truncate_str, TableData};
use crate::services::SearchOptions;
use crate::utils::error::AppResult;
use tracing::info;

/// Title column width for result tables
pub const TITLE_WIDTH: usize = 50;

pub async fn run(ctx: &CommandContext, options: &SearchOptions) -> AppResult<()> {
    let request = options.build()?;
    let response = ctx.client()?.search(&request).await?;
    info!("Search returned {} results", response.results.len());

    let table = results_table(&response, &options.search_type);
    render(&table, &response, &ctx.output)
}

/// TITLE/URL/DATE/SCORE rows with a cost and type footer
pub fn results_table(response: &SearchResponse, search_type: &str) -> TableData {
    let mut table = TableData::new(["TITLE", "URL", "DATE", "SCORE"]);
    for result in &response.results {
        table.push_row(vec![
            truncate_str(result.title(), TITLE_WIDTH),
            result.url.clone(),
            result.published_day().to_string(),
            result.score.map(|s| format!("{:.2}", s)).unwrap_or_default(),
        ]);
    }

    let total = response.cost_dollars.as_ref().map(|c| c.total);
    table.with_footer(format!(
        "{}{} results | Type: {}",
        cost_prefix(total),
        response.results.len(),
        search_type
    ))
}
