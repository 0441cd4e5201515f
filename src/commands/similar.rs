//! `exa similar`

use super::search::TITLE_WIDTH;
use super::{cost_prefix, CommandContext};
use crate::models::FindSimilarResponse;
use crate::output::{render, truncate_str, TableData};
use crate::services::SimilarOptions;
use crate::utils::error::AppResult;

pub async fn run(ctx: &CommandContext, options: &SimilarOptions) -> AppResult<()> {
    let request = options.build()?;
    let response = ctx.client()?.find_similar(&request).await?;

    let table = similar_table(&response);
    render(&table, &response, &ctx.output)
}

pub fn similar_table(response: &FindSimilarResponse) -> TableData {
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
        "{}{} similar pages",
        cost_prefix(total),
        response.results.len()
    ))
}
