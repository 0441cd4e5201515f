//! `exa usage`

use super::CommandContext;
use crate::models::UsageResponse;
use crate::output::{render, TableData};
use crate::services::UsageOptions;
use crate::utils::error::AppResult;
use chrono::Local;
use tracing::debug;

pub async fn run(ctx: &CommandContext, options: &UsageOptions) -> AppResult<()> {
    let (start, end) = options.window(Local::now().date_naive())?;
    let client = ctx.client()?;

    let key_id = client.resolve_key_id(options.key_id.as_deref()).await?;
    debug!("Using API key: {}", key_id);

    let response = client.get_usage(&key_id, &start, &end).await?;
    render(&usage_table(&response, &start, &end), &response, &ctx.output)
}

/// DATE/REQUESTS/CREDITS rows with the period totals as footer
pub fn usage_table(response: &UsageResponse, start: &str, end: &str) -> TableData {
    let mut table = TableData::new(["DATE", "REQUESTS", "CREDITS"]);
    for entry in &response.usage {
        table.push_row(vec![
            entry.date.clone(),
            entry.request_count.to_string(),
            format!("{:.4}", entry.credit_usage),
        ]);
    }

    let totals = response.totals();
    table.with_footer(format!(
        "Total: {} requests, {:.4} credits | {} to {}",
        totals.requests, totals.credits, start, end
    ))
}
