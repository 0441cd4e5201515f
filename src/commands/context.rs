//! `exa context`

use super::CommandContext;
use crate::output::render_json;
use crate::services::ContextOptions;
use crate::utils::error::AppResult;

pub async fn run(ctx: &CommandContext, options: &ContextOptions) -> AppResult<()> {
    let request = options.build()?;
    let response = ctx.client()?.get_context(&request).await?;

    if ctx.output.is_json() {
        return render_json(&response, &ctx.output);
    }

    println!("{}", response.context);
    if let Some(cost) = response.cost() {
        eprintln!("\nCost: ${:.4}", cost.total);
    }
    Ok(())
}
