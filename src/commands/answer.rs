//! `exa answer`
//!
//! The one-shot call prints the answer in one piece. With `--stream` text is
//! printed as it arrives; JSON mode always uses the one-shot call.

use super::CommandContext;
use crate::models::{AnswerRequest, AnswerResponse};
use crate::output::render::should_color;
use crate::output::render_json;
use crate::services::{AnswerOptions, ExaClient};
use crate::utils::error::{AppError, AppResult};
use console::style;
use std::io::{self, Write};
use tracing::warn;

pub async fn run(ctx: &CommandContext, options: &AnswerOptions) -> AppResult<()> {
    let request = options.build()?;
    let client = ctx.client()?;
    let color = should_color(&ctx.output);

    if options.stream && !ctx.output.is_json() {
        return stream_answer(&client, &request, color).await;
    }

    let response = client.answer(&request).await?;
    if ctx.output.is_json() {
        return render_json(&response, &ctx.output);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", response.answer_text())?;
    write_sources(&mut out, &response, color)?;
    out.flush()?;
    Ok(())
}

async fn stream_answer(client: &ExaClient, request: &AnswerRequest, color: bool) -> AppResult<()> {
    let mut final_answer: Option<AnswerResponse> = None;

    let interrupted = {
        let streamed = client.answer_stream(
            request,
            |text| {
                print!("{}", text);
                let _ = io::stdout().flush();
            },
            |answer| final_answer = Some(answer),
        );

        tokio::select! {
            result = streamed => {
                result?;
                false
            }
            _ = tokio::signal::ctrl_c() => true,
        }
    };

    println!();
    if interrupted {
        warn!("Answer stream interrupted");
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::Interrupted,
            "answer stream interrupted",
        )));
    }

    if let Some(answer) = final_answer {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_sources(&mut out, &answer, color)?;
        out.flush()?;
    }
    Ok(())
}

/// Numbered citation list followed by the cost line
pub fn write_sources<W: Write>(w: &mut W, answer: &AnswerResponse, color: bool) -> io::Result<()> {
    if !answer.citations.is_empty() {
        if color {
            writeln!(w, "\n{}", style("Sources:").cyan().force_styling(true))?;
        } else {
            writeln!(w, "\nSources:")?;
        }
        for (i, citation) in answer.citations.iter().enumerate() {
            writeln!(w, "  {}. {} - {}", i + 1, citation.title(), citation.url)?;
        }
    }

    if let Some(cost) = &answer.cost_dollars {
        writeln!(w, "\nCost: ${:.4}", cost.total)?;
    }
    Ok(())
}
