//! `exa auth`

use super::CommandContext;
use crate::config::KeySource;
use crate::output::render_success;
use crate::utils::error::{helpers::validation_error, AppResult};
use std::io::{self, BufRead, IsTerminal, Write};

pub fn run(ctx: &CommandContext) -> AppResult<()> {
    match &ctx.settings.api.key_source {
        Some(KeySource::Environment) => {
            println!("Currently authenticated via EXA_API_KEY environment variable.\n")
        }
        Some(KeySource::File(path)) => {
            println!("Currently authenticated via config file: {}\n", path.display())
        }
        None => {}
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        print!("Enter your Exa API key: ");
        io::stdout().flush()?;
    }
    let key = read_key(&mut stdin.lock())?;

    ctx.store.save(&key)?;
    render_success(
        &format!("API key saved to {}", ctx.store.path().display()),
        &ctx.output,
    );
    Ok(())
}

/// First line of `reader`, trimmed; empty input is refused
pub fn read_key<R: BufRead>(reader: &mut R) -> AppResult<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    let key = line.trim();
    if key.is_empty() {
        return Err(validation_error("API key cannot be empty"));
    }
    Ok(key.to_string())
}
