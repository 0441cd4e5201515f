//! Command-line surface
//!
//! The clap parser plus one module per subcommand. Every command builds its
//! request, calls the client, and hands the response to the renderer.

use clap::{Args, Parser, Subcommand};

use crate::config::{CredentialStore, Settings};
use crate::output::{parse_field_list, OutputMode, OutputOptions};
use crate::services::{
    AnswerOptions, ContentsOptions, ContextOptions, ExaClient, SearchOptions, SimilarOptions,
    UsageOptions,
};
use crate::utils::error::AppResult;
use crate::utils::logging::DebugTrace;

pub mod answer;
pub mod auth;
pub mod contents;
pub mod context;
pub mod search;
pub mod similar;
pub mod usage;

#[derive(Debug, Parser)]
#[command(name = "exa")]
#[command(about = "CLI for the Exa AI search API")]
#[command(long_about = "Search the web, find similar pages, get AI-powered answers,\n\
retrieve page contents, and explore code context.\n\n\
Authentication:\n  Set EXA_API_KEY environment variable or run 'exa auth'.")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// JSON output
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Tab-separated output for piping
    #[arg(short = 'p', long, global = true)]
    pub plaintext: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Comma-separated fields for JSON output
    #[arg(long, global = true)]
    pub fields: Option<String>,

    /// jq expression to filter JSON output
    #[arg(long, global = true)]
    pub jq: Option<String>,
}

impl GlobalArgs {
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.json, self.plaintext)
    }

    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            mode: self.output_mode(),
            no_color: self.no_color,
            fields: self
                .fields
                .as_deref()
                .map(parse_field_list)
                .unwrap_or_default(),
            jq: self.jq.clone().filter(|expr| !expr.trim().is_empty()),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search the web using Exa AI
    Search(SearchOptions),

    /// Get page contents by URL
    Contents(ContentsOptions),

    /// Find pages similar to a URL
    Similar(SimilarOptions),

    /// Get an AI-powered answer with citations
    Answer(AnswerOptions),

    /// Get code context from Exa Code
    Context(ContextOptions),

    /// Show API usage and costs
    Usage(UsageOptions),

    /// Store an API key in the local credential file
    Auth,
}

/// Everything a command needs besides its own options
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub settings: Settings,
    pub store: CredentialStore,
    pub output: OutputOptions,
    pub trace: DebugTrace,
}

impl CommandContext {
    pub fn new(settings: Settings, store: CredentialStore, global: &GlobalArgs) -> Self {
        let trace = DebugTrace::new(global.debug, settings.api.body_log_limit);
        Self {
            settings,
            store,
            output: global.output_options(),
            trace,
        }
    }

    /// Authenticated client; fails when no key is configured
    pub fn client(&self) -> AppResult<ExaClient> {
        ExaClient::new(&self.settings, self.trace)
    }
}

/// Dispatch a parsed command
pub async fn execute(command: &Commands, ctx: &CommandContext) -> AppResult<()> {
    match command {
        Commands::Search(options) => search::run(ctx, options).await,
        Commands::Contents(options) => contents::run(ctx, options).await,
        Commands::Similar(options) => similar::run(ctx, options).await,
        Commands::Answer(options) => answer::run(ctx, options).await,
        Commands::Context(options) => context::run(ctx, options).await,
        Commands::Usage(options) => usage::run(ctx, options).await,
        Commands::Auth => auth::run(ctx),
    }
}

/// `Cost: $x | ` prefix for table footers
pub(crate) fn cost_prefix(total: Option<f64>) -> String {
    total
        .map(|total| format!("Cost: ${:.4} | ", total))
        .unwrap_or_default()
}
