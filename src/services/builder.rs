//! Request builder
//!
//! Turns flat command options into the nested wire requests. A field reaches
//! the wire only when the user asked for a non-default value.

use crate::models::*;
use crate::utils::error::{helpers::validation_error, AppResult, ErrorContext};
use chrono::{Duration, NaiveDate};
use clap::Args;
use std::path::PathBuf;

/// Default cap on result text
pub const DEFAULT_TEXT_MAX_CHARS: u32 = 10_000;

/// Freshness policy for a maximum cache age in hours
///
/// Negative uses the cache (field omitted), zero always re-fetches, positive
/// re-fetches only stale copies.
pub fn livecrawl_policy(max_age_hours: i64) -> Option<Livecrawl> {
    match max_age_hours {
        h if h < 0 => None,
        0 => Some(Livecrawl::Always),
        _ => Some(Livecrawl::Fallback),
    }
}

/// Expand `YYYY-MM-DD` to midnight UTC
pub fn expand_date(date: &str) -> AppResult<String> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .validation_context(&format!("invalid date '{}', expected YYYY-MM-DD", date))?;
    Ok(format!("{}T00:00:00.000Z", day.format("%Y-%m-%d")))
}

fn optional_date(date: &Option<String>) -> AppResult<Option<String>> {
    date.as_deref()
        .filter(|d| !d.is_empty())
        .map(expand_date)
        .transpose()
}

fn optional_text(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

fn positive(n: u32) -> Option<u32> {
    (n > 0).then_some(n)
}

fn split_domains(domains: &[String]) -> Vec<String> {
    domains
        .iter()
        .flat_map(|d| d.split(','))
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

/// Content sub-options shared by search-like commands
#[derive(Debug, Clone, Args)]
pub struct ContentFlags {
    /// Include full text in results
    #[arg(long)]
    pub text: bool,

    /// Max chars for text content
    #[arg(long, default_value_t = DEFAULT_TEXT_MAX_CHARS)]
    pub text_max_chars: u32,

    /// Include LLM-selected highlights
    #[arg(long)]
    pub highlights: bool,

    /// Include LLM summary
    #[arg(long)]
    pub summary: bool,

    /// Max cache age (-1=cache, 0=always livecrawl)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub max_age_hours: i64,

    /// Number of subpages to crawl per result
    #[arg(long, default_value_t = 0)]
    pub subpages: u32,
}

impl Default for ContentFlags {
    fn default() -> Self {
        Self {
            text: false,
            text_max_chars: DEFAULT_TEXT_MAX_CHARS,
            highlights: false,
            summary: false,
            max_age_hours: -1,
            subpages: 0,
        }
    }
}

impl ContentFlags {
    /// Nested content options, or `None` when nothing was requested
    pub fn to_options(&self) -> Option<ContentOptions> {
        let options = ContentOptions {
            text: self.text.then(|| TextOptions {
                max_characters: positive(self.text_max_chars),
                ..Default::default()
            }),
            highlights: self.highlights.then(HighlightsOptions::default),
            summary: self.summary.then(SummaryOptions::default),
            livecrawl: livecrawl_policy(self.max_age_hours),
            subpages: positive(self.subpages),
            subpage_target: Vec::new(),
        };
        (!options.is_empty()).then_some(options)
    }
}

/// Options of the `search` command
#[derive(Debug, Clone, Default, Args)]
pub struct SearchOptions {
    /// Search query
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Max results (max 100)
    #[arg(short = 'n', long, default_value_t = 25)]
    pub num_results: u32,

    /// Search type: auto|fast|deep|neural
    #[arg(short = 't', long = "type", default_value = "auto")]
    pub search_type: String,

    /// Category: company|news|research_paper|tweet|github|etc
    #[arg(long)]
    pub category: Option<String>,

    /// Only search these domains
    #[arg(long, value_delimiter = ',')]
    pub include_domains: Vec<String>,

    /// Exclude these domains
    #[arg(long, value_delimiter = ',')]
    pub exclude_domains: Vec<String>,

    /// Published after (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Published before (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Text that must appear in results
    #[arg(long)]
    pub include_text: Option<String>,

    /// Text that must NOT appear in results
    #[arg(long)]
    pub exclude_text: Option<String>,

    /// Disable all content retrieval
    #[arg(long)]
    pub no_contents: bool,

    /// Enable content safety moderation
    #[arg(long)]
    pub moderation: bool,

    #[command(flatten)]
    pub contents: ContentFlags,
}

impl SearchOptions {
    pub fn build(&self) -> AppResult<SearchRequest> {
        let query = self.query.join(" ");
        if query.trim().is_empty() {
            return Err(validation_error("search query cannot be empty"));
        }

        Ok(SearchRequest {
            query,
            search_type: Some(self.search_type.clone())
                .filter(|t| !t.is_empty() && t != "auto"),
            num_results: positive(self.num_results),
            category: optional_text(&self.category),
            include_domains: split_domains(&self.include_domains),
            exclude_domains: split_domains(&self.exclude_domains),
            start_published_date: optional_date(&self.start_date)?,
            end_published_date: optional_date(&self.end_date)?,
            start_crawl_date: None,
            end_crawl_date: None,
            include_text: optional_text(&self.include_text),
            exclude_text: optional_text(&self.exclude_text),
            moderation: self.moderation.then_some(true),
            contents: if self.no_contents {
                None
            } else {
                self.contents.to_options()
            },
        })
    }
}

/// Options of the `contents` command
#[derive(Debug, Clone, Default, Args)]
pub struct ContentsOptions {
    /// Page URLs
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Do not include full text
    #[arg(long)]
    pub no_text: bool,

    /// Max chars for text
    #[arg(long, default_value_t = DEFAULT_TEXT_MAX_CHARS)]
    pub text_max_chars: u32,

    /// Include highlights
    #[arg(long)]
    pub highlights: bool,

    /// Include summary
    #[arg(long)]
    pub summary: bool,

    /// Content freshness (-1=cache, 0=always livecrawl)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub max_age_hours: i64,

    /// Subpages to crawl
    #[arg(long, default_value_t = 0)]
    pub subpages: u32,
}

impl ContentsOptions {
    /// Text is on unless explicitly disabled; the other options sit at the top
    /// level of the request.
    pub fn build(&self) -> AppResult<ContentsRequest> {
        let urls: Vec<String> = self
            .urls
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        if urls.is_empty() {
            return Err(validation_error("at least one URL is required"));
        }

        Ok(ContentsRequest {
            ids: Vec::new(),
            urls,
            options: ContentOptions {
                text: (!self.no_text).then(|| TextOptions {
                    max_characters: positive(self.text_max_chars),
                    ..Default::default()
                }),
                highlights: self.highlights.then(HighlightsOptions::default),
                summary: self.summary.then(SummaryOptions::default),
                livecrawl: livecrawl_policy(self.max_age_hours),
                subpages: positive(self.subpages),
                subpage_target: Vec::new(),
            },
        })
    }
}

/// Options of the `similar` command
#[derive(Debug, Clone, Default, Args)]
pub struct SimilarOptions {
    /// Source URL
    pub url: String,

    /// Max results
    #[arg(short = 'n', long, default_value_t = 10)]
    pub num_results: u32,

    /// Exclude the source domain from results
    #[arg(long = "exclude-source")]
    pub exclude_source: bool,

    /// Only include these domains
    #[arg(long, value_delimiter = ',')]
    pub include_domains: Vec<String>,

    /// Exclude these domains
    #[arg(long, value_delimiter = ',')]
    pub exclude_domains: Vec<String>,

    /// Published after (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Published before (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Include full text
    #[arg(long)]
    pub text: bool,

    /// Include highlights
    #[arg(long)]
    pub highlights: bool,

    /// Category filter
    #[arg(long)]
    pub category: Option<String>,
}

impl SimilarOptions {
    pub fn build(&self) -> AppResult<FindSimilarRequest> {
        if self.url.trim().is_empty() {
            return Err(validation_error("a source URL is required"));
        }

        let contents = ContentFlags {
            text: self.text,
            highlights: self.highlights,
            ..Default::default()
        }
        .to_options();

        Ok(FindSimilarRequest {
            url: self.url.trim().to_string(),
            num_results: positive(self.num_results),
            include_domains: split_domains(&self.include_domains),
            exclude_domains: split_domains(&self.exclude_domains),
            start_published_date: optional_date(&self.start_date)?,
            end_published_date: optional_date(&self.end_date)?,
            exclude_source_domain: self.exclude_source,
            category: optional_text(&self.category),
            contents,
        })
    }
}

/// Options of the `answer` command
#[derive(Debug, Clone, Default, Args)]
pub struct AnswerOptions {
    /// Question to answer
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Stream the answer
    #[arg(long)]
    pub stream: bool,

    /// Include full text in citations
    #[arg(long)]
    pub text: bool,

    /// JSON schema file for structured output
    #[arg(long)]
    pub output_schema: Option<PathBuf>,
}

impl AnswerOptions {
    /// Build the request; the schema file is read and parsed here
    pub fn build(&self) -> AppResult<AnswerRequest> {
        let query = self.query.join(" ");
        if query.trim().is_empty() {
            return Err(validation_error("question cannot be empty"));
        }

        let output_schema = match &self.output_schema {
            Some(path) => {
                let data = std::fs::read_to_string(path).validation_context("read schema file")?;
                let schema: serde_json::Value =
                    serde_json::from_str(&data).validation_context("parse schema")?;
                Some(schema)
            }
            None => None,
        };

        Ok(AnswerRequest {
            query,
            text: self.text,
            model: None,
            output_schema,
            stream: false,
        })
    }
}

/// Options of the `context` command
#[derive(Debug, Clone, Default, Args)]
pub struct ContextOptions {
    /// Programming query
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Token limit for response (0=dynamic)
    #[arg(long, default_value_t = 0)]
    pub tokens: u32,
}

impl ContextOptions {
    pub fn build(&self) -> AppResult<ContextRequest> {
        let query = self.query.join(" ");
        if query.trim().is_empty() {
            return Err(validation_error("query cannot be empty"));
        }
        Ok(ContextRequest {
            query,
            tokens_num: TokenLimit::from_option(self.tokens),
        })
    }
}

/// Options of the `usage` command
#[derive(Debug, Clone, Default, Args)]
pub struct UsageOptions {
    /// Start of period (default: 30 days ago)
    #[arg(long)]
    pub start_date: Option<String>,

    /// End of period (default: today)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Specific API key ID
    #[arg(long)]
    pub key_id: Option<String>,
}

impl UsageOptions {
    /// Reporting window as `(start, end)` dates; defaults to the 30 days
    /// ending `today`
    pub fn window(&self, today: NaiveDate) -> AppResult<(String, String)> {
        let end = match self.end_date.as_deref().filter(|d| !d.is_empty()) {
            Some(d) => parse_day(d)?,
            None => today,
        };
        let start = match self.start_date.as_deref().filter(|d| !d.is_empty()) {
            Some(d) => parse_day(d)?,
            None => today - Duration::days(30),
        };
        Ok((
            start.format("%Y-%m-%d").to_string(),
            end.format("%Y-%m-%d").to_string(),
        ))
    }
}

fn parse_day(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .validation_context(&format!("invalid date '{}', expected YYYY-MM-DD", date))
}
