//! Exa API request models
//!
//! Wire-format request bodies. Every optional field is skipped when unset so the
//! server can tell "not specified" apart from an explicit empty value.

use serde::{Serialize, Serializer};

/// Request body for `POST /search`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Search query
    pub query: String,
    /// Search type (omitted for the server default `auto`)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub search_type: Option<String>,
    /// Maximum number of results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_results: Option<u32>,
    /// Result category (company, news, research_paper, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_crawl_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_crawl_date: Option<String>,
    /// Text that must appear in results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_text: Option<String>,
    /// Text that must not appear in results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_text: Option<String>,
    /// Content safety moderation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation: Option<bool>,
    /// Per-result content options (absent means service defaults)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<ContentOptions>,
}

/// Content options shared by search, find-similar and contents retrieval
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentOptions {
    /// Full page text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextOptions>,
    /// LLM-selected highlights
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<HighlightsOptions>,
    /// LLM summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryOptions>,
    /// Freshness policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livecrawl: Option<Livecrawl>,
    /// Subpages to crawl per result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subpages: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subpage_target: Vec<String>,
}

impl ContentOptions {
    /// True when no sub-option was requested
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_characters: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_html_tags: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_sentences: Option<u32>,
    #[serde(rename = "highlightsPerUrl", skip_serializing_if = "Option::is_none")]
    pub highlights_per_url: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Freshness policy sent as `livecrawl`
///
/// A cached copy is used when the field is absent altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Livecrawl {
    /// Always re-fetch the page live
    Always,
    /// Re-fetch live only when the cached copy is stale
    Fallback,
}

/// Request body for `POST /contents`
///
/// Content options sit at the top level of this request rather than under a
/// nested `contents` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentsRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
    #[serde(flatten)]
    pub options: ContentOptions,
}

/// Request body for `POST /findSimilar`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindSimilarRequest {
    /// Source URL
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_results: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_published_date: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclude_source_domain: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<ContentOptions>,
}

/// Request body for `POST /answer`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub query: String,
    /// Include full text in citations
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub text: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// JSON schema for structured answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Value>,
    /// Set only by the streaming call
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

/// Request body for `POST /context`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextRequest {
    pub query: String,
    pub tokens_num: TokenLimit,
}

/// Token budget for the context endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimit {
    /// Fixed number of tokens
    Count(u32),
    /// Let the server decide
    Dynamic,
}

impl TokenLimit {
    /// Zero means "not set" and maps to [`TokenLimit::Dynamic`]
    pub fn from_option(tokens: u32) -> Self {
        if tokens > 0 {
            TokenLimit::Count(tokens)
        } else {
            TokenLimit::Dynamic
        }
    }
}

impl Serialize for TokenLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenLimit::Count(n) => serializer.serialize_u32(*n),
            TokenLimit::Dynamic => serializer.serialize_str("dynamic"),
        }
    }
}
