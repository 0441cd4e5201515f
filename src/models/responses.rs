//! Exa API response models
//!
//! Responses keep the server's ordering; nothing here re-sorts results.

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

/// Response from `POST /search`, `POST /findSimilar` and `POST /contents`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsResponse {
    /// Request ID (for tracking)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Search type the server actually used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_search_type: Option<String>,
    /// Ordered result list
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoprompt_string: Option<String>,
    /// Billing information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_dollars: Option<CostInfo>,
}

pub type SearchResponse = ResultsResponse;
pub type FindSimilarResponse = ResultsResponse;
pub type ContentsResponse = ResultsResponse;

/// A single search/contents/similarity hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Relevance score
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight_scores: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subpages: Vec<Subpage>,
}

impl SearchResult {
    /// Title or empty string
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// First ten characters of the published date (`YYYY-MM-DD`)
    pub fn published_day(&self) -> &str {
        match self.published_date.as_deref() {
            Some(date) => date.get(..10).unwrap_or(date),
            None => "",
        }
    }
}

/// A crawled subpage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subpage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Billing information
///
/// Only `total` is read by the client; the per-category breakdown is kept
/// verbatim for JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostInfo {
    #[serde(default)]
    pub total: f64,
    #[serde(flatten)]
    pub breakdown: serde_json::Map<String, serde_json::Value>,
}

/// Response from `POST /answer`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Generated answer; a JSON value when an output schema was supplied
    #[serde(default)]
    pub answer: serde_json::Value,
    /// Ordered citation list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_dollars: Option<CostInfo>,
}

impl AnswerResponse {
    /// Answer rendered as text; structured answers are pretty-printed
    pub fn answer_text(&self) -> String {
        match &self.answer {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => serde_json::to_string_pretty(other).unwrap_or_default(),
        }
    }
}

/// One `data:` payload of a streaming answer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerStreamChunk {
    #[serde(default, rename = "type")]
    pub chunk_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub answer: Option<serde_json::Value>,
    /// Present only on the terminal chunk
    #[serde(default)]
    pub citations: Option<Vec<SearchResult>>,
    #[serde(default)]
    pub cost_dollars: Option<CostInfo>,
}

/// Decoded streaming event
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Incremental answer text
    TextDelta(String),
    /// Terminal event with the assembled answer
    Completed(AnswerResponse),
}

impl AnswerStreamChunk {
    /// Events carried by this chunk, in delivery order
    ///
    /// A chunk may carry a final text delta and the citations together. A
    /// chunk carrying neither yields nothing.
    pub fn into_events(self) -> Vec<StreamEvent> {
        let mut events = Vec::with_capacity(2);
        if let Some(text) = self.text.filter(|t| !t.is_empty()) {
            events.push(StreamEvent::TextDelta(text));
        }
        if let Some(citations) = self.citations {
            events.push(StreamEvent::Completed(AnswerResponse {
                request_id: None,
                answer: self.answer.unwrap_or(serde_json::Value::Null),
                citations,
                cost_dollars: self.cost_dollars,
            }));
        }
        events
    }
}

/// Response from `POST /context`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Context text
    #[serde(default, rename = "response")]
    pub context: String,
    /// Raw cost; either an object or a string holding encoded JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_dollars: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    #[serde(skip)]
    parsed_cost: OnceCell<Option<CostInfo>>,
}

impl ContextResponse {
    /// Decoded cost, memoized after the first call
    pub fn cost(&self) -> Option<&CostInfo> {
        self.parsed_cost
            .get_or_init(|| self.cost_dollars.as_ref().and_then(decode_cost))
            .as_ref()
    }
}

/// Structured decode first, then string-containing-JSON
fn decode_cost(raw: &serde_json::Value) -> Option<CostInfo> {
    serde_json::from_value::<CostInfo>(raw.clone()).ok().or_else(|| {
        raw.as_str()
            .and_then(|encoded| serde_json::from_str::<CostInfo>(encoded).ok())
    })
}

/// Response from `GET /team-management/api-keys/{id}/usage`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageResponse {
    #[serde(default)]
    pub usage: Vec<UsageEntry>,
}

/// A single usage data point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    pub date: String,
    #[serde(default)]
    pub request_count: u64,
    #[serde(default)]
    pub credit_usage: f64,
}

/// Summed usage for the table footer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageTotals {
    pub requests: u64,
    pub credits: f64,
}

impl UsageResponse {
    pub fn totals(&self) -> UsageTotals {
        aggregate_usage(&self.usage)
    }
}

/// Sum request counts and credit usage
pub fn aggregate_usage(entries: &[UsageEntry]) -> UsageTotals {
    entries.iter().fold(UsageTotals::default(), |acc, entry| UsageTotals {
        requests: acc.requests + entry.request_count,
        credits: acc.credits + entry.credit_usage,
    })
}

/// API key metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeyInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Response from `GET /team-management/api-keys`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeysResponse {
    #[serde(default)]
    pub api_keys: Vec<ApiKeyInfo>,
}
