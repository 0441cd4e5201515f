//! HTTP client service
//!
//! Encapsulates HTTP communication with the Exa API

use super::stream::{LineStream, StreamDecoder, StreamSummary};
use crate::config::Settings;
use crate::models::*;
use crate::utils::error::{helpers, AppError, AppResult};
use crate::utils::logging::{truncate_ellipsis, DebugTrace};
use anyhow::Context;
use async_trait::async_trait;
use futures::stream::BoxStream;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("exa-cli/", env!("CARGO_PKG_VERSION"));

/// Error bodies are cut to this many characters
pub const ERROR_BODY_LIMIT: usize = 500;

/// Stream of decoded lines
pub type LineBoxStream = BoxStream<'static, AppResult<String>>;

/// Authenticated JSON transport
///
/// Implementations send pre-serialized bodies and hand back the raw response
/// text of a 2xx reply. Any other status must surface as [`AppError::Api`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, path: &str, body: Option<String>) -> AppResult<String>;

    /// Open an event stream; the caller owns the returned lines
    async fn send_stream(&self, path: &str, body: String) -> AppResult<LineBoxStream>;
}

/// Transport over reqwest
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    stream_client: Client,
    base_url: String,
    api_key: String,
    trace: DebugTrace,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration, trace: DebugTrace) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        // answers can stream for longer than any fixed deadline
        let stream_client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create streaming HTTP client")?;

        Ok(Self {
            client,
            stream_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            trace,
        })
    }

    /// Build from loaded settings
    pub fn from_settings(settings: &Settings, trace: DebugTrace) -> AppResult<Self> {
        let api_key = settings.require_api_key()?;
        Self::new(
            &settings.api.base_url,
            api_key,
            Duration::from_secs(settings.api.timeout),
            trace,
        )
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, client: &Client, method: Method, url: &str) -> RequestBuilder {
        client
            .request(method, url)
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
    }
}

/// Turn a non-2xx status into an API error
///
/// Nothing is logged here; the caller renders the error once.
fn check_status(status: StatusCode, body: &str) -> AppResult<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(status_error(status, body))
}

fn status_error(status: StatusCode, body: &str) -> AppError {
    debug!("Exa API request failed: {}", status);
    helpers::api_error(status.as_u16(), truncate_ellipsis(body, ERROR_BODY_LIMIT))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, path: &str, body: Option<String>) -> AppResult<String> {
        let url = self.url(path);
        self.trace.request(method.as_str(), &url, body.as_deref());

        let mut request = self.authorized(&self.client, method, &url);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        self.trace.response(status.as_u16(), &text);

        check_status(status, &text)?;
        Ok(text)
    }

    async fn send_stream(&self, path: &str, body: String) -> AppResult<LineBoxStream> {
        let url = self.url(path);
        self.trace.request("POST", &url, Some(&body));

        let response = self
            .authorized(&self.stream_client, Method::POST, &url)
            .header("Accept", "text/event-stream")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            self.trace.response(status.as_u16(), &text);
            return Err(status_error(status, &text));
        }
        self.trace.note(&format!("Stream opened with status {}", status));

        Ok(Box::pin(LineStream::new(response.bytes_stream())))
    }
}

/// Exa API client
///
/// One method per endpoint. Requests are serialized here and responses are
/// decoded into their typed form, so malformed JSON on either side surfaces
/// as a serialization error.
#[derive(Clone)]
pub struct ExaClient {
    transport: Arc<dyn Transport>,
    trace: DebugTrace,
}

impl std::fmt::Debug for ExaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExaClient").field("trace", &self.trace).finish()
    }
}

impl ExaClient {
    /// Create a client talking HTTP to the configured endpoint
    pub fn new(settings: &Settings, trace: DebugTrace) -> AppResult<Self> {
        let transport = HttpTransport::from_settings(settings, trace)?;
        Ok(Self::with_transport(Arc::new(transport), trace))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, trace: DebugTrace) -> Self {
        Self { transport, trace }
    }

    async fn call<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> AppResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let body = body.map(serde_json::to_string).transpose()?;
        let text = self.transport.send(method, path, body).await?;
        let response = serde_json::from_str(&text)?;
        debug!("Exa request to {} completed successfully", path);
        Ok(response)
    }

    pub async fn search(&self, request: &SearchRequest) -> AppResult<SearchResponse> {
        self.call(Method::POST, "/search", Some(request)).await
    }

    pub async fn get_contents(&self, request: &ContentsRequest) -> AppResult<ContentsResponse> {
        self.call(Method::POST, "/contents", Some(request)).await
    }

    pub async fn find_similar(&self, request: &FindSimilarRequest) -> AppResult<FindSimilarResponse> {
        self.call(Method::POST, "/findSimilar", Some(request)).await
    }

    /// One-shot answer; `stream` is forced off
    pub async fn answer(&self, request: &AnswerRequest) -> AppResult<AnswerResponse> {
        let request = AnswerRequest {
            stream: false,
            ..request.clone()
        };
        self.call(Method::POST, "/answer", Some(&request)).await
    }

    /// Streamed answer
    ///
    /// Text fragments reach `on_text` as they arrive and the full answer with
    /// citations reaches `on_done` at most once. Dropping the future closes
    /// the connection and no further callbacks run.
    pub async fn answer_stream<T, D>(
        &self,
        request: &AnswerRequest,
        on_text: T,
        on_done: D,
    ) -> AppResult<StreamSummary>
    where
        T: FnMut(&str),
        D: FnMut(AnswerResponse),
    {
        let request = AnswerRequest {
            stream: true,
            ..request.clone()
        };
        let body = serde_json::to_string(&request)?;
        let lines = self.transport.send_stream("/answer", body).await?;

        let summary = StreamDecoder::new(self.trace).run(lines, on_text, on_done).await?;
        debug!(
            "Answer stream finished: {} deltas, {} skipped, completed={}",
            summary.text_deltas, summary.skipped, summary.completed
        );
        Ok(summary)
    }

    pub async fn get_context(&self, request: &ContextRequest) -> AppResult<ContextResponse> {
        self.call(Method::POST, "/context", Some(request)).await
    }

    pub async fn list_api_keys(&self) -> AppResult<ApiKeysResponse> {
        self.call::<(), _>(Method::GET, "/team-management/api-keys", None).await
    }

    /// Daily usage for one key over an inclusive date window
    pub async fn get_usage(&self, key_id: &str, start: &str, end: &str) -> AppResult<UsageResponse> {
        if key_id.is_empty() {
            return Err(helpers::validation_error("API key id cannot be empty"));
        }
        let path = format!(
            "/team-management/api-keys/{}/usage?startDate={}&endDate={}",
            key_id, start, end
        );
        self.call::<(), _>(Method::GET, &path, None).await
    }

    /// Resolve the key to report usage for
    ///
    /// An explicit id wins; otherwise the first key on the account is used.
    pub async fn resolve_key_id(&self, key_id: Option<&str>) -> AppResult<String> {
        if let Some(id) = key_id.filter(|id| !id.is_empty()) {
            return Ok(id.to_string());
        }
        let keys = self.list_api_keys().await?;
        keys.api_keys
            .into_iter()
            .next()
            .map(|key| key.id)
            .ok_or_else(|| AppError::Validation("No API keys found on this account".to_string()))
    }
}
