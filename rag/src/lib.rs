//! Client for the RAG chat proxy.
//!
//! Every call is pass-through: the backend's status code and body come back
//! unchanged in a [`ProxyResponse`]. Only transport failures (connect, timeout,
//! body read) are errors. Chat additionally pulls the reply text out of a
//! successful response so it can be shown or streamed on its own.

use std::fmt;
use std::time::Duration;

use denim_config::RagConfig;
use futures_util::Stream;
use futures_util::stream;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Keys checked, in order, for the reply text of a chat response.
const REPLY_KEYS: [&str; 5] = ["answer", "reply", "response", "message", "content"];

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

#[derive(Debug, Error)]
pub enum RagError {
    #[error("RAG base URL is not configured (set [rag] base_url)")]
    MissingBaseUrl,
    #[error("invalid RAG base URL `{0}`")]
    InvalidBaseUrl(String),
    #[error("conversation id must not be empty")]
    EmptyConversationId,
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Backend response, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ProxyResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id: None,
        }
    }

    #[must_use]
    pub fn in_conversation(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }
}

/// Reply text of a successful chat call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    text: String,
}

impl ChatReply {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The reply as a `200 text/plain` response.
    #[must_use]
    pub fn into_response(self) -> ProxyResponse {
        ProxyResponse {
            status: 200,
            content_type: Some(TEXT_PLAIN_UTF8.to_string()),
            body: self.text.into_bytes(),
        }
    }

    /// The reply as a byte stream with exactly one chunk.
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<u8>, RagError>> {
        stream::iter([Ok(self.text.into_bytes())])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Reply(ChatReply),
    /// Non-2xx from the backend, passed through.
    Failed(ProxyResponse),
}

/// Pull the reply text out of a chat response body.
///
/// Takes the first string value among [`REPLY_KEYS`]; anything else (non-JSON,
/// no such key) falls back to the raw body.
#[must_use]
pub fn extract_reply(body: &[u8]) -> String {
    if let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(body) {
        for key in REPLY_KEYS {
            if let Some(Value::String(text)) = object.get(key) {
                return text.clone();
            }
        }
    }
    String::from_utf8_lossy(body).into_owned()
}

#[derive(Clone)]
pub struct RagClient {
    http: Client,
    base: Url,
    api_key: Option<String>,
}

// Manual Debug impl to prevent leaking the API key in logs.
impl fmt::Debug for RagClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RagClient")
            .field("base", &self.base.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl RagClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RagError> {
        let base =
            Url::parse(base_url).map_err(|_| RagError::InvalidBaseUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(RagError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(RagError::Client)?;
        Ok(Self {
            http,
            base,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn from_config(config: &RagConfig) -> Result<Self, RagError> {
        let base_url = config.resolved_base_url().ok_or(RagError::MissingBaseUrl)?;
        Self::new(&base_url, config.resolved_api_key(), config.timeout())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        let request = self.http.request(method, url.clone());
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn execute(&self, url: &Url, request: RequestBuilder) -> Result<ProxyResponse, RagError> {
        let transport = |source: reqwest::Error| RagError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(transport)?.to_vec();

        tracing::debug!(%url, status, bytes = body.len(), "RAG proxy call");
        Ok(ProxyResponse {
            status,
            content_type,
            body,
        })
    }

    /// `GET {base}/conversations`
    pub async fn list_conversations(&self) -> Result<ProxyResponse, RagError> {
        let url = self.endpoint(&["conversations"]);
        self.execute(&url, self.request(Method::GET, &url)).await
    }

    /// `POST {base}/conversations` with `body` forwarded as JSON.
    pub async fn create_conversation(&self, body: &Value) -> Result<ProxyResponse, RagError> {
        let url = self.endpoint(&["conversations"]);
        self.execute(&url, self.request(Method::POST, &url).json(body))
            .await
    }

    /// `GET {base}/conversations/{id}`
    pub async fn get_conversation(&self, id: &str) -> Result<ProxyResponse, RagError> {
        if id.trim().is_empty() {
            return Err(RagError::EmptyConversationId);
        }
        let url = self.endpoint(&["conversations", id]);
        self.execute(&url, self.request(Method::GET, &url)).await
    }

    /// `POST {base}/chat`
    pub async fn chat(&self, chat: &ChatRequest) -> Result<ChatOutcome, RagError> {
        let url = self.endpoint(&["chat"]);
        let response = self
            .execute(&url, self.request(Method::POST, &url).json(chat))
            .await?;
        if response.is_success() {
            Ok(ChatOutcome::Reply(ChatReply {
                text: extract_reply(&response.body),
            }))
        } else {
            tracing::warn!(status = response.status, "RAG chat returned an error status");
            Ok(ChatOutcome::Failed(response))
        }
    }
}

#[cfg(test)]
mod tests;
