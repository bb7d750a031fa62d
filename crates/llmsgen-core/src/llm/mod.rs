//! Client for the text-generation backend.
//!
//! The pipeline talks to the backend through the [`TextGenerator`] trait so
//! tests can substitute scripted responses. [`ChatClient`] is the HTTP
//! implementation: one single-turn request per call, no streaming, no retries.
//!
//! ```rust,no_run
//! use llmsgen_core::llm::{Backend, ChatClient, TextGenerator};
//!
//! # async fn example() -> llmsgen_core::Result<()> {
//! let client = ChatClient::new(Backend::OpenAi, "sk-...".to_string(), None)?;
//! let reply = client.complete("Say hello.", 16).await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

mod backend;
pub mod prompts;

pub use backend::{ANTHROPIC_VERSION, Backend};

use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Request timeout for backend calls.
pub const BACKEND_TIMEOUT: Duration = Duration::from_secs(90);

/// Sampling temperature used for every prompt.
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Response bodies are cut to this many characters when logged.
const LOGGED_BODY_CHARS: usize = 500;

/// Something that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send `prompt` as a single user message and return the reply text.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

/// HTTP client for a chat-style backend.
pub struct ChatClient {
    client: Client,
    backend: Backend,
    headers: HeaderMap,
    model: String,
    endpoint: String,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl ChatClient {
    /// Create a client for `backend`, optionally overriding its model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `api_key` cannot be sent as a header value.
    pub fn new(backend: Backend, api_key: String, model: Option<String>) -> Result<Self> {
        let headers = auth_headers(backend, &api_key)?;
        let client = Client::builder()
            .timeout(BACKEND_TIMEOUT)
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            backend,
            headers,
            model: model.unwrap_or_else(|| backend.default_model().to_string()),
            endpoint: backend.endpoint().to_string(),
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Send requests to `endpoint` instead of the backend default.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Backend this client talks to.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// Model identifier sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

}

fn auth_headers(backend: Backend, api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    match backend {
        Backend::OpenAi => {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|_| Error::Config("API key contains invalid characters".into()))?;
            headers.insert(AUTHORIZATION, value);
        },
        Backend::Anthropic => {
            let value = HeaderValue::from_str(api_key)
                .map_err(|_| Error::Config("API key contains invalid characters".into()))?;
            headers.insert("x-api-key", value);
            headers.insert(
                "anthropic-version",
                HeaderValue::from_static(ANTHROPIC_VERSION),
            );
        },
    }
    Ok(headers)
}

#[async_trait]
impl TextGenerator for ChatClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            warn!(
                "{} returned HTTP {}: {}",
                self.backend,
                status.as_u16(),
                truncate_chars(&text, LOGGED_BODY_CHARS)
            );
            return Err(Error::Backend(format!(
                "{} returned HTTP {}",
                self.backend,
                status.as_u16()
            )));
        }

        let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
            warn!(
                "{} returned a non-JSON body: {}",
                self.backend,
                truncate_chars(&text, LOGGED_BODY_CHARS)
            );
            return Err(Error::Backend(format!("{} returned malformed JSON", self.backend)));
        };

        match self.backend.extract_text(&value) {
            Some(reply) => {
                debug!("{} replied with {} chars", self.backend, reply.len());
                Ok(reply.to_string())
            },
            None => {
                warn!(
                    "{} response has no text at {}: {}",
                    self.backend,
                    self.backend.response_pointer(),
                    truncate_chars(&text, LOGGED_BODY_CHARS)
                );
                Err(Error::Backend(format!(
                    "{} response is missing {}",
                    self.backend,
                    self.backend.response_pointer()
                )))
            },
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
