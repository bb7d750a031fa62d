//! Supported text-generation backends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A text-generation backend.
///
/// Each variant fixes the endpoint, default model, authentication headers and
/// the JSON path holding the assistant's reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `OpenAI` chat completions API.
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    /// Anthropic messages API.
    Anthropic,
}

/// Version header required by the Anthropic messages API.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

impl Backend {
    /// Configuration name of the backend.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    /// Default chat endpoint.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1/chat/completions",
            Self::Anthropic => "https://api.anthropic.com/v1/messages",
        }
    }

    /// Default model identifier.
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    /// JSON pointer to the assistant text in a successful response.
    #[must_use]
    pub const fn response_pointer(self) -> &'static str {
        match self {
            Self::OpenAi => "/choices/0/message/content",
            Self::Anthropic => "/content/0/text",
        }
    }

    /// Pull the assistant text out of a response body.
    #[must_use]
    pub fn extract_text(self, body: &Value) -> Option<&str> {
        body.pointer(self.response_pointer()).and_then(Value::as_str)
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
