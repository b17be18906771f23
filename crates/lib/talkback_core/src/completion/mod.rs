//! Completion module: turns a user message into a reply string.
//!
//! # Public API
//!
//! - [`CompletionProvider`]: seam implemented by concrete providers
//! - [`CompletionSettings`]: model, prompt and sampling parameters
//! - [`openai::OpenAiCompletion`]: OpenAI chat-completions client

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Keep responses concise and friendly, under 100 words.";

/// Errors that can occur while obtaining a completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion provider returned {status}: {body}")]
    Upstream {
        status: u16,
        body: serde_json::Value,
    },

    #[error("Completion request failed: {0}")]
    Transport(String),

    #[error("Completion response malformed: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// Provider HTTP status, when the provider answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            CompletionError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Provider response body when available, otherwise the error message.
    pub fn details(&self) -> serde_json::Value {
        match self {
            CompletionError::Upstream { body, .. } => body.clone(),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

/// Reply produced by a completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
}

/// Model, prompt and sampling parameters for completion requests.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    /// Chat-completions endpoint.
    pub api_url: String,
    pub model: String,
    /// Instruction sent as the system message ahead of every user message.
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

/// A service that generates a reply for a single user message.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, message: &str) -> Result<Completion, CompletionError>;
}

/// Parse a provider error body, keeping raw text when it is not JSON.
pub(crate) fn parse_error_body(raw: String) -> serde_json::Value {
    serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
}
