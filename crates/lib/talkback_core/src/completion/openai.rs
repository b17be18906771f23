//! OpenAI completion provider.
//!
//! Calls the chat-completions API once per message. No retry: a failed
//! completion fails the request.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Completion, CompletionError, CompletionProvider, CompletionSettings, parse_error_body};

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client authenticated with a bearer key.
pub struct OpenAiCompletion {
    client: Client,
    api_key: String,
    settings: CompletionSettings,
}

impl OpenAiCompletion {
    pub fn new(client: Client, api_key: impl Into<String>, settings: CompletionSettings) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            settings,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletion {
    async fn complete(&self, message: &str) -> Result<Completion, CompletionError> {
        let body = ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.settings.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let resp = self
            .client
            .post(&self.settings.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                body: parse_error_body(raw),
            });
        }

        let data: ChatResponse = resp
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(format!("response parse error: {e}")))?;

        let text = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CompletionError::Malformed("no choices[0].message.content".into()))?;

        debug!(model = %self.settings.model, chars = text.chars().count(), "completion received");

        Ok(Completion { text })
    }
}
