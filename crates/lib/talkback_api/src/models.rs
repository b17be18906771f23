//! Wire models for the HTTP API (camelCase on the wire).

use serde::{Deserialize, Serialize};

/// `POST /api/chat` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/chat` success body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub text: String,
    /// Always serialized; `null` when no video was produced.
    pub video_url: Option<String>,
    pub success: bool,
}

/// Failure envelope for `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatFailure {
    pub error: String,
    pub details: serde_json::Value,
    pub success: bool,
}

/// `GET /api/test-did` success body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProbeResponse {
    pub success: bool,
    pub clip_id: String,
    pub message: String,
}

/// Failure body for `GET /api/test-did`.
#[derive(Debug, Clone, Serialize)]
pub struct VideoProbeFailure {
    pub success: bool,
    pub error: serde_json::Value,
}

/// `GET /api/test` body.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub message: String,
    #[serde(rename = "hasOpenAI")]
    pub has_openai: bool,
    #[serde(rename = "hasDID")]
    pub has_did: bool,
    pub timestamp: String,
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub port: u16,
}
