//! Chat relay endpoint.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use talkback_core::relay::VideoOutcome;
use tracing::{info, warn};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ChatRequest, ChatResponse};

/// `POST /api/chat`: complete the message and attach an avatar video when one is produced.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload?;
    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Message is required".into()))?;

    let reply = state.relay.respond(&message).await?;

    match &reply.video {
        VideoOutcome::Ready { url } => info!(url = %url, "replying with video"),
        VideoOutcome::Degraded(reason) => warn!(?reason, "replying without video"),
    }

    Ok(Json(ChatResponse {
        video_url: reply.video.url().map(str::to_string),
        text: reply.text,
        success: true,
    }))
}
