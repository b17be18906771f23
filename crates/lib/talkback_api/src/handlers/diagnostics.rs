//! Diagnostic endpoints: configuration report and video provider probe.

use axum::Json;
use axum::extract::State;
use chrono::{SecondsFormat, Utc};
use tracing::warn;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{StatusResponse, VideoProbeResponse};

const PROBE_SCRIPT: &str = "Testing D-ID connection";

/// `GET /api/test`: report liveness and which provider keys are configured.
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Backend is working!".to_string(),
        has_openai: state.config.has_completion_key,
        has_did: state.config.has_video_key,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// `GET /api/test-did`: submit one synthesis job to check video provider connectivity.
pub async fn video_probe_handler(
    State(state): State<AppState>,
) -> AppResult<Json<VideoProbeResponse>> {
    let clip_id = state
        .relay
        .probe_video(PROBE_SCRIPT)
        .await
        .inspect_err(|e| warn!("video provider probe failed: {e}"))?;

    Ok(Json(VideoProbeResponse {
        success: true,
        clip_id,
        message: "D-ID connection successful".to_string(),
    }))
}
