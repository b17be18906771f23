//! # talkback_api
//!
//! HTTP API library for Talkback.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use talkback_core::relay::Relay;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{chat, diagnostics, health};

/// Route paths served by [`router`].
pub mod routes {
    pub const POST_API_CHAT: &str = "/api/chat";
    pub const GET_API_TEST_DID: &str = "/api/test-did";
    pub const GET_API_TEST: &str = "/api/test";
    pub const GET_HEALTH: &str = "/health";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Completion + synthesis pipeline.
    pub relay: Arc<Relay>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .route(
            routes::GET_API_TEST_DID,
            get(diagnostics::video_probe_handler),
        )
        .route(routes::GET_API_TEST, get(diagnostics::status_handler))
        .route(routes::GET_HEALTH, get(health::health_handler))
        .layer(cors)
        .with_state(state)
}
