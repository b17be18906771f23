//! API server configuration.

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:5000").
    pub bind_addr: String,
    /// Port reported by `GET /health`.
    pub port: u16,
    /// Whether a completion provider key was supplied.
    pub has_completion_key: bool,
    /// Whether a video provider key was supplied.
    pub has_video_key: bool,
}

impl ApiConfig {
    /// Builds a config, treating absent or empty keys as not configured.
    pub fn new(
        host: &str,
        port: u16,
        completion_key: Option<&str>,
        video_key: Option<&str>,
    ) -> Self {
        Self {
            bind_addr: format!("{host}:{port}"),
            port,
            has_completion_key: completion_key.is_some_and(|k| !k.is_empty()),
            has_video_key: video_key.is_some_and(|k| !k.is_empty()),
        }
    }
}
