//! Talkback API server binary.
//!
//! Relays chat messages to the completion provider and, when a video key is
//! configured, to the avatar video provider.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use talkback_api::config::ApiConfig;
use talkback_core::completion::openai::OpenAiCompletion;
use talkback_core::completion::{CompletionProvider, CompletionSettings};
use talkback_core::relay::{Relay, RelaySettings};
use talkback_core::video::VideoProvider;
use talkback_core::video::did::{ClipSettings, DidClips};
use talkback_core::video::poll::{PollSchedule, TokioSleeper};
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "talkback_server", about = "Talkback chat relay server")]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Completion provider key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Completion model.
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-3.5-turbo")]
    openai_model: String,

    /// Video provider key; avatar synthesis is skipped when absent or blank.
    #[arg(long, env = "DID_API_KEY", hide_env_values = true)]
    did_api_key: Option<String>,

    /// Delay before each synthesis status check, in milliseconds.
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 3000)]
    poll_interval_ms: u64,

    /// Status checks before giving up on a video.
    #[arg(long, env = "POLL_MAX_ATTEMPTS", default_value_t = 30)]
    poll_max_attempts: u32,

    /// Longest script, in characters, sent for synthesis.
    #[arg(long, env = "MAX_SCRIPT_CHARS", default_value_t = 500)]
    max_script_chars: usize,
}

impl Args {
    /// Video key, if present and not blank.
    fn video_key(&self) -> Option<&str> {
        self.did_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Key presence is reported as supplied, even when blank after trimming.
    fn api_config(&self) -> ApiConfig {
        ApiConfig::new(
            &self.host,
            self.port,
            self.openai_api_key.as_deref(),
            self.did_api_key.as_deref(),
        )
    }

    fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            poll: PollSchedule {
                interval: Duration::from_millis(self.poll_interval_ms),
                max_attempts: self.poll_max_attempts,
            },
            max_script_chars: self.max_script_chars,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,talkback_api=debug,talkback_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    info!(
        version = talkback_core::version(),
        port = args.port,
        "starting talkback_server"
    );

    if args.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set, chat requests will be rejected by the provider");
    }

    let client = reqwest::Client::new();

    let completion: Arc<dyn CompletionProvider> = Arc::new(OpenAiCompletion::new(
        client.clone(),
        args.openai_api_key.clone().unwrap_or_default(),
        CompletionSettings {
            model: args.openai_model.clone(),
            ..CompletionSettings::default()
        },
    ));

    let video: Option<Arc<dyn VideoProvider>> = args.video_key().map(|key| {
        Arc::new(DidClips::new(client.clone(), key, ClipSettings::default()))
            as Arc<dyn VideoProvider>
    });
    info!(video_enabled = video.is_some(), "configured providers");

    let settings = args.relay_settings();
    info!(
        poll_interval_ms = args.poll_interval_ms,
        poll_max_attempts = settings.poll.max_attempts,
        max_script_chars = settings.max_script_chars,
        "relay settings"
    );

    let relay = Relay::new(completion, video, settings, Arc::new(TokioSleeper));

    let config = args.api_config();

    let state = talkback_api::AppState {
        relay: Arc::new(relay),
        config: config.clone(),
    };

    let app = talkback_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
