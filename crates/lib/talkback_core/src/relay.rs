//! Relay pipeline: receive → complete → (optional) synthesize → reply.
//!
//! Only the completion step can fail a request. Video synthesis is best
//! effort; every way it can fall short is reported as a [`DegradeReason`]
//! alongside the reply text.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::completion::{CompletionError, CompletionProvider};
use crate::video::poll::{PollOutcome, PollSchedule, Sleeper, poll_job};
use crate::video::{VideoError, VideoProvider};

/// Tunables for the synthesis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaySettings {
    pub poll: PollSchedule,
    /// Longest script, in characters, sent to the video provider.
    pub max_script_chars: usize,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            poll: PollSchedule::default(),
            max_script_chars: 500,
        }
    }
}

/// Why a reply carries no video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    /// No video provider credential is configured.
    NotConfigured,
    /// Job submission failed.
    SubmitFailed(String),
    /// A status fetch failed mid-poll.
    StatusFailed(String),
    /// The provider reported the job as failed.
    JobFailed,
    /// The job was still processing when the attempt budget ran out.
    TimedOut { attempts: u32 },
}

/// Result of the synthesis step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoOutcome {
    Ready { url: String },
    Degraded(DegradeReason),
}

impl VideoOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            VideoOutcome::Ready { url } => Some(url),
            VideoOutcome::Degraded(_) => None,
        }
    }
}

/// Reply text plus the outcome of video synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub text: String,
    pub video: VideoOutcome,
}

/// Errors from a direct video provider probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Video provider credential not configured")]
    NotConfigured,

    #[error(transparent)]
    Video(#[from] VideoError),
}

/// Truncate `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Stateless pipeline shared by all requests.
pub struct Relay {
    completion: Arc<dyn CompletionProvider>,
    video: Option<Arc<dyn VideoProvider>>,
    settings: RelaySettings,
    sleeper: Arc<dyn Sleeper>,
}

impl Relay {
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        video: Option<Arc<dyn VideoProvider>>,
        settings: RelaySettings,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            completion,
            video,
            settings,
            sleeper,
        }
    }

    /// Whether a video provider is installed.
    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    /// Complete `message`, then try to synthesize a video of the reply.
    pub async fn respond(&self, message: &str) -> Result<RelayReply, CompletionError> {
        info!(chars = message.chars().count(), "relaying message");

        let completion = self.completion.complete(message).await.inspect_err(|e| {
            error!(status = ?e.upstream_status(), details = %e.details(), "completion failed");
        })?;
        info!(chars = completion.text.chars().count(), "completion ready");

        let video = self.synthesize(&completion.text).await;

        Ok(RelayReply {
            text: completion.text,
            video,
        })
    }

    async fn synthesize(&self, text: &str) -> VideoOutcome {
        let Some(provider) = self.video.as_deref() else {
            info!("no video provider configured, skipping avatar generation");
            return VideoOutcome::Degraded(DegradeReason::NotConfigured);
        };

        let script = truncate_chars(text, self.settings.max_script_chars);
        let job_id = match provider.submit(script).await {
            Ok(id) => id,
            Err(e) => {
                warn!(details = %e.details(), "synthesis job submission failed");
                return VideoOutcome::Degraded(DegradeReason::SubmitFailed(e.to_string()));
            }
        };
        info!(job_id = %job_id, "synthesis job submitted");

        match poll_job(provider, &job_id, self.settings.poll, self.sleeper.as_ref()).await {
            Ok(PollOutcome::Done { url, .. }) => VideoOutcome::Ready { url },
            Ok(PollOutcome::Failed { .. }) => VideoOutcome::Degraded(DegradeReason::JobFailed),
            Ok(PollOutcome::Exhausted { attempts }) => {
                VideoOutcome::Degraded(DegradeReason::TimedOut { attempts })
            }
            Err(e) => {
                warn!(job_id = %job_id, details = %e.details(), "synthesis status fetch failed");
                VideoOutcome::Degraded(DegradeReason::StatusFailed(e.to_string()))
            }
        }
    }

    /// Submit one synthesis job for `script` and return its id.
    pub async fn probe_video(&self, script: &str) -> Result<String, ProbeError> {
        let provider = self.video.as_deref().ok_or(ProbeError::NotConfigured)?;
        let job_id = provider.submit(script).await?;
        info!(job_id = %job_id, "video provider probe succeeded");
        Ok(job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate_chars("hello", 500), "hello");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_chars("abcdef", 4), "abcd");
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn truncate_exact_length() {
        let text = "x".repeat(500);
        assert_eq!(truncate_chars(&text, 500).len(), 500);
    }

    #[test]
    fn only_ready_has_url() {
        let ready = VideoOutcome::Ready {
            url: "https://cdn/v.mp4".into(),
        };
        assert_eq!(ready.url(), Some("https://cdn/v.mp4"));
        assert_eq!(
            VideoOutcome::Degraded(DegradeReason::TimedOut { attempts: 30 }).url(),
            None
        );
    }
}
