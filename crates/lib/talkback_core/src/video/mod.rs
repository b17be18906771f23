//! Video module: talking-avatar synthesis via submit-then-poll jobs.
//!
//! # Public API
//!
//! - [`VideoProvider`]: submit a synthesis job, fetch its status
//! - [`did::DidClips`]: D-ID Clips API client
//! - [`poll::poll_job`]: bounded status polling with injectable delay

pub mod did;
pub mod poll;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a video provider call.
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("Video provider returned {status}: {body}")]
    Upstream {
        status: u16,
        body: serde_json::Value,
    },

    #[error("Video request failed: {0}")]
    Transport(String),

    #[error("Video response malformed: {0}")]
    Malformed(String),
}

impl VideoError {
    /// Provider response body when available, otherwise the error message.
    pub fn details(&self) -> serde_json::Value {
        match self {
            VideoError::Upstream { body, .. } => body.clone(),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

/// Lifecycle state of a synthesis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Processing,
    Done,
    Error,
}

impl JobStatus {
    /// Map a provider status string. Unknown states count as in progress.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "done" => JobStatus::Done,
            "error" | "rejected" => JobStatus::Error,
            _ => JobStatus::Processing,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Processing => "processing",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Snapshot of a provider-side synthesis job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisJob {
    pub id: String,
    pub status: JobStatus,
    /// Set by the provider once the job is done.
    pub result_url: Option<String>,
}

/// A service that renders text as a talking-avatar video.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Submit a synthesis job for `script`, returning the provider's job id.
    async fn submit(&self, script: &str) -> Result<String, VideoError>;

    /// Fetch the current state of a previously submitted job.
    async fn status(&self, job_id: &str) -> Result<SynthesisJob, VideoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_status_mapping() {
        assert_eq!(JobStatus::from_provider("done"), JobStatus::Done);
        assert_eq!(JobStatus::from_provider("error"), JobStatus::Error);
        assert_eq!(JobStatus::from_provider("rejected"), JobStatus::Error);
        assert_eq!(JobStatus::from_provider("created"), JobStatus::Processing);
        assert_eq!(JobStatus::from_provider("started"), JobStatus::Processing);
        assert_eq!(JobStatus::from_provider(""), JobStatus::Processing);
    }

    #[test]
    fn upstream_details_are_body() {
        let err = VideoError::Upstream {
            status: 402,
            body: serde_json::json!({"kind": "InsufficientCreditsError"}),
        };
        assert_eq!(err.details()["kind"], "InsufficientCreditsError");
    }
}
