//! Bounded polling of a synthesis job.
//!
//! Every attempt waits one interval and then fetches the job status. Polling
//! ends at the first `done` or `error` status, on a fetch error, or once the
//! attempt budget is spent.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{JobStatus, VideoError, VideoProvider};

/// Interval and attempt budget for status polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 30,
        }
    }
}

/// Delay source between poll attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real-time delay backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How a polled job settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The job finished and the provider reported a result URL.
    Done { url: String, attempts: u32 },
    /// The provider reported the job as failed.
    Failed { attempts: u32 },
    /// The attempt budget ran out while the job was still processing.
    Exhausted { attempts: u32 },
}

/// Poll `job_id` until it settles or `schedule.max_attempts` is reached.
pub async fn poll_job(
    provider: &dyn VideoProvider,
    job_id: &str,
    schedule: PollSchedule,
    sleeper: &dyn Sleeper,
) -> Result<PollOutcome, VideoError> {
    for attempt in 1..=schedule.max_attempts {
        sleeper.sleep(schedule.interval).await;

        let job = provider.status(job_id).await?;
        debug!(job_id, attempt, status = %job.status, "synthesis job status");

        match job.status {
            JobStatus::Done => match job.result_url {
                Some(url) => {
                    info!(job_id, attempt, url = %url, "synthesis job done");
                    return Ok(PollOutcome::Done {
                        url,
                        attempts: attempt,
                    });
                }
                None => {
                    warn!(job_id, attempt, "synthesis job done without result url");
                    return Ok(PollOutcome::Failed { attempts: attempt });
                }
            },
            JobStatus::Error => {
                warn!(job_id, attempt, "synthesis job failed");
                return Ok(PollOutcome::Failed { attempts: attempt });
            }
            JobStatus::Processing => {}
        }
    }

    info!(
        job_id,
        attempts = schedule.max_attempts,
        "synthesis job still processing after attempt budget"
    );
    Ok(PollOutcome::Exhausted {
        attempts: schedule.max_attempts,
    })
}
