//! Conversion job polling
//!
//! Queries the job status at a fixed interval until it reaches `COMPLETED` or
//! `FAILED`. Polling is unbounded by default; [`PollConfig`] can cap it by
//! attempt count or wall-clock time. The wait between checks is an `.await`
//! point, so dropping the future (or wrapping it in `tokio::time::timeout`)
//! cancels polling.

use crate::api::{endpoints, JobRecord, JobStatus};
use crate::error::{JingongoError, Result};
use crate::transport::Transport;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info};

/// Default seconds between status checks
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Placeholder used when a failed job carries no error message
const MISSING_ERROR_MESSAGE: &str = "N/A";

/// How to wait for a conversion job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between consecutive status checks
    pub interval: Duration,

    /// Give up after this many status checks
    pub max_attempts: Option<u32>,

    /// Give up rather than sleep past this much elapsed time
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: None,
            timeout: None,
        }
    }
}

impl PollConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Fetch the current status record of a job
pub async fn fetch_status(transport: &Transport, job_id: &str) -> Result<JobRecord> {
    let mut record: JobRecord = transport
        .get_json(&endpoints::conversion_status(job_id))
        .await?;
    if record.job_id.is_empty() {
        record.job_id = job_id.to_string();
    }
    Ok(record)
}

/// Drive `fetch` until the job is terminal
///
/// `COMPLETED` returns the record, `FAILED` becomes
/// [`JingongoError::Conversion`] with the server's message. A record with no
/// status at all is an API error.
pub async fn poll_until_terminal<F, Fut>(
    job_id: &str,
    config: &PollConfig,
    mut fetch: F,
) -> Result<JobRecord>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobRecord>>,
{
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let record = fetch().await?;

        let status = record.status.clone().ok_or_else(|| {
            JingongoError::api(format!(
                "Status response for job '{}' did not include a status",
                job_id
            ))
        })?;
        info!(job_id, %status, attempt = attempts, "Cloud conversion status");

        match status {
            JobStatus::Completed => {
                info!(job_id, "FMU conversion completed successfully");
                return Ok(record);
            }
            JobStatus::Failed => {
                let message = record
                    .error_message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| MISSING_ERROR_MESSAGE.to_string());
                error!(job_id, details = %message, "FMU conversion failed");
                return Err(JingongoError::conversion(message));
            }
            _ => {}
        }

        let out_of_attempts = config.max_attempts.is_some_and(|max| attempts >= max);
        let out_of_time = config
            .timeout
            .is_some_and(|limit| started.elapsed() + config.interval > limit);
        if out_of_attempts || out_of_time {
            error!(job_id, attempts, "Stopped waiting for conversion");
            return Err(JingongoError::PollingTimedOut {
                job_id: job_id.to_string(),
                attempts,
            });
        }

        tokio::time::sleep(config.interval).await;
    }
}
