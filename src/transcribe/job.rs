use crate::{DocChatError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Status reported by the transcription service for a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Processing,
    Completed(String),
    Error(String),
}

/// The three remote operations a transcription job needs. Kept behind a
/// trait so the polling loop can be driven without a network.
pub trait TranscriptionJobApi {
    /// Upload raw audio, returning a URL the service can read it from.
    fn upload_audio(&self, audio: &[u8]) -> Result<String>;

    /// Create a transcription job for previously uploaded audio.
    fn create_job(&self, audio_url: &str) -> Result<String>;

    /// Fetch the current status of a job.
    fn job_status(&self, job_id: &str) -> Result<JobStatus>;
}

/// Polling parameters. The attempt cap exists so a stuck job cannot hold
/// the caller indefinitely.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 60,
        }
    }
}

/// Cooperative cancellation flag for an in-flight job.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Upload audio, create a job, and poll until it settles.
///
/// Returns the transcript text on completion. A job that reports `error`
/// fails immediately; exhausting `max_attempts` yields a timeout error;
/// cancellation is checked before every poll.
pub fn run_job<A: TranscriptionJobApi>(
    api: &A,
    audio: &[u8],
    config: &PollConfig,
    cancel: &CancelToken,
) -> Result<String> {
    let audio_url = api.upload_audio(audio)?;
    let job_id = api.create_job(&audio_url)?;
    info!("Transcription job {job_id} created");

    for attempt in 1..=config.max_attempts {
        if cancel.is_cancelled() {
            return Err(DocChatError::Cancelled(format!(
                "transcription job {job_id} cancelled"
            )));
        }

        match api.job_status(&job_id)? {
            JobStatus::Completed(text) => {
                info!("Job {job_id} completed after {attempt} poll(s)");
                return Ok(text);
            }
            JobStatus::Error(message) => {
                return Err(DocChatError::TranscriptionError(format!(
                    "job {job_id} failed: {message}"
                )));
            }
            status => {
                debug!("Job {job_id} poll {attempt}/{}: {status:?}", config.max_attempts);
            }
        }

        if attempt < config.max_attempts {
            std::thread::sleep(config.interval);
        }
    }

    Err(DocChatError::TimeoutError(format!(
        "transcription job {job_id} did not settle within {} polls",
        config.max_attempts
    )))
}
