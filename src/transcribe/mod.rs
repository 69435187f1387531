//! Client for a hosted transcription-job service
//!
//! Some deployments transcribe against a third-party API instead of the
//! backend's own endpoint: upload the raw audio, create a job, then poll the
//! job until it completes. The polling loop is bounded (max attempts, fixed
//! interval) and cancellable; a job that never settles yields a timeout
//! error instead of spinning forever.

mod job;
mod remote;

pub use job::{run_job, CancelToken, JobStatus, PollConfig, TranscriptionJobApi};
pub use remote::RemoteTranscriber;
