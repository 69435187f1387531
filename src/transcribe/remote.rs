use super::job::{JobStatus, TranscriptionJobApi};
use crate::{DocChatError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct CreateJobRequest<'a> {
    audio_url: &'a str,
    language_code: &'a str,
}

#[derive(Deserialize)]
struct UploadReply {
    upload_url: String,
}

#[derive(Deserialize)]
struct CreateJobReply {
    id: String,
}

#[derive(Deserialize)]
struct JobStatusReply {
    status: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Transcription service client, authenticated with a bearer-style header.
pub struct RemoteTranscriber {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl RemoteTranscriber {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DocChatError::ConfigError(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl TranscriptionJobApi for RemoteTranscriber {
    fn upload_audio(&self, audio: &[u8]) -> Result<String> {
        let reply: UploadReply = self
            .http
            .post(self.url("/upload"))
            .header("authorization", &self.api_key)
            .header("content-type", "application/octet-stream")
            .body(audio.to_vec())
            .send()
            .map_err(map_transport)?
            .error_for_status()
            .map_err(map_transport)?
            .json()
            .map_err(map_transport)?;
        Ok(reply.upload_url)
    }

    fn create_job(&self, audio_url: &str) -> Result<String> {
        let reply: CreateJobReply = self
            .http
            .post(self.url("/transcript"))
            .header("authorization", &self.api_key)
            .json(&CreateJobRequest {
                audio_url,
                language_code: "en_us",
            })
            .send()
            .map_err(map_transport)?
            .error_for_status()
            .map_err(map_transport)?
            .json()
            .map_err(map_transport)?;
        Ok(reply.id)
    }

    fn job_status(&self, job_id: &str) -> Result<JobStatus> {
        let reply: JobStatusReply = self
            .http
            .get(self.url(&format!("/transcript/{job_id}")))
            .header("authorization", &self.api_key)
            .send()
            .map_err(map_transport)?
            .error_for_status()
            .map_err(map_transport)?
            .json()
            .map_err(map_transport)?;

        match reply.status.as_str() {
            "completed" => Ok(JobStatus::Completed(reply.text.unwrap_or_default())),
            "error" => Ok(JobStatus::Error(
                reply.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
            "processing" => Ok(JobStatus::Processing),
            _ => Ok(JobStatus::Queued),
        }
    }
}

fn map_transport(e: reqwest::Error) -> DocChatError {
    if e.is_timeout() {
        DocChatError::TimeoutError(e.to_string())
    } else {
        DocChatError::TranscriptionError(e.to_string())
    }
}
