//! Bridge between the UI frame loop and async backend calls
//!
//! The UI never awaits anything: each user action spawns one task on a
//! dedicated tokio runtime, and results come back as events drained with
//! `try_recv` once per frame. The chat loading gate upstream guarantees at
//! most one chat request is ever outstanding.

use crate::api::ApiClient;
use crate::audio::encode_wav_mono16;
use crate::config::Config;
use crate::transcript::SourceRef;
use crate::upload::{SelectedFile, UploadStatus};
use crate::{DocChatError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub enum BackendEvent {
    /// The chat endpoint answered the question tied to `user_entry`
    ChatAnswered {
        user_entry: Uuid,
        answer: String,
        sources: Vec<SourceRef>,
        has_tabular_data: bool,
    },
    /// The chat request failed; the UI shows the fallback assistant turn
    ChatFailed { user_entry: Uuid },
    /// Percent of the upload body sent so far
    UploadProgress(u8),
    /// Terminal upload outcome (Success, Failed or Timeout)
    UploadFinished(UploadStatus),
    /// Voice recording was transcribed to non-empty text
    TranscriptReady(String),
    /// Transcription failed; carries the user-visible message
    TranscriptFailed(String),
}

pub struct Backend {
    runtime: tokio::runtime::Runtime,
    api: Arc<ApiClient>,
    event_tx: Sender<BackendEvent>,
    event_rx: Receiver<BackendEvent>,
}

impl Backend {
    pub fn new(config: Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| DocChatError::ConfigError(format!("tokio runtime: {e}")))?;
        let api = Arc::new(ApiClient::new(config)?);
        let (event_tx, event_rx) = unbounded();

        Ok(Self {
            runtime,
            api,
            event_tx,
            event_rx,
        })
    }

    /// Drain one pending event, if any.
    pub fn poll_event(&self) -> Option<BackendEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Ask a question. Exactly one of `ChatAnswered`/`ChatFailed` follows.
    pub fn ask(&self, user_entry: Uuid, question: String) {
        let api = Arc::clone(&self.api);
        let events = self.event_tx.clone();

        self.runtime.spawn(async move {
            let event = match api.chat(&question).await {
                Ok(resp) => BackendEvent::ChatAnswered {
                    user_entry,
                    answer: resp.answer,
                    sources: resp.sources,
                    has_tabular_data: resp.has_tabular_data,
                },
                Err(e) => {
                    error!("Chat request failed: {e}");
                    BackendEvent::ChatFailed { user_entry }
                }
            };
            let _ = events.send(event);
        });
    }

    /// Upload a selected PDF. Progress events stream while the body is
    /// sent; exactly one `UploadFinished` follows.
    pub fn upload_file(&self, file: SelectedFile) {
        let api = Arc::clone(&self.api);
        let events = self.event_tx.clone();
        let progress_events = self.event_tx.clone();

        self.runtime.spawn(async move {
            let data = match tokio::fs::read(&file.path).await {
                Ok(data) => data,
                Err(e) => {
                    error!("Could not read {}: {e}", file.path.display());
                    let _ = events.send(BackendEvent::UploadFinished(UploadStatus::Failed(
                        Some("Could not read the selected file".to_string()),
                    )));
                    return;
                }
            };

            let result = api
                .upload_file(&file.name, data, move |percent| {
                    let _ = progress_events.send(BackendEvent::UploadProgress(percent));
                })
                .await;

            let status = match result {
                Ok(resp) if resp.success => {
                    info!("Document indexed: {}", file.name);
                    UploadStatus::Success
                }
                Ok(resp) => UploadStatus::Failed(resp.message),
                Err(DocChatError::TimeoutError(_)) => UploadStatus::Timeout,
                Err(e) => {
                    error!("Upload failed: {e}");
                    UploadStatus::Failed(None)
                }
            };
            let _ = events.send(BackendEvent::UploadFinished(status));
        });
    }

    /// Submit a website URL for indexing. One `UploadFinished` follows.
    pub fn submit_website(&self, url: String) {
        let api = Arc::clone(&self.api);
        let events = self.event_tx.clone();

        self.runtime.spawn(async move {
            let status = match api.upload_website(&url).await {
                Ok(resp) if resp.success => UploadStatus::Success,
                Ok(resp) => UploadStatus::Failed(resp.error.or(resp.message)),
                Err(DocChatError::TimeoutError(_)) => UploadStatus::Timeout,
                Err(e) => {
                    error!("Website submission failed: {e}");
                    UploadStatus::Failed(None)
                }
            };
            let _ = events.send(BackendEvent::UploadFinished(status));
        });
    }

    /// Transcribe finalized recording samples. One of
    /// `TranscriptReady`/`TranscriptFailed` follows.
    pub fn transcribe(&self, samples: Vec<f32>, sample_rate: u32) {
        let api = Arc::clone(&self.api);
        let events = self.event_tx.clone();

        self.runtime.spawn(async move {
            let failed = |events: &Sender<BackendEvent>, e: DocChatError| {
                let _ = events.send(BackendEvent::TranscriptFailed(e.user_message()));
            };

            if samples.is_empty() || sample_rate == 0 {
                failed(
                    &events,
                    DocChatError::TranscriptionError("empty recording".into()),
                );
                return;
            }

            let wav = match encode_wav_mono16(&samples, sample_rate) {
                Ok(wav) => wav,
                Err(e) => {
                    failed(&events, e);
                    return;
                }
            };

            match api.speech_to_text(wav).await {
                Ok(resp) => match resp.text.filter(|t| !t.trim().is_empty()) {
                    Some(text) if resp.success => {
                        let _ = events.send(BackendEvent::TranscriptReady(text));
                    }
                    // Success flag without text, or text without the flag,
                    // both count as a failed transcription
                    _ => failed(
                        &events,
                        DocChatError::TranscriptionError("empty transcript".into()),
                    ),
                },
                Err(e) => {
                    error!("Transcription request failed: {e}");
                    failed(&events, DocChatError::TranscriptionError(e.to_string()));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_starts_with_no_events() {
        let backend = Backend::new(Config::default()).unwrap();
        assert!(backend.poll_event().is_none());
    }

    #[test]
    fn test_unreadable_file_reports_failure() {
        let backend = Backend::new(Config::default()).unwrap();
        backend.upload_file(SelectedFile {
            path: "/nonexistent/report.pdf".into(),
            name: "report.pdf".to_string(),
            size: 0,
        });

        // The read fails locally, so an event arrives without a server
        let mut outcome = None;
        for _ in 0..200 {
            if let Some(event) = backend.poll_event() {
                outcome = Some(event);
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        match outcome {
            Some(BackendEvent::UploadFinished(UploadStatus::Failed(Some(_)))) => {}
            other => panic!("expected upload failure, got {other:?}"),
        }
    }
}
