//! Application state management
//!
//! Single source of truth for the UI: the transcript, the chat loading
//! flag, voice input, speech playback, and the upload panel. Components
//! mutate this state; async results arrive as backend events drained once
//! per frame.

use crate::backend::{Backend, BackendEvent};
use crate::config::Settings;
use crate::speech::{SpeechEvent, SpeechPlayback};
use crate::transcript::{Entry, TranscriptLog};
use crate::upload::{SelectedFile, UploadStatus, UNSUPPORTED_TYPE_MESSAGE};
use crate::voice::{RecordingState, VoiceInput};
use std::path::Path;
use std::time::Instant;
use tracing::warn;
use uuid::Uuid;

/// Shown as an assistant turn when the chat request fails, so the failure
/// is part of the transcript rather than a transient popup.
pub const FALLBACK_ANSWER: &str = "Sorry, I encountered an error. Please try again.";

/// Upload panel state: the pending selection and the current status banner.
pub struct UploadPanelState {
    pub selected: Option<SelectedFile>,
    pub url_input: String,
    pub status: UploadStatus,
    status_since: Option<Instant>,
}

impl Default for UploadPanelState {
    fn default() -> Self {
        Self {
            selected: None,
            url_input: String::new(),
            status: UploadStatus::Idle,
            status_since: None,
        }
    }
}

impl UploadPanelState {
    pub fn set_status(&mut self, status: UploadStatus) {
        self.status = status;
        self.status_since = Some(Instant::now());
    }

    pub fn is_busy(&self) -> bool {
        self.status.is_in_progress()
    }

    /// Auto-dismiss a terminal status once its delay has elapsed.
    pub fn tick(&mut self) {
        if let (Some(delay), Some(since)) = (self.status.dismiss_after(), self.status_since) {
            if since.elapsed() >= delay {
                self.status = UploadStatus::Idle;
                self.status_since = None;
            }
        }
    }
}

/// Central application state
pub struct AppState {
    /// Conversation transcript (append-only)
    pub transcript: TranscriptLog,

    /// Current text in the question box
    pub input_text: String,

    /// True from question-sent until its answer (or error) is appended;
    /// gates further submissions
    pub loading: bool,

    /// Press-to-talk voice input
    pub voice: VoiceInput,

    /// Spoken answer playback
    pub speech: SpeechPlayback,

    /// Entry currently being read aloud, if any
    pub speaking_entry: Option<Uuid>,

    /// Whether answers are spoken as they arrive (persisted preference)
    pub tts_enabled: bool,

    /// Upload panel state
    pub upload: UploadPanelState,

    /// Transient user-visible notice (voice/speech failures)
    pub notice: Option<String>,

    backend: Option<Backend>,
}

impl AppState {
    pub fn new(backend: Option<Backend>, settings: Settings) -> Self {
        Self {
            transcript: TranscriptLog::new(),
            input_text: String::new(),
            loading: false,
            voice: VoiceInput::new(),
            speech: SpeechPlayback::new(),
            speaking_entry: None,
            tts_enabled: settings.tts_enabled,
            upload: UploadPanelState::default(),
            notice: None,
            backend,
        }
    }

    // === Chat ===

    /// Submit the text currently in the question box.
    pub fn send_question(&mut self) {
        let text = self.input_text.trim().to_string();
        if self.submit_question(text) {
            self.input_text.clear();
        }
    }

    /// Submit a question directly (used by voice auto-submit). Returns
    /// whether the question was actually sent: the loading flag enforces
    /// at most one outstanding question.
    pub fn submit_question(&mut self, text: String) -> bool {
        if text.trim().is_empty() || self.loading {
            return false;
        }

        let entry_id = self.transcript.append(Entry::user(text.clone()));
        self.loading = true;

        if let Some(backend) = &self.backend {
            backend.ask(entry_id, text);
        }
        true
    }

    // === Voice input ===

    pub fn recording_state(&self) -> RecordingState {
        self.voice.state()
    }

    pub fn toggle_recording(&mut self) {
        if self.voice.state().is_recording() {
            self.stop_recording();
        } else if self.voice.state().is_idle() {
            self.start_recording();
        }
    }

    pub fn start_recording(&mut self) {
        if let Err(e) = self.voice.start() {
            self.notice = Some(e.user_message());
        }
    }

    /// Stop recording and hand the audio to transcription. The device is
    /// released inside `stop` before any network work begins.
    pub fn stop_recording(&mut self) {
        match self.voice.stop() {
            Ok((samples, sample_rate)) => {
                if let Some(backend) = &self.backend {
                    backend.transcribe(samples, sample_rate);
                } else {
                    self.voice.finish();
                }
            }
            Err(e) => {
                self.notice = Some(e.user_message());
            }
        }
    }

    pub fn cancel_recording(&mut self) {
        self.voice.cancel();
    }

    // === Speech output ===

    /// Flip the persisted TTS preference; disabling stops any playback.
    pub fn toggle_tts(&mut self) {
        self.tts_enabled = !self.tts_enabled;
        if !self.tts_enabled {
            self.speech.stop();
            self.speaking_entry = None;
        }

        let settings = Settings {
            tts_enabled: self.tts_enabled,
        };
        if let Err(e) = settings.save() {
            warn!("Could not persist settings: {e}");
        }
    }

    /// Per-message listen control: speak this entry, or stop if it is the
    /// one currently playing.
    pub fn toggle_speech_for(&mut self, entry_id: Uuid, text: &str) {
        if self.speaking_entry == Some(entry_id) {
            self.speech.stop();
        } else {
            self.speech.speak(entry_id, text);
        }
    }

    fn speak_if_enabled(&mut self, entry_id: Uuid, text: &str) {
        if self.tts_enabled {
            self.speech.speak(entry_id, text);
        }
    }

    // === Upload ===

    /// Validate and select a dropped or picked file. Rejection happens
    /// here, before any network call.
    pub fn select_file(&mut self, path: &Path) {
        match SelectedFile::from_path(path) {
            Ok(file) => {
                self.upload.selected = Some(file);
            }
            Err(e) => {
                self.upload
                    .set_status(UploadStatus::Failed(Some(e.user_message())));
            }
        }
    }

    pub fn clear_selected_file(&mut self) {
        self.upload.selected = None;
    }

    pub fn submit_upload(&mut self) {
        if self.upload.is_busy() {
            return;
        }
        let Some(file) = self.upload.selected.clone() else {
            return;
        };
        // Re-validated in case the selection predates a rename
        if !crate::upload::is_supported_file(&file.name, None) {
            self.upload
                .set_status(UploadStatus::Failed(Some(UNSUPPORTED_TYPE_MESSAGE.into())));
            return;
        }

        self.upload.set_status(UploadStatus::Uploading(0));
        if let Some(backend) = &self.backend {
            backend.upload_file(file);
        }
    }

    pub fn submit_website(&mut self) {
        if self.upload.is_busy() {
            return;
        }
        let url = self.upload.url_input.trim().to_string();
        if url.is_empty() {
            return;
        }

        self.upload.set_status(UploadStatus::Indexing);
        if let Some(backend) = &self.backend {
            backend.submit_website(url);
        }
    }

    // === Event pump ===

    /// Drain backend and playback events. Called once per frame.
    pub fn poll_events(&mut self) {
        while let Some(event) = self.backend.as_ref().and_then(|b| b.poll_event()) {
            self.handle_backend_event(event);
        }

        while let Some(event) = self.speech.poll_event() {
            self.handle_speech_event(event);
        }

        self.upload.tick();
    }

    /// Apply one backend event to the state. Public for tests, which drive
    /// the state machine without a server.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::ChatAnswered {
                user_entry,
                answer,
                sources,
                has_tabular_data,
            } => {
                self.transcript.confirm(user_entry);
                let entry = Entry::assistant(answer.clone())
                    .with_sources(sources)
                    .with_tabular_data(has_tabular_data);
                let answer_id = self.transcript.append(entry);
                self.loading = false;
                self.speak_if_enabled(answer_id, &answer);
            }
            BackendEvent::ChatFailed { user_entry } => {
                self.transcript.fail(user_entry);
                let answer_id = self.transcript.append(Entry::assistant(FALLBACK_ANSWER));
                self.loading = false;
                self.speak_if_enabled(answer_id, FALLBACK_ANSWER);
            }
            BackendEvent::UploadProgress(percent) => {
                if self.upload.is_busy() {
                    if percent >= 100 {
                        self.upload.set_status(UploadStatus::Indexing);
                    } else {
                        self.upload.set_status(UploadStatus::Uploading(percent));
                    }
                }
            }
            BackendEvent::UploadFinished(status) => {
                if status == UploadStatus::Success {
                    self.upload.selected = None;
                    self.upload.url_input.clear();
                }
                self.upload.set_status(status);
            }
            BackendEvent::TranscriptReady(text) => {
                self.voice.finish();
                if !self.submit_question(text.clone()) {
                    // A chat request is already in flight; leave the text
                    // in the box instead of dropping it
                    self.input_text = text;
                }
            }
            BackendEvent::TranscriptFailed(message) => {
                self.voice.finish();
                self.notice = Some(message);
            }
        }
    }

    fn handle_speech_event(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::Started(id) => {
                self.speaking_entry = Some(id);
            }
            SpeechEvent::Finished(id) => {
                if self.speaking_entry == Some(id) {
                    self.speaking_entry = None;
                }
            }
            SpeechEvent::Error { message, .. } => {
                warn!("Speech playback error: {message}");
                self.speaking_entry = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{DeliveryStatus, Role};

    fn test_state() -> AppState {
        AppState::new(None, Settings::default())
    }

    #[test]
    fn test_question_appends_pending_user_entry() {
        let mut state = test_state();
        state.input_text = "What is on page 3?".to_string();
        state.send_question();

        assert!(state.loading);
        assert!(state.input_text.is_empty());

        let entries = state.transcript.get_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[0].status, DeliveryStatus::Pending);
    }

    #[test]
    fn test_loading_gates_second_question() {
        let mut state = test_state();
        assert!(state.submit_question("first".to_string()));
        // In flight: second submission is a no-op
        assert!(!state.submit_question("second".to_string()));
        assert_eq!(state.transcript.len(), 1);
    }

    #[test]
    fn test_empty_question_is_ignored() {
        let mut state = test_state();
        state.input_text = "   ".to_string();
        state.send_question();
        assert!(!state.loading);
        assert!(state.transcript.is_empty());
    }

    #[test]
    fn test_answer_confirms_and_appends() {
        let mut state = test_state();
        state.submit_question("question".to_string());
        let user_entry = state.transcript.get_all()[0].id;

        state.handle_backend_event(BackendEvent::ChatAnswered {
            user_entry,
            answer: "answer".to_string(),
            sources: vec![],
            has_tabular_data: false,
        });

        assert!(!state.loading);
        let entries = state.transcript.get_all();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status, DeliveryStatus::Confirmed);
        assert_eq!(entries[1].role, Role::Assistant);
        assert_eq!(entries[1].text, "answer");
    }

    #[test]
    fn test_failure_appends_fallback_turn() {
        let mut state = test_state();
        state.submit_question("question".to_string());
        let user_entry = state.transcript.get_all()[0].id;

        state.handle_backend_event(BackendEvent::ChatFailed { user_entry });

        assert!(!state.loading);
        let entries = state.transcript.get_all();
        assert_eq!(entries[0].status, DeliveryStatus::Failed);
        assert_eq!(entries[1].role, Role::Assistant);
        assert_eq!(entries[1].text, FALLBACK_ANSWER);
    }

    #[test]
    fn test_n_roundtrips_alternate() {
        let mut state = test_state();
        for i in 0..4 {
            assert!(state.submit_question(format!("q{i}")));
            let user_entry = state.transcript.get_all().last().unwrap().id;
            state.handle_backend_event(BackendEvent::ChatAnswered {
                user_entry,
                answer: format!("a{i}"),
                sources: vec![],
                has_tabular_data: false,
            });
        }

        let entries = state.transcript.get_all();
        assert_eq!(entries.len(), 8);
        for (i, entry) in entries.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(entry.role, expected);
        }
    }

    #[test]
    fn test_transcript_auto_submits() {
        let mut state = test_state();
        state.handle_backend_event(BackendEvent::TranscriptReady("spoken question".to_string()));

        assert!(state.voice.state().is_idle());
        assert!(state.loading);
        assert_eq!(state.transcript.get_all()[0].text, "spoken question");
    }

    #[test]
    fn test_transcript_during_flight_lands_in_input_box() {
        let mut state = test_state();
        state.submit_question("typed".to_string());

        state.handle_backend_event(BackendEvent::TranscriptReady("spoken".to_string()));
        assert_eq!(state.transcript.len(), 1);
        assert_eq!(state.input_text, "spoken");
    }

    #[test]
    fn test_transcription_failure_sets_notice() {
        let mut state = test_state();
        state.handle_backend_event(BackendEvent::TranscriptFailed("try again".to_string()));
        assert!(state.voice.state().is_idle());
        assert_eq!(state.notice.as_deref(), Some("try again"));
        assert!(!state.loading);
    }

    #[test]
    fn test_upload_success_clears_selection() {
        let mut state = test_state();
        state.upload.selected = Some(SelectedFile {
            path: "report.pdf".into(),
            name: "report.pdf".to_string(),
            size: 10,
        });
        state.upload.set_status(UploadStatus::Uploading(50));

        state.handle_backend_event(BackendEvent::UploadFinished(UploadStatus::Success));
        assert!(state.upload.selected.is_none());
        assert_eq!(state.upload.status, UploadStatus::Success);
    }

    #[test]
    fn test_full_progress_switches_to_indexing() {
        let mut state = test_state();
        state.upload.set_status(UploadStatus::Uploading(0));

        state.handle_backend_event(BackendEvent::UploadProgress(42));
        assert_eq!(state.upload.status, UploadStatus::Uploading(42));

        state.handle_backend_event(BackendEvent::UploadProgress(100));
        assert_eq!(state.upload.status, UploadStatus::Indexing);
    }

    #[test]
    fn test_select_file_rejects_wrong_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.docx");
        std::fs::write(&path, b"x").unwrap();

        let mut state = test_state();
        state.select_file(&path);

        assert!(state.upload.selected.is_none());
        assert_eq!(
            state.upload.status,
            UploadStatus::Failed(Some(UNSUPPORTED_TYPE_MESSAGE.to_string()))
        );
    }

    #[test]
    fn test_select_file_accepts_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let mut state = test_state();
        state.select_file(&path);

        let selected = state.upload.selected.expect("file should be selected");
        assert_eq!(selected.name, "report.pdf");
        assert_eq!(state.upload.status, UploadStatus::Idle);
    }

    #[test]
    fn test_speaking_entry_tracks_playback() {
        let mut state = test_state();
        let id = Uuid::new_v4();

        state.handle_speech_event(SpeechEvent::Started(id));
        assert_eq!(state.speaking_entry, Some(id));

        // A finish for a different (cancelled) utterance does not clear it
        state.handle_speech_event(SpeechEvent::Finished(Uuid::new_v4()));
        assert_eq!(state.speaking_entry, Some(id));

        state.handle_speech_event(SpeechEvent::Finished(id));
        assert!(state.speaking_entry.is_none());
    }
}
