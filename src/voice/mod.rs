//! Press-to-talk voice input adapter
//!
//! Turns a record/stop interaction into samples ready for transcription
//! without the caller touching microphone plumbing. State machine:
//!
//! ```text
//! Idle -> Recording -> Processing -> Idle
//!           |                |
//!           +--- error ------+---> Idle
//! ```
//!
//! The microphone is released the moment recording stops, before any
//! network work, so a failed transcription can never leak the device.

#[cfg(feature = "audio-io")]
use crate::audio::AudioCapture;
use crate::{DocChatError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{info, warn};

/// Voice input pipeline state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordingState {
    /// No recording in progress
    #[default]
    Idle,
    /// Actively capturing audio from the microphone
    Recording,
    /// Capture finished, audio being transcribed
    Processing,
}

impl RecordingState {
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, RecordingState::Processing)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, RecordingState::Idle)
    }

    pub fn is_active(&self) -> bool {
        !self.is_idle()
    }
}

impl std::fmt::Display for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingState::Idle => write!(f, "Idle"),
            RecordingState::Recording => write!(f, "Recording"),
            RecordingState::Processing => write!(f, "Processing"),
        }
    }
}

/// Owns the capture device and the sample buffer for one press-to-talk
/// interaction at a time.
pub struct VoiceInput {
    state: RecordingState,
    #[cfg(feature = "audio-io")]
    capture: Option<AudioCapture>,
    chunk_tx: Sender<Vec<f32>>,
    chunk_rx: Receiver<Vec<f32>>,
    buffered: Vec<f32>,
    sample_rate: u32,
}

impl VoiceInput {
    pub fn new() -> Self {
        let (chunk_tx, chunk_rx) = bounded(1024);

        #[cfg(feature = "audio-io")]
        let (capture, sample_rate) = match AudioCapture::new() {
            Ok(capture) => {
                let rate = capture.sample_rate();
                info!("Voice input ready: {rate} Hz, {} channel(s)", capture.channels());
                (Some(capture), rate)
            }
            Err(e) => {
                warn!("Voice input unavailable: {e}");
                (None, 0)
            }
        };
        #[cfg(not(feature = "audio-io"))]
        let sample_rate = 0;

        Self {
            state: RecordingState::Idle,
            #[cfg(feature = "audio-io")]
            capture,
            chunk_tx,
            chunk_rx,
            buffered: Vec::new(),
            sample_rate,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Whether a microphone was found at startup.
    pub fn is_available(&self) -> bool {
        #[cfg(feature = "audio-io")]
        {
            self.capture.is_some()
        }
        #[cfg(not(feature = "audio-io"))]
        {
            false
        }
    }

    /// Begin recording. Fails when the microphone is unavailable or a
    /// session is already active; both are surfaced to the user.
    pub fn start(&mut self) -> Result<()> {
        if self.state.is_active() {
            return Err(DocChatError::AudioDeviceError(
                "A recording session is already active".into(),
            ));
        }

        self.buffered.clear();
        // Discard samples left over from an earlier session
        while self.chunk_rx.try_recv().is_ok() {}

        #[cfg(feature = "audio-io")]
        {
            let capture = self.capture.as_mut().ok_or_else(|| {
                DocChatError::AudioDeviceError("No microphone available".into())
            })?;
            capture.start(self.chunk_tx.clone())?;
            self.state = RecordingState::Recording;
            info!("Recording started");
            Ok(())
        }
        #[cfg(not(feature = "audio-io"))]
        {
            Err(DocChatError::AudioDeviceError(
                "Built without audio support".into(),
            ))
        }
    }

    /// Drain pending sample chunks into the buffer. Called once per UI frame
    /// while recording.
    pub fn pump(&mut self) {
        while let Ok(chunk) = self.chunk_rx.try_recv() {
            self.buffered.extend(chunk);
        }
    }

    /// Number of samples buffered so far (drives the level indicator).
    pub fn buffered_samples(&self) -> usize {
        self.buffered.len()
    }

    /// Stop recording: release the device immediately, then hand back the
    /// finalized samples for transcription. The adapter moves to
    /// `Processing`; the caller must invoke [`finish`](Self::finish) when
    /// transcription resolves either way.
    pub fn stop(&mut self) -> Result<(Vec<f32>, u32)> {
        if !self.state.is_recording() {
            return Err(DocChatError::AudioDeviceError("Not recording".into()));
        }

        // Device release comes first so later failures cannot leak it
        #[cfg(feature = "audio-io")]
        if let Some(capture) = self.capture.as_mut() {
            capture.stop();
        }

        self.pump();
        self.state = RecordingState::Processing;

        let samples = std::mem::take(&mut self.buffered);
        info!("Recording stopped: {} samples", samples.len());
        Ok((samples, self.sample_rate))
    }

    /// Abandon the current recording without transcribing.
    pub fn cancel(&mut self) {
        #[cfg(feature = "audio-io")]
        if let Some(capture) = self.capture.as_mut() {
            capture.stop();
        }
        self.buffered.clear();
        self.state = RecordingState::Idle;
        info!("Recording cancelled");
    }

    /// Transcription resolved (success or failure): return to idle.
    pub fn finish(&mut self) {
        self.state = RecordingState::Idle;
    }
}

impl Default for VoiceInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_helpers() {
        assert!(RecordingState::Idle.is_idle());
        assert!(!RecordingState::Idle.is_active());
        assert!(RecordingState::Recording.is_recording());
        assert!(RecordingState::Recording.is_active());
        assert!(RecordingState::Processing.is_processing());
        assert_eq!(RecordingState::Processing.to_string(), "Processing");
    }

    #[test]
    fn test_stop_requires_recording() {
        let mut voice = VoiceInput::new();
        assert!(voice.state().is_idle());
        assert!(voice.stop().is_err());
        assert!(voice.state().is_idle());
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut voice = VoiceInput::new();
        voice.cancel();
        assert!(voice.state().is_idle());
        assert_eq!(voice.buffered_samples(), 0);
    }

    #[test]
    fn test_full_cycle_when_device_present() {
        // Exercised only where a capture device exists (not in most CI)
        let mut voice = VoiceInput::new();
        if !voice.is_available() {
            return;
        }

        voice.start().unwrap();
        assert!(voice.state().is_recording());

        // A second start while active must be rejected
        assert!(voice.start().is_err());
        assert!(voice.state().is_recording());

        let (samples, rate) = voice.stop().unwrap();
        assert!(voice.state().is_processing());
        assert!(rate > 0);
        let _ = samples;

        voice.finish();
        assert!(voice.state().is_idle());
    }
}
