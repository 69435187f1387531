//! Microphone capture and WAV assembly

#[cfg(feature = "audio-io")]
mod capture;
mod wav;

#[cfg(feature = "audio-io")]
pub use capture::AudioCapture;
pub use wav::encode_wav_mono16;
