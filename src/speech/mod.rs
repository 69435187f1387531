//! Spoken answer playback

mod tts;

pub use tts::{SpeechCommand, SpeechEvent, SpeechPlayback};
