pub mod api;
pub mod audio;
pub mod backend;
pub mod config;
pub mod speech;
pub mod transcribe;
pub mod transcript;
pub mod ui;
pub mod upload;
pub mod voice;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DocChatError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Transcription error: {0}")]
    TranscriptionError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timed out: {0}")]
    TimeoutError(String),

    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Speech synthesis error: {0}")]
    SpeechError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl From<std::io::Error> for DocChatError {
    fn from(e: std::io::Error) -> Self {
        DocChatError::IOError(e.to_string())
    }
}

impl DocChatError {
    /// Check if this error is recoverable by simply retrying the action
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Device errors need user intervention (permissions, hardware)
            DocChatError::AudioDeviceError(_) => false,
            // Transient: the user can speak or submit again
            DocChatError::TranscriptionError(_) => true,
            DocChatError::ApiError(_) => true,
            DocChatError::TimeoutError(_) => true,
            // The user must fix the input first
            DocChatError::ValidationError(_) => false,
            DocChatError::SpeechError(_) => true,
            DocChatError::IOError(_) => false,
            DocChatError::ConfigError(_) => false,
            DocChatError::ChannelError(_) => false,
            DocChatError::Cancelled(_) => true,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            DocChatError::AudioDeviceError(_) => {
                "Microphone unavailable. Please check that it is connected, not in use \
                 by another application, and that permission has been granted."
                    .to_string()
            }
            DocChatError::TranscriptionError(_) => {
                "Could not transcribe audio. Please try speaking again or type your question."
                    .to_string()
            }
            DocChatError::ApiError(_) => {
                "The server could not process the request. Please try again.".to_string()
            }
            DocChatError::TimeoutError(_) => {
                "The request timed out. The server may still be processing; please wait \
                 a moment and try again."
                    .to_string()
            }
            DocChatError::ValidationError(msg) => msg.clone(),
            DocChatError::SpeechError(_) => {
                "Text-to-speech failed. The answer is shown as text.".to_string()
            }
            DocChatError::IOError(_) => "File system error occurred.".to_string(),
            DocChatError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            DocChatError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            DocChatError::Cancelled(_) => "The operation was cancelled.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocChatError>;
