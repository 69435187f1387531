//! Runtime configuration and persisted user settings

mod settings;

pub use settings::Settings;

use std::time::Duration;

/// Default backend base URL when `DOCCHAT_API_URL` is not set
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Application configuration resolved at startup
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the document Q&A backend
    pub api_base_url: String,

    /// Timeout for chat requests
    pub chat_timeout: Duration,

    /// Timeout for file uploads (long: the server runs OCR and indexing)
    pub upload_timeout: Duration,

    /// Timeout for website URL submissions
    pub website_timeout: Duration,

    /// Timeout for speech-to-text requests
    pub stt_timeout: Duration,

    /// Interval between transcription-job status polls
    pub poll_interval: Duration,

    /// Maximum number of status polls before giving up on a job
    pub max_poll_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            chat_timeout: Duration::from_secs(60),
            upload_timeout: Duration::from_secs(600),
            website_timeout: Duration::from_secs(30),
            stt_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
            max_poll_attempts: 60,
        }
    }
}

impl Config {
    /// Build a configuration from the environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("DOCCHAT_API_URL") {
            let trimmed = url.trim().trim_end_matches('/');
            if !trimmed.is_empty() {
                config.api_base_url = trimmed.to_string();
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
    }

    #[test]
    fn test_upload_timeout_is_long() {
        let config = Config::default();
        assert!(config.upload_timeout > config.website_timeout);
        assert!(config.upload_timeout >= Duration::from_secs(600));
    }

    #[test]
    fn test_polling_is_bounded() {
        let config = Config::default();
        assert!(config.max_poll_attempts > 0);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }
}
