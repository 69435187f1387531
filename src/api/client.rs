use super::types::{
    ChatRequest, ChatResponse, SttResponse, UploadResponse, WebsiteRequest, WebsiteResponse,
};
use crate::config::Config;
use crate::{DocChatError, Result};
use futures::stream;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tracing::{debug, info};

/// Size of the chunks the upload body is split into for progress reporting
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| DocChatError::ConfigError(format!("HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Ask a question about the currently indexed document.
    pub async fn chat(&self, question: &str) -> Result<ChatResponse> {
        debug!("POST /chat ({} chars)", question.len());
        let resp = self
            .http
            .post(self.url("/chat"))
            .timeout(self.config.chat_timeout)
            .json(&ChatRequest {
                question: question.trim().to_string(),
            })
            .send()
            .await
            .map_err(map_transport)?
            .error_for_status()
            .map_err(map_transport)?;

        resp.json().await.map_err(map_transport)
    }

    /// Upload a PDF for indexing. `progress` receives the percentage of the
    /// request body sent so far; server-side processing continues after 100%.
    pub async fn upload_file(
        &self,
        file_name: &str,
        data: Vec<u8>,
        progress: impl Fn(u8) + Send + Sync + 'static,
    ) -> Result<UploadResponse> {
        info!("POST /upload ({} bytes)", data.len());
        let length = data.len() as u64;
        let total = length.max(1);
        let chunks: Vec<Vec<u8>> = data.chunks(UPLOAD_CHUNK_SIZE).map(|c| c.to_vec()).collect();

        let mut sent: u64 = 0;
        let body = Body::wrap_stream(stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            progress(((sent * 100) / total) as u8);
            Ok::<Vec<u8>, std::io::Error>(chunk)
        })));

        let part = Part::stream_with_length(body, length)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(map_transport)?;
        let form = Form::new().part("file", part);

        let resp = self
            .http
            .post(self.url("/upload"))
            .timeout(self.config.upload_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport)?;

        let status = resp.status();
        if status.is_success() {
            resp.json().await.map_err(map_transport)
        } else {
            // Failures often carry a user-facing message in the body
            let body = resp.text().await.unwrap_or_default();
            match serde_json::from_str::<UploadResponse>(&body) {
                Ok(parsed) => Ok(UploadResponse {
                    success: false,
                    message: parsed.message,
                }),
                Err(_) => Err(DocChatError::ApiError(format!("HTTP {status}"))),
            }
        }
    }

    /// Submit a website URL for indexing.
    pub async fn upload_website(&self, url: &str) -> Result<WebsiteResponse> {
        info!("POST /upload/website ({url})");
        let resp = self
            .http
            .post(self.url("/upload/website"))
            .timeout(self.config.website_timeout)
            .json(&WebsiteRequest {
                url: url.trim().to_string(),
            })
            .send()
            .await
            .map_err(map_transport)?;

        let status = resp.status();
        if status.is_success() {
            resp.json().await.map_err(map_transport)
        } else {
            let body = resp.text().await.unwrap_or_default();
            match serde_json::from_str::<WebsiteResponse>(&body) {
                Ok(parsed) => Ok(WebsiteResponse {
                    success: false,
                    ..parsed
                }),
                Err(_) => Err(DocChatError::ApiError(format!("HTTP {status}"))),
            }
        }
    }

    /// Transcribe recorded audio via the backend.
    pub async fn speech_to_text(&self, wav: Vec<u8>) -> Result<SttResponse> {
        info!("POST /speech/speech-to-text ({} bytes)", wav.len());
        let part = Part::bytes(wav)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .map_err(map_transport)?;
        let form = Form::new().part("audio", part);

        let resp = self
            .http
            .post(self.url("/speech/speech-to-text"))
            .timeout(self.config.stt_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport)?
            .error_for_status()
            .map_err(map_transport)?;

        resp.json().await.map_err(map_transport)
    }
}

fn map_transport(e: reqwest::Error) -> DocChatError {
    if e.is_timeout() {
        DocChatError::TimeoutError(e.to_string())
    } else {
        DocChatError::ApiError(e.to_string())
    }
}
