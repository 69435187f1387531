//! HTTP client for the document Q&A backend
//!
//! The backend owns all retrieval, OCR, and LLM work; this module is the
//! contract boundary. Endpoints:
//!
//! - `POST /chat` — ask a question about the indexed document
//! - `POST /upload` — multipart PDF upload (long timeout, progress events)
//! - `POST /upload/website` — submit a website URL for indexing
//! - `POST /speech/speech-to-text` — transcribe recorded audio

mod client;
mod types;

pub use client::ApiClient;
pub use types::{ChatRequest, ChatResponse, SttResponse, UploadResponse, WebsiteRequest, WebsiteResponse};
