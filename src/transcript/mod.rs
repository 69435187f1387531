//! Conversation transcript: an append-only log of user and assistant turns

mod log;
mod types;

pub use log::TranscriptLog;
pub use types::{DeliveryStatus, Entry, Role, SourceRef};
