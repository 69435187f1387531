use super::types::{DeliveryStatus, Entry};
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

/// Append-only transcript store.
///
/// Entries are never reordered, edited, or removed; the only mutation after
/// append is resolving a pending user entry to confirmed or failed.
#[derive(Debug, Clone)]
pub struct TranscriptLog {
    entries: Arc<RwLock<Vec<Entry>>>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append an entry and return its id.
    pub fn append(&self, entry: Entry) -> Uuid {
        let id = entry.id;
        self.entries.write().push(entry);
        id
    }

    /// Mark a pending entry as confirmed.
    pub fn confirm(&self, id: Uuid) {
        self.set_status(id, DeliveryStatus::Confirmed);
    }

    /// Mark a pending entry as failed.
    pub fn fail(&self, id: Uuid) {
        self.set_status(id, DeliveryStatus::Failed);
    }

    fn set_status(&self, id: Uuid, status: DeliveryStatus) {
        let mut entries = self.entries.write();
        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            entry.status = status;
        }
    }

    pub fn get_all(&self) -> Vec<Entry> {
        self.entries.read().clone()
    }

    /// The subset of entries authored by the user, in order. Drives the
    /// question history sidebar.
    pub fn user_questions(&self) -> Vec<Entry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.is_user())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for TranscriptLog {
    fn default() -> Self {
        Self::new()
    }
}
