use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

/// Backend-supplied pointer into the uploaded document that an answer was
/// derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub page: u32,
    #[serde(rename = "relevanceScore")]
    pub relevance_score: f64,
    /// Content type of the cited chunk, e.g. "text" or "table"
    #[serde(rename = "type")]
    pub kind: String,
}

impl SourceRef {
    pub fn is_table(&self) -> bool {
        self.kind == "table"
    }
}

/// Delivery status of a transcript entry.
///
/// User entries are appended optimistically as `Pending` and resolved to
/// `Confirmed` or `Failed` when the request completes. Assistant entries are
/// always `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub sources: Vec<SourceRef>,
    pub has_tabular_data: bool,
    pub status: DeliveryStatus,
    pub timestamp: DateTime<Utc>,
}

impl Entry {
    /// A user question, appended before the server has confirmed anything.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            text: text.into(),
            sources: Vec::new(),
            has_tabular_data: false,
            status: DeliveryStatus::Pending,
            timestamp: Utc::now(),
        }
    }

    /// An assistant answer, already confirmed by arrival.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            text: text.into(),
            sources: Vec::new(),
            has_tabular_data: false,
            status: DeliveryStatus::Confirmed,
            timestamp: Utc::now(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<SourceRef>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_tabular_data(mut self, has_tabular_data: bool) -> Self {
        self.has_tabular_data = has_tabular_data;
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_entry_starts_pending() {
        let entry = Entry::user("What is the total revenue?");
        assert!(entry.is_user());
        assert_eq!(entry.status, DeliveryStatus::Pending);
        assert!(entry.sources.is_empty());
    }

    #[test]
    fn test_assistant_entry_is_confirmed() {
        let entry = Entry::assistant("The total is 42.")
            .with_sources(vec![SourceRef {
                page: 3,
                relevance_score: 0.91,
                kind: "table".to_string(),
            }])
            .with_tabular_data(true);
        assert_eq!(entry.status, DeliveryStatus::Confirmed);
        assert!(entry.has_tabular_data);
        assert!(entry.sources[0].is_table());
    }
}
