//! Conversation records and the storage seam the engine's callers use.
//!
//! The engine itself never touches storage. The service layer persists
//! each exchange through [`ConversationStore`], so hosts can swap in their
//! own backend; [`InMemoryStore`] is the conventional bundled one.

use crate::language::Language;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// User feedback on a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Good,
    Bad,
    Neutral,
}

impl Feedback {
    pub fn name(&self) -> &'static str {
        match self {
            Feedback::Good => "good",
            Feedback::Bad => "bad",
            Feedback::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One persisted question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub question: String,
    pub response: String,
    pub language: Language,
    pub confidence: f64,
    pub session_id: String,
    pub user_id: Option<Uuid>,
    pub feedback: Option<Feedback>,
    /// Free-form context the host may attach.
    pub context: Option<String>,
    pub learned: bool,
    pub learning_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationRecord {
    pub fn new(
        question: impl Into<String>,
        response: impl Into<String>,
        language: Language,
        confidence: f64,
        session_id: impl Into<String>,
        user_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            response: response.into(),
            language,
            confidence,
            session_id: session_id.into(),
            user_id,
            feedback: None,
            context: None,
            learned: false,
            learning_notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Errors from conversation storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conversation not found: {0}")]
    NotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage collaborator for conversation records.
///
/// Listing methods return records newest first.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a new record, returning its id.
    async fn save(&self, record: ConversationRecord) -> Result<Uuid, StoreError>;

    /// Replace an existing record; refreshes its `updated_at` stamp.
    async fn update(&self, record: ConversationRecord) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<ConversationRecord>, StoreError>;

    async fn by_session(&self, session_id: &str) -> Result<Vec<ConversationRecord>, StoreError>;

    async fn by_user(&self, user_id: Uuid) -> Result<Vec<ConversationRecord>, StoreError>;

    async fn by_user_and_session(
        &self,
        user_id: Uuid,
        session_id: &str,
    ) -> Result<Vec<ConversationRecord>, StoreError>;

    /// Records whose question contains the keyword, case-insensitively.
    async fn search_questions(&self, keyword: &str) -> Result<Vec<ConversationRecord>, StoreError>;

    /// Unlearned records carrying the given feedback.
    async fn unlearned_with_feedback(
        &self,
        feedback: Feedback,
    ) -> Result<Vec<ConversationRecord>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    async fn count_learned(&self) -> Result<usize, StoreError>;

    /// Delete every record of a session, returning how many were removed.
    async fn delete_session(&self, session_id: &str) -> Result<usize, StoreError>;

    async fn all(&self) -> Result<Vec<ConversationRecord>, StoreError>;
}

/// In-memory conversation store backed by a `tokio` RwLock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<ConversationRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing records (archive restore).
    pub fn with_records(records: Vec<ConversationRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Newest-first snapshot of records passing the filter.
    async fn select(
        &self,
        filter: impl Fn(&ConversationRecord) -> bool,
    ) -> Vec<ConversationRecord> {
        self.records
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| filter(r))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    async fn save(&self, record: ConversationRecord) -> Result<Uuid, StoreError> {
        let id = record.id;
        self.records.write().await.push(record);
        Ok(id)
    }

    async fn update(&self, mut record: ConversationRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or(StoreError::NotFound(record.id))?;
        record.updated_at = Utc::now();
        *slot = record;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ConversationRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn by_session(&self, session_id: &str) -> Result<Vec<ConversationRecord>, StoreError> {
        Ok(self.select(|r| r.session_id == session_id).await)
    }

    async fn by_user(&self, user_id: Uuid) -> Result<Vec<ConversationRecord>, StoreError> {
        Ok(self.select(|r| r.user_id == Some(user_id)).await)
    }

    async fn by_user_and_session(
        &self,
        user_id: Uuid,
        session_id: &str,
    ) -> Result<Vec<ConversationRecord>, StoreError> {
        Ok(self
            .select(|r| r.user_id == Some(user_id) && r.session_id == session_id)
            .await)
    }

    async fn search_questions(&self, keyword: &str) -> Result<Vec<ConversationRecord>, StoreError> {
        let keyword = keyword.to_lowercase();
        Ok(self
            .select(|r| r.question.to_lowercase().contains(&keyword))
            .await)
    }

    async fn unlearned_with_feedback(
        &self,
        feedback: Feedback,
    ) -> Result<Vec<ConversationRecord>, StoreError> {
        Ok(self
            .select(|r| !r.learned && r.feedback == Some(feedback))
            .await)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().await.len())
    }

    async fn count_learned(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().await.iter().filter(|r| r.learned).count())
    }

    async fn delete_session(&self, session_id: &str) -> Result<usize, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.session_id != session_id);
        Ok(before - records.len())
    }

    async fn all(&self) -> Result<Vec<ConversationRecord>, StoreError> {
        Ok(self.select(|_| true).await)
    }
}
