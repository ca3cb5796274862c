//! ChatService - the primary public API for hosting the assistant.
//!
//! Wraps the response engine and a conversation store into a single
//! interface: ask a question, record feedback, browse history, and run the
//! feedback-driven learning pass. The hosting boundary (REPL, HTTP, ...)
//! wraps results in [`ApiResponse`] if it needs a wire envelope.

use crate::conversation::{ConversationRecord, ConversationStore, Feedback, StoreError};
use crate::engine::ChatEngine;
use crate::knowledge::TemplateKeyNotFound;
use crate::language::Language;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Errors from ChatService operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("engine configuration error: {0}")]
    Engine(#[from] TemplateKeyNotFound),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("conversation not found: {0}")]
    ConversationNotFound(Uuid),
}

/// A question posed to the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    pub session_id: String,
    pub user_id: Option<Uuid>,
}

impl ChatRequest {
    pub fn new(question: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            session_id: session_id.into(),
            user_id: None,
        }
    }

    /// Attach the asking user.
    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// The assistant's reply plus the bookkeeping a host shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub conversation_id: Uuid,
    pub response: String,
    pub session_id: String,
    pub language: Language,
    pub confidence: f64,
    pub learned: bool,
    pub learning_notes: Option<String>,
}

impl ChatReply {
    fn from_record(record: &ConversationRecord) -> Self {
        Self {
            conversation_id: record.id,
            response: record.response.clone(),
            session_id: record.session_id.clone(),
            language: record.language,
            confidence: record.confidence,
            learned: record.learned,
            learning_notes: record.learning_notes.clone(),
        }
    }
}

/// Aggregate learning counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LearningInsights {
    pub total_conversations: usize,
    pub learned_conversations: usize,
    pub learning_rate: f64,
}

/// Aggregate reply-quality counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub average_confidence: f64,
    pub total_conversations: usize,
}

/// The chat service: one engine, one store.
pub struct ChatService {
    engine: ChatEngine,
    store: Arc<dyn ConversationStore>,
}

impl ChatService {
    pub fn new(engine: ChatEngine, store: Arc<dyn ConversationStore>) -> Self {
        Self { engine, store }
    }

    /// Service over the built-in knowledge base.
    pub fn builtin(store: Arc<dyn ConversationStore>) -> Result<Self, TemplateKeyNotFound> {
        Ok(Self::new(ChatEngine::builtin()?, store))
    }

    pub fn engine(&self) -> &ChatEngine {
        &self.engine
    }

    /// Answer a question and persist the exchange.
    pub async fn ask(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        let classification = self.engine.classify(&request.question);

        tracing::info!(
            session = %request.session_id,
            language = %classification.language,
            confidence = classification.confidence,
            "question answered"
        );

        let record = ConversationRecord::new(
            request.question.trim(),
            classification.response,
            classification.language,
            classification.confidence,
            request.session_id,
            request.user_id,
        );
        let reply = ChatReply::from_record(&record);
        self.store.save(record).await?;

        Ok(reply)
    }

    /// Record user feedback on a reply.
    pub async fn provide_feedback(
        &self,
        conversation_id: Uuid,
        feedback: Feedback,
        comment: Option<&str>,
    ) -> Result<(), ChatError> {
        let mut record = self
            .store
            .get(conversation_id)
            .await?
            .ok_or(ChatError::ConversationNotFound(conversation_id))?;

        record.feedback = Some(feedback);
        record.learning_notes = Some(match comment {
            Some(comment) => format!("Feedback: {feedback}, Comment: {comment}"),
            None => format!("Feedback: {feedback}"),
        });
        self.store.update(record).await?;

        tracing::info!(%conversation_id, %feedback, "feedback recorded");
        Ok(())
    }

    /// A user's conversation history, newest first, optionally narrowed to
    /// one session.
    pub async fn history(
        &self,
        user_id: Uuid,
        session_id: Option<&str>,
    ) -> Result<Vec<ChatReply>, ChatError> {
        let records = match session_id {
            Some(session_id) => self.store.by_user_and_session(user_id, session_id).await?,
            None => self.store.by_user(user_id).await?,
        };
        Ok(records.iter().map(ChatReply::from_record).collect())
    }

    /// A single conversation by id.
    pub async fn conversation(&self, id: Uuid) -> Result<ChatReply, ChatError> {
        let record = self
            .store
            .get(id)
            .await?
            .ok_or(ChatError::ConversationNotFound(id))?;
        Ok(ChatReply::from_record(&record))
    }

    /// Previously asked questions containing the keyword.
    pub async fn similar_questions(&self, keyword: &str) -> Result<Vec<String>, ChatError> {
        let records = self.store.search_questions(keyword).await?;
        Ok(records.into_iter().map(|r| r.question).collect())
    }

    /// Learning counters across the whole store.
    pub async fn learning_insights(&self) -> Result<LearningInsights, ChatError> {
        let total = self.store.count().await?;
        let learned = self.store.count_learned().await?;
        let learning_rate = if total > 0 {
            learned as f64 / total as f64
        } else {
            0.0
        };
        Ok(LearningInsights {
            total_conversations: total,
            learned_conversations: learned,
            learning_rate,
        })
    }

    /// Mark every unlearned negative-feedback exchange as learned.
    ///
    /// Returns how many records were flipped.
    pub async fn learn_from_feedback(&self) -> Result<usize, ChatError> {
        let pending = self.store.unlearned_with_feedback(Feedback::Bad).await?;
        let flipped = pending.len();

        for mut record in pending {
            record.learned = true;
            record.learning_notes = Some(
                "Learned from negative feedback - need to improve response quality".to_string(),
            );
            self.store.update(record).await?;
        }

        tracing::info!(flipped, "learning pass completed");
        Ok(flipped)
    }

    /// Average confidence and total volume.
    pub async fn performance_stats(&self) -> Result<PerformanceStats, ChatError> {
        let records = self.store.all().await?;
        let total = records.len();
        let average_confidence = if total > 0 {
            records.iter().map(|r| r.confidence).sum::<f64>() / total as f64
        } else {
            0.0
        };
        Ok(PerformanceStats {
            average_confidence,
            total_conversations: total,
        })
    }

    /// Drop a session's history; returns how many records were removed.
    pub async fn clear_session(&self, session_id: &str) -> Result<usize, ChatError> {
        let removed = self.store.delete_session(session_id).await?;
        tracing::info!(session = session_id, removed, "session history cleared");
        Ok(removed)
    }

    /// Overwrite a conversation's learned flag and notes.
    pub async fn update_learning_status(
        &self,
        conversation_id: Uuid,
        learned: bool,
        learning_notes: Option<String>,
    ) -> Result<(), ChatError> {
        let mut record = self
            .store
            .get(conversation_id)
            .await?
            .ok_or(ChatError::ConversationNotFound(conversation_id))?;
        record.learned = learned;
        record.learning_notes = learning_notes;
        self.store.update(record).await?;
        Ok(())
    }
}

/// Envelope returned at a hosting wire boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let user = Uuid::new_v4();
        let request = ChatRequest::new("hello", "s1").with_user(user);
        assert_eq!(request.question, "hello");
        assert_eq!(request.session_id, "s1");
        assert_eq!(request.user_id, Some(user));
    }

    #[test]
    fn test_api_response_envelope() {
        let ok = ApiResponse::success("done", 42);
        assert!(ok.success);
        assert_eq!(ok.data, Some(42));

        let err: ApiResponse<()> = ApiResponse::error("boom");
        assert!(!err.success);
        assert!(err.data.is_none());
    }
}
