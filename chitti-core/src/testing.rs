//! Testing utilities.
//!
//! This module provides tools for integration testing:
//! - `ChatHarness` for driving the chat service over an in-memory store
//! - `RecordingMailer` / `FailingMailer` for exercising the OTP flow

use crate::auth::{MailError, OtpMailer};
use crate::conversation::{Feedback, InMemoryStore};
use crate::service::{ChatReply, ChatRequest, ChatService};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A chat service wired to an in-memory store, with a fixed session and
/// user for convenience.
pub struct ChatHarness {
    pub service: ChatService,
    pub store: Arc<InMemoryStore>,
    pub session_id: String,
    pub user_id: Uuid,
}

impl ChatHarness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let service = ChatService::builtin(store.clone())
            .expect("builtin knowledge base is valid");
        Self {
            service,
            store,
            session_id: "test-session".to_string(),
            user_id: Uuid::new_v4(),
        }
    }

    /// Ask as the harness user in the harness session.
    pub async fn ask(&self, question: &str) -> ChatReply {
        self.service
            .ask(ChatRequest::new(question, &self.session_id).with_user(self.user_id))
            .await
            .expect("in-memory store does not fail")
    }

    /// Ask and immediately record feedback on the reply.
    pub async fn ask_with_feedback(&self, question: &str, feedback: Feedback) -> ChatReply {
        let reply = self.ask(question).await;
        self.service
            .provide_feedback(reply.conversation_id, feedback, None)
            .await
            .expect("conversation was just stored");
        reply
    }
}

impl Default for ChatHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Mailer that records every code instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently "sent" code, if any.
    pub async fn last_code(&self) -> Option<String> {
        self.sent.lock().await.last().map(|(_, code)| code.clone())
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl OtpMailer for RecordingMailer {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), MailError> {
        self.sent
            .lock()
            .await
            .push((email.to_string(), code.to_string()));
        Ok(())
    }
}

/// Mailer that always fails, for the delivery-failure path.
pub struct FailingMailer;

#[async_trait]
impl OtpMailer for FailingMailer {
    async fn send_otp(&self, _email: &str, _code: &str) -> Result<(), MailError> {
        Err(MailError("smtp unreachable".to_string()))
    }
}
