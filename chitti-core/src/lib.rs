//! Chitti: a rule-based bilingual chat assistant with its hosting services.
//!
//! This crate provides:
//! - A deterministic keyword rule engine (tiers, templates, language
//!   detection, confidence scoring)
//! - Conversation persistence with feedback and learning bookkeeping
//! - A user directory and an account registry with OTP password reset
//!
//! # Quick Start
//!
//! ```ignore
//! use chitti_core::{ChatRequest, ChatService, InMemoryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ChatService::builtin(Arc::new(InMemoryStore::new()))?;
//!
//!     let reply = service
//!         .ask(ChatRequest::new("who created you", "session-1"))
//!         .await?;
//!     println!("{}", reply.response);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod conversation;
pub mod engine;
pub mod knowledge;
pub mod language;
pub mod persist;
pub mod rules;
pub mod service;
pub mod testing;
pub mod users;

// Primary public API
pub use conversation::{ConversationRecord, ConversationStore, Feedback, InMemoryStore, StoreError};
pub use engine::{ChatEngine, Classification};
pub use knowledge::{KnowledgeBase, TemplateKeyNotFound};
pub use language::Language;
pub use persist::{ConversationArchive, PersistError};
pub use service::{
    ApiResponse, ChatError, ChatReply, ChatRequest, ChatService, LearningInsights,
    PerformanceStats,
};
