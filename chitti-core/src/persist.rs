//! Conversation log persistence.
//!
//! Versioned JSON archives for exporting a store's records and importing
//! them back, with a metadata peek that avoids loading the full log.

use crate::conversation::{ConversationRecord, ConversationStore, InMemoryStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from archive operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current archive format version.
const ARCHIVE_VERSION: u32 = 1;

/// A saved conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationArchive {
    /// Archive format version for compatibility checking.
    pub version: u32,

    /// When the archive was written.
    pub saved_at: DateTime<Utc>,

    /// Summary counters, duplicated up front for peek access.
    pub metadata: ArchiveMetadata,

    /// The records, in insertion order.
    pub records: Vec<ConversationRecord>,
}

/// Counters describing an archive without its contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    pub conversations: usize,
    pub sessions: usize,
    pub learned: usize,
}

impl ConversationArchive {
    /// Build an archive from records.
    pub fn new(records: Vec<ConversationRecord>) -> Self {
        let sessions: HashSet<&str> = records.iter().map(|r| r.session_id.as_str()).collect();
        let metadata = ArchiveMetadata {
            conversations: records.len(),
            sessions: sessions.len(),
            learned: records.iter().filter(|r| r.learned).count(),
        };
        Self {
            version: ARCHIVE_VERSION,
            saved_at: Utc::now(),
            metadata,
            records,
        }
    }

    /// Snapshot everything a store holds. Records are archived oldest
    /// first so restore preserves insertion order.
    pub async fn export(store: &dyn ConversationStore) -> Result<Self, PersistError> {
        let mut records = store.all().await?;
        records.reverse();
        Ok(Self::new(records))
    }

    /// Write the archive as pretty-printed JSON.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load an archive, rejecting mismatched format versions.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let archive: Self = serde_json::from_str(&content)?;

        if archive.version != ARCHIVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: ARCHIVE_VERSION,
                found: archive.version,
            });
        }

        Ok(archive)
    }

    /// Read just the counters from an archive file.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<ArchiveMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: ArchiveMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != ARCHIVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: ARCHIVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }

    /// Rebuild an in-memory store from the archived records.
    pub fn restore(self) -> InMemoryStore {
        InMemoryStore::with_records(self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn record(session: &str, learned: bool) -> ConversationRecord {
        let mut r = ConversationRecord::new(
            "q",
            "a",
            Language::English,
            0.5,
            session,
            None,
        );
        r.learned = learned;
        r
    }

    #[test]
    fn test_metadata_counters() {
        let archive = ConversationArchive::new(vec![
            record("s1", false),
            record("s1", true),
            record("s2", false),
        ]);
        assert_eq!(archive.metadata.conversations, 3);
        assert_eq!(archive.metadata.sessions, 2);
        assert_eq!(archive.metadata.learned, 1);
    }

    #[tokio::test]
    async fn test_restore_keeps_records() {
        let archive = ConversationArchive::new(vec![record("s1", false), record("s2", true)]);
        let store = archive.restore();
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.count_learned().await.unwrap(), 1);
    }
}
