//! QA tests for conversation archive save/load.

use chitti_core::conversation::ConversationStore;
use chitti_core::persist::{ConversationArchive, PersistError};
use chitti_core::testing::ChatHarness;
use tempfile::TempDir;

#[tokio::test]
async fn test_archive_round_trip() {
    let harness = ChatHarness::new();
    harness.ask("who created you").await;
    harness.ask("hello").await;

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("conversations.json");

    let archive = ConversationArchive::export(harness.store.as_ref()).await.unwrap();
    archive.save_json(&path).await.expect("Failed to save archive");
    assert!(path.exists());

    let loaded = ConversationArchive::load_json(&path).await.expect("Failed to load archive");
    assert_eq!(loaded.metadata.conversations, 2);
    assert_eq!(loaded.metadata.sessions, 1);

    // Restore into a fresh store; ordering and content survive.
    let restored = loaded.restore();
    assert_eq!(restored.count().await.unwrap(), 2);
    let listed = restored.by_session(&harness.session_id).await.unwrap();
    assert_eq!(listed[0].question, "hello");
    assert_eq!(listed[1].question, "who created you");
}

#[tokio::test]
async fn test_peek_metadata_without_full_load() {
    let harness = ChatHarness::new();
    harness.ask("mummy").await;

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("peek.json");

    ConversationArchive::export(harness.store.as_ref())
        .await
        .unwrap()
        .save_json(&path)
        .await
        .unwrap();

    let metadata = ConversationArchive::peek_metadata(&path).await.unwrap();
    assert_eq!(metadata.conversations, 1);
    assert_eq!(metadata.learned, 0);
}

#[tokio::test]
async fn test_version_mismatch_is_rejected() {
    let harness = ChatHarness::new();
    harness.ask("hello").await;

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("future.json");

    let mut archive = ConversationArchive::export(harness.store.as_ref()).await.unwrap();
    archive.version = 99;
    archive.save_json(&path).await.unwrap();

    let err = ConversationArchive::load_json(&path).await.unwrap_err();
    assert!(matches!(
        err,
        PersistError::VersionMismatch { expected: 1, found: 99 }
    ));

    let err = ConversationArchive::peek_metadata(&path).await.unwrap_err();
    assert!(matches!(err, PersistError::VersionMismatch { .. }));
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let result =
        ConversationArchive::load_json("/tmp/definitely_does_not_exist_chitti.json").await;
    assert!(matches!(result, Err(PersistError::Io(_))));
}

#[tokio::test]
async fn test_special_characters_round_trip() {
    let harness = ChatHarness::new();
    harness.ask("तुम कौन हो").await;

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("devanagari.json");

    ConversationArchive::export(harness.store.as_ref())
        .await
        .unwrap()
        .save_json(&path)
        .await
        .unwrap();

    let loaded = ConversationArchive::load_json(&path).await.unwrap();
    assert_eq!(loaded.records[0].question, "तुम कौन हो");
}
