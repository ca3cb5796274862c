//! QA tests for the chat service flow.
//!
//! Ask/persist/history round trips, feedback recording, the learning pass,
//! insights and stats, session clearing, and the API envelope.

use chitti_core::conversation::{ConversationStore, Feedback};
use chitti_core::service::{ApiResponse, ChatError, ChatRequest};
use chitti_core::testing::ChatHarness;
use uuid::Uuid;

// =============================================================================
// ASK AND PERSIST
// =============================================================================

#[tokio::test]
async fn test_ask_persists_one_record() {
    let harness = ChatHarness::new();
    let reply = harness.ask("who created you").await;

    assert_eq!(harness.store.count().await.unwrap(), 1);

    let stored = harness
        .store
        .get(reply.conversation_id)
        .await
        .unwrap()
        .expect("record was saved");
    assert_eq!(stored.question, "who created you");
    assert_eq!(stored.response, reply.response);
    assert_eq!(stored.confidence, reply.confidence);
    assert_eq!(stored.user_id, Some(harness.user_id));
    assert!(!stored.learned);
}

#[tokio::test]
async fn test_ask_trims_the_stored_question() {
    let harness = ChatHarness::new();
    let reply = harness.ask("   mummy   ").await;
    let stored = harness
        .store
        .get(reply.conversation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.question, "mummy");
}

#[tokio::test]
async fn test_history_is_newest_first() {
    let harness = ChatHarness::new();
    harness.ask("hello").await;
    harness.ask("who created you").await;

    let history = harness
        .service
        .history(harness.user_id, Some(&harness.session_id))
        .await
        .unwrap();

    assert_eq!(history.len(), 2);
    assert!(history[0].response.contains("ne banaya hai"));

    // Without a session filter the same two replies come back.
    let all = harness.service.history(harness.user_id, None).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_history_is_scoped_to_the_user() {
    let harness = ChatHarness::new();
    harness.ask("hello").await;

    let stranger = Uuid::new_v4();
    let history = harness.service.history(stranger, None).await.unwrap();
    assert!(history.is_empty());
}

// =============================================================================
// FEEDBACK AND LEARNING
// =============================================================================

#[tokio::test]
async fn test_feedback_is_recorded_with_comment() {
    let harness = ChatHarness::new();
    let reply = harness.ask("hello").await;

    harness
        .service
        .provide_feedback(reply.conversation_id, Feedback::Bad, Some("too generic"))
        .await
        .unwrap();

    let stored = harness
        .store
        .get(reply.conversation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.feedback, Some(Feedback::Bad));
    assert_eq!(
        stored.learning_notes.as_deref(),
        Some("Feedback: bad, Comment: too generic")
    );
}

#[tokio::test]
async fn test_feedback_on_unknown_conversation_fails() {
    let harness = ChatHarness::new();
    let err = harness
        .service
        .provide_feedback(Uuid::new_v4(), Feedback::Good, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::ConversationNotFound(_)));
}

#[tokio::test]
async fn test_learn_from_feedback_flips_only_negative_rows() {
    let harness = ChatHarness::new();
    harness.ask_with_feedback("hello", Feedback::Good).await;
    let bad = harness.ask_with_feedback("qqqq zzzz", Feedback::Bad).await;
    harness.ask("who created you").await;

    let flipped = harness.service.learn_from_feedback().await.unwrap();
    assert_eq!(flipped, 1);

    let learned = harness.store.get(bad.conversation_id).await.unwrap().unwrap();
    assert!(learned.learned);
    assert_eq!(
        learned.learning_notes.as_deref(),
        Some("Learned from negative feedback - need to improve response quality")
    );

    // A second pass finds nothing new.
    assert_eq!(harness.service.learn_from_feedback().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_learning_status() {
    let harness = ChatHarness::new();
    let reply = harness.ask("hello").await;

    harness
        .service
        .update_learning_status(reply.conversation_id, true, Some("reviewed".to_string()))
        .await
        .unwrap();

    let updated = harness
        .service
        .conversation(reply.conversation_id)
        .await
        .unwrap();
    assert!(updated.learned);
    assert_eq!(updated.learning_notes.as_deref(), Some("reviewed"));
}

// =============================================================================
// INSIGHTS, STATS AND SEARCH
// =============================================================================

#[tokio::test]
async fn test_learning_insights() {
    let harness = ChatHarness::new();

    let empty = harness.service.learning_insights().await.unwrap();
    assert_eq!(empty.total_conversations, 0);
    assert_eq!(empty.learning_rate, 0.0);

    harness.ask_with_feedback("qqqq", Feedback::Bad).await;
    harness.ask("hello").await;
    harness.service.learn_from_feedback().await.unwrap();

    let insights = harness.service.learning_insights().await.unwrap();
    assert_eq!(insights.total_conversations, 2);
    assert_eq!(insights.learned_conversations, 1);
    assert_eq!(insights.learning_rate, 0.5);
}

#[tokio::test]
async fn test_performance_stats_average_confidence() {
    let harness = ChatHarness::new();
    harness.ask("who created you").await; // 0.95
    harness.ask("qqqq zzzz").await; // 0.50

    let stats = harness.service.performance_stats().await.unwrap();
    assert_eq!(stats.total_conversations, 2);
    assert!((stats.average_confidence - 0.725).abs() < 1e-9);
}

#[tokio::test]
async fn test_similar_questions() {
    let harness = ChatHarness::new();
    harness.ask("who created you").await;
    harness.ask("hello").await;

    let similar = harness.service.similar_questions("created").await.unwrap();
    assert_eq!(similar, vec!["who created you".to_string()]);
}

#[tokio::test]
async fn test_clear_session() {
    let harness = ChatHarness::new();
    harness.ask("hello").await;
    harness.ask("bye").await;

    let removed = harness.service.clear_session(&harness.session_id).await.unwrap();
    assert_eq!(removed, 2);
    assert_eq!(harness.store.count().await.unwrap(), 0);
}

// =============================================================================
// API ENVELOPE
// =============================================================================

#[tokio::test]
async fn test_envelope_serializes_reply() {
    let harness = ChatHarness::new();
    let reply = harness.ask("who created you").await;

    let envelope = ApiResponse::success("Response generated successfully", reply);
    let json = serde_json::to_value(&envelope).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["language"], "english");
    assert_eq!(json["data"]["confidence"], 0.95);
}
