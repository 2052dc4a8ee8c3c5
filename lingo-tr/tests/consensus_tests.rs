//! Consensus arbitration integration tests
//!
//! Drives full submission sequences through the training core and
//! checks the resolution bookkeeping: majority promotion, conflict
//! flagging, and idempotent re-evaluation.

mod helpers;

use helpers::{create_test_state, seed_item};
use lingo_tr::db::trainings;
use lingo_tr::training::consensus::{self, ConsensusStatus};
use lingo_tr::training::submission;
use lingo_tr::AppState;

async fn submit(state: &AppState, id: i64, label: &str) -> ConsensusStatus {
    submission::submit(&state.db, &state.classifier, &state.event_bus, id, label)
        .await
        .expect("Submission should be accepted")
}

#[tokio::test]
async fn majority_of_three_resolves_the_item() {
    let (_tmp, state) = create_test_state().await;
    let id = seed_item(&state.db, "ctx", "book me a flight to boston", 3).await;

    assert_eq!(submit(&state, id, "book_flight").await, ConsensusStatus::Pending);
    assert_eq!(submit(&state, id, "book_flight").await, ConsensusStatus::Pending);
    assert_eq!(
        submit(&state, id, "cancel").await,
        ConsensusStatus::Resolved("book_flight".to_string())
    );

    // Resolution is a status change, not a removal
    let item = trainings::get_training(&state.db, id).await.unwrap().unwrap();
    assert_eq!(item.resolution.as_deref(), Some("resolved"));
    assert_eq!(item.resolved_label.as_deref(), Some("book_flight"));
    assert_eq!(item.trained_count, 3);
}

#[tokio::test]
async fn all_distinct_labels_conflict() {
    let (_tmp, state) = create_test_state().await;
    let id = seed_item(&state.db, "ctx", "play some jazz for me", 3).await;

    assert_eq!(submit(&state, id, "a").await, ConsensusStatus::Pending);
    assert_eq!(submit(&state, id, "b").await, ConsensusStatus::Pending);
    assert_eq!(submit(&state, id, "c").await, ConsensusStatus::Conflicted);

    let item = trainings::get_training(&state.db, id).await.unwrap().unwrap();
    assert_eq!(item.resolution.as_deref(), Some("conflicted"));
    assert_eq!(item.resolved_label, None);
}

#[tokio::test]
async fn consensus_counts_normalized_labels() {
    let (_tmp, state) = create_test_state().await;
    let id = seed_item(&state.db, "ctx", "cancel my reservation now", 3).await;

    submit(&state, id, "Cancel ").await;
    submit(&state, id, "  CANCEL").await;
    let status = submit(&state, id, "book_flight").await;
    assert_eq!(status, ConsensusStatus::Resolved("cancel".to_string()));
}

#[tokio::test]
async fn reevaluation_is_idempotent() {
    let (_tmp, state) = create_test_state().await;
    let id = seed_item(&state.db, "ctx", "book me a flight to boston", 3).await;

    submit(&state, id, "book_flight").await;
    submit(&state, id, "book_flight").await;
    let status = submit(&state, id, "cancel").await;
    assert_eq!(status, ConsensusStatus::Resolved("book_flight".to_string()));

    let weight_after_resolve = state.classifier.label_weight("book_flight").await;

    // Re-evaluating must return the stored resolution without
    // promoting a second time
    let again = consensus::evaluate(&state.db, &state.classifier, id)
        .await
        .unwrap();
    assert_eq!(again, ConsensusStatus::Resolved("book_flight".to_string()));
    assert_eq!(
        state.classifier.label_weight("book_flight").await,
        weight_after_resolve
    );

    let once_more = consensus::evaluate(&state.db, &state.classifier, id)
        .await
        .unwrap();
    assert_eq!(once_more, ConsensusStatus::Resolved("book_flight".to_string()));
}

#[tokio::test]
async fn conflicted_item_is_not_requeued() {
    let (_tmp, state) = create_test_state().await;
    let id = seed_item(&state.db, "ctx", "turn on the kitchen lights", 3).await;

    submit(&state, id, "a").await;
    submit(&state, id, "b").await;
    submit(&state, id, "c").await;

    // Quota exhausted: no longer sampleable, further raters rejected
    let sampled = lingo_tr::training::sampler::sample(&state.db, Some(id))
        .await
        .unwrap();
    assert!(sampled.is_none());

    let late = submission::submit(&state.db, &state.classifier, &state.event_bus, id, "d").await;
    assert!(matches!(late, Err(lingo_tr::error::TrainError::AlreadyResolved)));
}

#[tokio::test]
async fn promotion_reinforces_the_winning_label() {
    let (_tmp, state) = create_test_state().await;
    let id = seed_item(&state.db, "ctx", "book me a flight to boston", 3).await;

    submit(&state, id, "book_flight").await;
    let weight_after_two_trains = {
        submit(&state, id, "book_flight").await;
        state.classifier.label_weight("book_flight").await
    };

    submit(&state, id, "cancel").await;

    // Resolution re-trains the winner once as a confirmed example
    let final_weight = state.classifier.label_weight("book_flight").await;
    assert!(final_weight > weight_after_two_trains);
}

#[tokio::test]
async fn quota_below_majority_still_arbitrates() {
    // maxassignments=1: a single submission is a unanimous majority
    let (_tmp, state) = create_test_state().await;
    let id = seed_item(&state.db, "ctx", "what time is it", 1).await;

    let status = submit(&state, id, "smalltalk").await;
    assert_eq!(status, ConsensusStatus::Resolved("smalltalk".to_string()));
}
