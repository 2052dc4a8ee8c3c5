//! Submission handler
//!
//! Applies a rater's label in the order the bookkeeping requires:
//! teach the model, then claim an assignment slot with the single
//! conditional increment, then record the label and arbitrate
//! consensus. A failed model update never consumes a slot, and a lost
//! slot race never evaluates consensus.

use crate::classifier::{normalize_label, Classifier};
use crate::db::trainings;
use crate::error::{TrainError, TrainResult};
use crate::training::consensus::{self, ConsensusStatus};
use chrono::Utc;
use lingo_common::events::{EventBus, TrainerEvent};
use sqlx::SqlitePool;
use tracing::debug;

/// Apply one rater submission to a training item
///
/// Every accepted call increments `trainedcount` exactly once; the
/// conditional claim guarantees the count never exceeds
/// `maxassignments` no matter how many raters race. Even a submission
/// that loses the race has already taught the model; a human judgment
/// is never discarded.
pub async fn submit(
    pool: &SqlitePool,
    classifier: &Classifier,
    events: &EventBus,
    item_id: i64,
    provided_label: &str,
) -> TrainResult<ConsensusStatus> {
    let label = normalize_label(provided_label);
    if label.is_empty() {
        return Err(TrainError::InvalidInput("empty label".to_string()));
    }

    let item = trainings::get_training(pool, item_id)
        .await?
        .ok_or(TrainError::NotFound)?;

    // Model update first; on failure the slot must stay unclaimed
    classifier.train(&label, &item.sentence).await?;

    if !trainings::claim_assignment(pool, item_id).await? {
        // Lost the assignment race; normal control flow, not a fault
        debug!(id = item_id, "Submission rejected, quota already spent");
        return Err(TrainError::AlreadyResolved);
    }

    trainings::record_submission(pool, item_id, &label).await?;

    // Re-read for the post-claim count; the pre-claim copy may be
    // stale under concurrent submissions
    let trained_count = trainings::get_training(pool, item_id)
        .await?
        .map(|i| i.trained_count)
        .unwrap_or(item.trained_count + 1);

    events.emit(TrainerEvent::SubmissionAccepted {
        id: item_id,
        label: label.clone(),
        trained_count,
        timestamp: Utc::now(),
    });

    let status = consensus::evaluate(pool, classifier, item_id).await?;
    match &status {
        ConsensusStatus::Resolved(winner) => events.emit(TrainerEvent::ItemResolved {
            id: item_id,
            label: winner.clone(),
            timestamp: Utc::now(),
        }),
        ConsensusStatus::Conflicted => events.emit(TrainerEvent::ItemConflicted {
            id: item_id,
            timestamp: Utc::now(),
        }),
        ConsensusStatus::Pending => {}
    }

    Ok(status)
}
