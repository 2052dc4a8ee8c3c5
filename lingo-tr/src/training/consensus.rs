//! Consensus arbitration over rater submissions
//!
//! A pure decision over an item's submission history, plus the
//! one-time promotion side effect when a resolution is reached. The
//! evaluator holds no state of its own; the idempotency marker lives
//! in the trainings row (`resolution` column), claimed with a
//! conditional write so re-evaluation never promotes twice.

use crate::classifier::{normalize_label, Classifier};
use crate::db::trainings::{
    self, RESOLUTION_CONFLICTED, RESOLUTION_RESOLVED,
};
use crate::error::{TrainError, TrainResult};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Arbitration outcome for a training item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsensusStatus {
    /// Fewer than `maxassignments` submissions recorded yet
    Pending,
    /// A strict majority agreed on this (normalized) label
    Resolved(String),
    /// Quota exhausted with no majority; flagged for manual review
    Conflicted,
}

/// Evaluate an item's submission history
///
/// Safe to invoke any number of times: an already-terminal item
/// returns its stored resolution without re-applying promotion.
pub async fn evaluate(
    pool: &SqlitePool,
    classifier: &Classifier,
    item_id: i64,
) -> TrainResult<ConsensusStatus> {
    let item = trainings::get_training(pool, item_id)
        .await?
        .ok_or(TrainError::NotFound)?;

    // Terminal items keep their stored resolution
    match item.resolution.as_deref() {
        Some(RESOLUTION_RESOLVED) => {
            return Ok(ConsensusStatus::Resolved(
                item.resolved_label.unwrap_or_default(),
            ));
        }
        Some(RESOLUTION_CONFLICTED) => return Ok(ConsensusStatus::Conflicted),
        _ => {}
    }

    let labels = trainings::submission_labels(pool, item_id).await?;
    if (labels.len() as i64) < item.max_assignments {
        debug!(
            id = item_id,
            submissions = labels.len(),
            quota = item.max_assignments,
            "Consensus pending"
        );
        return Ok(ConsensusStatus::Pending);
    }

    match majority_label(&labels) {
        Some(winner) => {
            // Only the caller that claims the terminal state promotes
            // the winning label into the model
            if trainings::claim_resolution(pool, item_id, RESOLUTION_RESOLVED, Some(winner.as_str()))
                .await?
            {
                classifier.train(&winner, &item.sentence).await?;
                info!(id = item_id, label = %winner, "Training item resolved");
            }
            Ok(ConsensusStatus::Resolved(winner))
        }
        None => {
            if trainings::claim_resolution(pool, item_id, RESOLUTION_CONFLICTED, None).await? {
                info!(id = item_id, "Training item conflicted, needs manual review");
            }
            Ok(ConsensusStatus::Conflicted)
        }
    }
}

/// Strict-majority winner among normalized labels, if any
///
/// `["a", "a", "b"]` resolves to `a`; three mutually distinct labels
/// have no winner.
fn majority_label(labels: &[String]) -> Option<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(normalize_label(label)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .find(|(_, count)| count * 2 > labels.len())
        .map(|(label, _)| label)
}
