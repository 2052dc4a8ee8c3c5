//! Advisory item sampler
//!
//! Selects one eligible training item uniformly at random, optionally
//! pinned to a specific id. Sampling has no side effects and makes no
//! exclusivity promise: an item handed to one rater may be handed to
//! another a moment later. The assignment quota is enforced at
//! submission time only, so stale reads here are harmless.

use crate::db::trainings;
use crate::db::TrainingItem;
use crate::error::TrainResult;
use sqlx::SqlitePool;
use tracing::debug;

/// Sample one eligible item, or `None` when nothing needs rating
pub async fn sample(pool: &SqlitePool, filter_id: Option<i64>) -> TrainResult<Option<TrainingItem>> {
    let item = trainings::sample_eligible(pool, filter_id).await?;
    match &item {
        Some(item) => debug!(id = item.id, "Sampled training item"),
        None => debug!(?filter_id, "No eligible training item"),
    }
    Ok(item)
}
