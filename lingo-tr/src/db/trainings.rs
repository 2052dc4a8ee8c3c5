//! Training item queries
//!
//! The trainings table is the authoritative assignment ledger. The
//! only write that can over-assign an item is the counter increment,
//! and that is issued as a single conditional UPDATE; everything else
//! here is plain reads and inserts.

use crate::error::TrainResult;
use sqlx::SqlitePool;

/// One queued utterance awaiting rater labels
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrainingItem {
    pub id: i64,
    #[sqlx(rename = "foreignid")]
    pub foreign_id: String,
    pub sentence: String,
    #[sqlx(rename = "maxassignments")]
    pub max_assignments: i64,
    #[sqlx(rename = "trainedcount")]
    pub trained_count: i64,
    pub resolution: Option<String>,
    #[sqlx(rename = "resolvedlabel")]
    pub resolved_label: Option<String>,
}

/// Terminal resolution markers stored in `trainings.resolution`
pub const RESOLUTION_RESOLVED: &str = "resolved";
pub const RESOLUTION_CONFLICTED: &str = "conflicted";

/// Queue a new training item, returning its store-assigned id
pub async fn insert_training(
    pool: &SqlitePool,
    foreign_id: &str,
    sentence: &str,
    max_assignments: i64,
) -> TrainResult<i64> {
    let result = sqlx::query(
        "INSERT INTO trainings (foreignid, sentence, maxassignments) VALUES (?, ?, ?)",
    )
    .bind(foreign_id)
    .bind(sentence)
    .bind(max_assignments)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Fetch a training item by id
pub async fn get_training(pool: &SqlitePool, id: i64) -> TrainResult<Option<TrainingItem>> {
    let item = sqlx::query_as::<_, TrainingItem>(
        "SELECT id, foreignid, sentence, maxassignments, trainedcount, resolution, resolvedlabel
         FROM trainings WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

/// Sample one eligible item uniformly at random
///
/// Eligible means `trainedcount < maxassignments`; `filter_id`
/// restricts to a single item. Returns `None` when nothing is
/// eligible (an expected outcome). Sampling never claims the item;
/// two raters may legitimately see the same one and race at
/// submission time.
pub async fn sample_eligible(
    pool: &SqlitePool,
    filter_id: Option<i64>,
) -> TrainResult<Option<TrainingItem>> {
    let item = match filter_id {
        Some(id) => {
            sqlx::query_as::<_, TrainingItem>(
                "SELECT id, foreignid, sentence, maxassignments, trainedcount, resolution, resolvedlabel
                 FROM trainings
                 WHERE trainedcount < maxassignments AND id = ?
                 ORDER BY RANDOM() LIMIT 1",
            )
            .bind(id)
            .fetch_optional(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, TrainingItem>(
                "SELECT id, foreignid, sentence, maxassignments, trainedcount, resolution, resolvedlabel
                 FROM trainings
                 WHERE trainedcount < maxassignments
                 ORDER BY RANDOM() LIMIT 1",
            )
            .fetch_optional(pool)
            .await?
        }
    };

    Ok(item)
}

/// Atomically claim one assignment slot
///
/// The check and the increment are a single conditional UPDATE, so
/// under arbitrary concurrency exactly `maxassignments` callers ever
/// see `true`. Returns `false` when the quota was already spent or
/// the id does not exist; callers distinguish the two with
/// `get_training`.
pub async fn claim_assignment(pool: &SqlitePool, id: i64) -> TrainResult<bool> {
    let result = sqlx::query(
        "UPDATE trainings SET trainedcount = trainedcount + 1
         WHERE id = ? AND trainedcount < maxassignments",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Append a rater's label to the item's submission history
pub async fn record_submission(pool: &SqlitePool, id: i64, label: &str) -> TrainResult<()> {
    sqlx::query("INSERT INTO submissions (trainingid, label, submittedat) VALUES (?, ?, ?)")
        .bind(id)
        .bind(label)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(pool)
        .await?;

    Ok(())
}

/// Ordered submission history for an item
pub async fn submission_labels(pool: &SqlitePool, id: i64) -> TrainResult<Vec<String>> {
    let labels = sqlx::query_scalar::<_, String>(
        "SELECT label FROM submissions WHERE trainingid = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(labels)
}

/// Claim the terminal resolution state for an item
///
/// Conditional on `resolution IS NULL`, so exactly one caller ever
/// transitions the item; that caller is responsible for the one-time
/// promotion side effect. Returns `false` when the item was already
/// terminal.
pub async fn claim_resolution(
    pool: &SqlitePool,
    id: i64,
    resolution: &str,
    resolved_label: Option<&str>,
) -> TrainResult<bool> {
    let result = sqlx::query(
        "UPDATE trainings SET resolution = ?, resolvedlabel = ?
         WHERE id = ? AND resolution IS NULL",
    )
    .bind(resolution)
    .bind(resolved_label)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
