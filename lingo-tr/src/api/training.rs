//! Training item creation
//!
//! The command dispatcher queues an utterance here when a
//! classification comes back below its confidence threshold.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ApiError;
use crate::db::trainings;
use crate::error::TrainError;
use crate::AppState;
use lingo_common::events::TrainerEvent;

/// Default rater quota when the caller does not specify one
const DEFAULT_MAX_ASSIGNMENTS: i64 = 3;

#[derive(Debug, Deserialize)]
pub struct CreateTrainingRequest {
    #[serde(rename = "ForeignID")]
    pub foreign_id: String,
    #[serde(rename = "Sentence")]
    pub sentence: String,
    #[serde(rename = "MaxAssignments")]
    pub max_assignments: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreateTrainingResponse {
    #[serde(rename = "ID")]
    pub id: i64,
}

/// POST /api/training.json
///
/// Queue a new training item for rating.
pub async fn post_training(
    State(state): State<AppState>,
    Json(req): Json<CreateTrainingRequest>,
) -> Result<Json<CreateTrainingResponse>, ApiError> {
    if req.sentence.trim().is_empty() {
        return Err(TrainError::InvalidInput("empty sentence".to_string()).into());
    }
    let max_assignments = req.max_assignments.unwrap_or(DEFAULT_MAX_ASSIGNMENTS);
    if max_assignments < 1 {
        return Err(
            TrainError::InvalidInput("maxassignments must be at least 1".to_string()).into(),
        );
    }

    let id = trainings::insert_training(&state.db, &req.foreign_id, &req.sentence, max_assignments)
        .await?;
    info!(id, foreign_id = %req.foreign_id, "Queued training item");

    state.event_bus.emit(TrainerEvent::ItemQueued {
        id,
        foreign_id: req.foreign_id,
        timestamp: Utc::now(),
    });

    Ok(Json(CreateTrainingResponse { id }))
}
