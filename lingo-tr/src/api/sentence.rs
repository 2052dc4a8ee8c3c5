//! Rater-facing sentence endpoints
//!
//! `GET /api/sentence.json` hands a rater one randomly sampled item
//! still short of its quota; `PUT /api/sentence.json` takes the
//! rater's confirmed label back. The GET is advisory only; the PUT
//! path owns the assignment race.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::ApiError;
use crate::db::TrainingItem;
use crate::training::{sampler, submission};
use crate::AppState;

/// Query parameters for sentence sampling
#[derive(Debug, Deserialize)]
pub struct SentenceQuery {
    /// Restrict sampling to this item id
    pub id: Option<i64>,
}

/// One sampled training item, in the rater wire format
#[derive(Debug, Serialize)]
pub struct SentenceResponse {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "ForeignID")]
    pub foreign_id: String,
    #[serde(rename = "Sentence")]
    pub sentence: String,
    #[serde(rename = "MaxAssignments")]
    pub max_assignments: i64,
}

impl From<TrainingItem> for SentenceResponse {
    fn from(item: TrainingItem) -> Self {
        Self {
            id: item.id,
            foreign_id: item.foreign_id,
            sentence: item.sentence,
            max_assignments: item.max_assignments,
        }
    }
}

/// A rater's label for a specific item; the `Sentence` field carries
/// the confirmed label
#[derive(Debug, Deserialize)]
pub struct TrainSentenceRequest {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Sentence")]
    pub sentence: String,
}

/// GET /api/sentence.json?id=<optional>
///
/// Returns one eligible item sampled uniformly at random, or an empty
/// object when nothing needs rating (a common, non-error outcome).
pub async fn get_sentence(
    State(state): State<AppState>,
    Query(query): Query<SentenceQuery>,
) -> Result<Response, ApiError> {
    match sampler::sample(&state.db, query.id).await? {
        Some(item) => Ok(Json(SentenceResponse::from(item)).into_response()),
        None => Ok(Json(json!({})).into_response()),
    }
}

/// PUT /api/sentence.json
///
/// Applies the rater's label: trains the model, claims an assignment
/// slot, and arbitrates consensus. Empty body on success; rejection
/// reasons surface as a `{ "Msg": ... }` payload.
pub async fn put_sentence(
    State(state): State<AppState>,
    Json(req): Json<TrainSentenceRequest>,
) -> Result<StatusCode, ApiError> {
    submission::submit(
        &state.db,
        &state.classifier,
        &state.event_bus,
        req.id,
        &req.sentence,
    )
    .await?;

    Ok(StatusCode::OK)
}
