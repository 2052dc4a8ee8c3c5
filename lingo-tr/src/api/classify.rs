//! Dispatcher-facing classification endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::error::TrainError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(rename = "Text")]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

/// POST /api/classify.json
///
/// Classify free text against the current model. The caller compares
/// the confidence against its own threshold and queues a training
/// item when the score is too low. 404 until at least one label has
/// been trained.
pub async fn post_classify(
    State(state): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let result = state
        .classifier
        .classify(&req.text)
        .await
        .ok_or(TrainError::NotFound)?;

    Ok(Json(ClassifyResponse {
        label: result.label,
        confidence: result.confidence,
    }))
}
