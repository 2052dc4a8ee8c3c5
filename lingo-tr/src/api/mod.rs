//! HTTP API handlers for lingo-tr
//!
//! Handlers translate between the wire format and the typed training
//! core. Domain errors stay typed until this boundary, where they are
//! serialized to a `{ "Msg": ... }` payload with a matching status.

pub mod classify;
pub mod health;
pub mod sentence;
pub mod sse;
pub mod training;

pub use classify::post_classify;
pub use health::health_routes;
pub use sentence::{get_sentence, put_sentence};
pub use sse::event_stream;
pub use training::post_training;

use crate::error::TrainError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

/// Structured error payload returned on any non-200 response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "Msg")]
    pub msg: String,
}

/// Transport-layer wrapper mapping TrainError onto HTTP responses
#[derive(Debug)]
pub struct ApiError(pub TrainError);

impl From<TrainError> for ApiError {
    fn from(err: TrainError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self.0 {
            // Expected control flow under concurrency, not faults
            TrainError::NotFound => {
                debug!("API: {}", self.0);
                (StatusCode::NOT_FOUND, self.0.to_string())
            }
            TrainError::AlreadyResolved => {
                debug!("API: {}", self.0);
                (StatusCode::CONFLICT, self.0.to_string())
            }
            TrainError::InvalidInput(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string())
            }
            TrainError::ModelUpdate(_) => {
                error!("API: {}", self.0);
                (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
            }
            TrainError::Database(e) => {
                error!("API: database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal database error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { msg })).into_response()
    }
}
