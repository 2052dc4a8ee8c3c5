//! lingo-tr library - crowd-training service
//!
//! Maps free-text utterances to intent labels with a continuously
//! trained classifier, and runs the crowd-labeling loop that feeds
//! it: low-confidence utterances are queued as training items, served
//! to raters at random, and folded into the model once enough
//! independent raters agree.

pub mod api;
pub mod classifier;
pub mod db;
pub mod error;
pub mod training;

pub use crate::classifier::Classifier;
pub use crate::error::{TrainError, TrainResult};

use axum::Router;
use lingo_common::events::EventBus;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (trainings + submissions)
    pub db: SqlitePool,
    /// The single shared classifier instance
    pub classifier: Arc<Classifier>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
}

impl AppState {
    pub fn new(db: SqlitePool, classifier: Arc<Classifier>, event_bus: EventBus) -> Self {
        Self {
            db,
            classifier,
            event_bus,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route(
            "/api/sentence.json",
            get(api::get_sentence).put(api::put_sentence),
        )
        .route("/api/training.json", post(api::post_training))
        .route("/api/classify.json", post(api::post_classify))
        .route("/events", get(api::event_stream))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
