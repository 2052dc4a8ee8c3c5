//! Error types for lingo-tr
//!
//! The training domain distinguishes expected control-flow outcomes
//! (an unknown item id, losing the assignment race) from real faults
//! (a failed model update, a database error). Expected outcomes are
//! never logged as errors.

use thiserror::Error;

/// Training domain errors
#[derive(Error, Debug)]
pub enum TrainError {
    /// The referenced training item does not exist (or nothing was
    /// eligible). Expected, not exceptional.
    #[error("not found")]
    NotFound,

    /// The item's assignment quota was already spent when the
    /// conditional increment ran. Expected under concurrency.
    #[error("training item already fully assigned")]
    AlreadyResolved,

    /// The classifier could not ingest a training example
    #[error("model update failed: {0}")]
    ModelUpdate(String),

    /// Invalid request content (empty label, blank sentence)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Database connection or query errors
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience Result type using TrainError
pub type TrainResult<T> = std::result::Result<T, TrainError>;
