//! Shared test utilities
//!
//! Each test gets its own file-backed database under a TempDir; the
//! TempDir must be kept alive for the duration of the test.

#![allow(dead_code)]

use lingo_common::{db, events::EventBus};
use lingo_tr::{AppState, Classifier};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

/// Create application state backed by a fresh temporary database
pub async fn create_test_state() -> (TempDir, AppState) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("lingo-test.db");
    let pool = db::init_database(&db_path)
        .await
        .expect("Should initialize test database");

    let state = AppState::new(pool, Arc::new(Classifier::new()), EventBus::new(64));
    (temp_dir, state)
}

/// Insert a training item and return its id
pub async fn seed_item(
    pool: &SqlitePool,
    foreign_id: &str,
    sentence: &str,
    max_assignments: i64,
) -> i64 {
    lingo_tr::db::trainings::insert_training(pool, foreign_id, sentence, max_assignments)
        .await
        .expect("Should insert training item")
}

/// Current trainedcount for an item
pub async fn trained_count(pool: &SqlitePool, id: i64) -> i64 {
    lingo_tr::db::trainings::get_training(pool, id)
        .await
        .expect("Should fetch training item")
        .expect("Item should exist")
        .trained_count
}
