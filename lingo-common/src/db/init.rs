//! Database bootstrap: connection pool, pragmas, and schema creation

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_pragmas(&pool).await?;

    // Schema creation is idempotent, applied on every startup
    create_trainings_table(&pool).await?;
    create_submissions_table(&pool).await?;

    Ok(pool)
}

/// Apply connection pragmas required for concurrent raters
async fn configure_pragmas(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL allows concurrent readers with one writer; the submission
    // path serializes on the single conditional counter update
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    Ok(())
}

/// Create the trainings table
///
/// One row per queued utterance awaiting rater labels. `trainedcount`
/// never exceeds `maxassignments`; the guard lives in the conditional
/// increment at submission time. `resolution` is NULL until the item
/// reaches a terminal consensus state.
pub async fn create_trainings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS trainings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            foreignid TEXT NOT NULL,
            sentence TEXT NOT NULL,
            maxassignments INTEGER NOT NULL DEFAULT 3,
            trainedcount INTEGER NOT NULL DEFAULT 0,
            resolution TEXT,
            resolvedlabel TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the submissions table
///
/// Ordered per-item label history, at most `maxassignments` rows per
/// training item (insertion is gated by the counter claim).
pub async fn create_submissions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            trainingid INTEGER NOT NULL REFERENCES trainings(id),
            label TEXT NOT NULL,
            submittedat TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_submissions_trainingid ON submissions(trainingid)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
