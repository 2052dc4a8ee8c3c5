//! lingo-tr - Crowd-training microservice
//!
//! Serves training items to raters, folds their labels into the
//! shared classifier, and arbitrates consensus. One process, one
//! logical model instance.

use anyhow::Result;
use clap::Parser;
use lingo_common::{config, db};
use lingo_tr::{build_router, AppState, Classifier};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lingo-tr", about = "lingo crowd-training service")]
struct Args {
    /// Root folder holding the database and classifier snapshot
    #[arg(long)]
    root: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting lingo-tr (Crowd Trainer) v{}", env!("CARGO_PKG_VERSION"));

    // Root folder: CLI arg > LINGO_ROOT > config file > OS default
    let root_folder = config::resolve_root_folder(args.root.as_deref());
    config::ensure_root_folder(&root_folder)?;
    info!("Root folder: {}", root_folder.display());

    let db_path = config::database_path(&root_folder);
    let pool = db::init_database(&db_path).await?;
    info!("✓ Database ready");

    // Load the persisted model if a snapshot exists
    let snapshot = config::snapshot_path(&root_folder);
    let classifier = Arc::new(Classifier::load(&snapshot)?);

    let event_bus = lingo_common::events::EventBus::new(100);

    let state = AppState::new(pool, Arc::clone(&classifier), event_bus);
    let app = build_router(state);

    let port = config::resolve_port();
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("lingo-tr listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Optional flush at shutdown; training state also lives in the
    // submissions history, so a missed flush loses no ground truth
    classifier.flush(&snapshot).await?;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
