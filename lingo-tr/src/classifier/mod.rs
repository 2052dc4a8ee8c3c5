//! Shared classifier service
//!
//! One logical model instance for the whole process, owned explicitly
//! and injected through `AppState` rather than reached as ambient
//! state. The frequency tables sit behind an async RwLock: `classify`
//! runs under the read lock (concurrent with other reads), `train`
//! takes the write lock, so a reader never observes a half-applied
//! update.

mod bayes;

pub use bayes::{normalize_label, BayesModel, Classification};

use crate::error::TrainResult;
use lingo_common::{Error, Result};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;

/// Lock-guarded handle around the Bayes model
pub struct Classifier {
    model: RwLock<BayesModel>,
}

impl Classifier {
    /// Create an empty classifier
    pub fn new() -> Self {
        Self {
            model: RwLock::new(BayesModel::new()),
        }
    }

    /// Load the persisted snapshot if one exists, otherwise start
    /// with an empty model
    pub fn load(snapshot: &Path) -> Result<Self> {
        if !snapshot.exists() {
            info!("No classifier snapshot at {}, starting empty", snapshot.display());
            return Ok(Self::new());
        }

        let json = std::fs::read_to_string(snapshot)?;
        let model: BayesModel = serde_json::from_str(&json)
            .map_err(|e| Error::Internal(format!("corrupt classifier snapshot: {}", e)))?;
        info!(
            "Loaded classifier snapshot: {} labels from {}",
            model.label_count(),
            snapshot.display()
        );
        Ok(Self {
            model: RwLock::new(model),
        })
    }

    /// Persist the current model state as a JSON snapshot
    ///
    /// Safe to call at any time; normally invoked once at shutdown.
    pub async fn flush(&self, snapshot: &Path) -> Result<()> {
        let json = {
            let model = self.model.read().await;
            serde_json::to_string(&*model)
                .map_err(|e| Error::Internal(format!("serialize classifier: {}", e)))?
        };
        std::fs::write(snapshot, json)?;
        info!("Flushed classifier snapshot to {}", snapshot.display());
        Ok(())
    }

    /// Apply one labeled example to the model
    pub async fn train(&self, label: &str, text: &str) -> TrainResult<()> {
        self.model.write().await.train(label, text)
    }

    /// Classify text against the current model state
    ///
    /// `None` means the model has no trained labels yet.
    pub async fn classify(&self, text: &str) -> Option<Classification> {
        self.model.read().await.classify(text)
    }

    /// Total token observations for a label (see `BayesModel::label_weight`)
    pub async fn label_weight(&self, label: &str) -> u64 {
        self.model.read().await.label_weight(label)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn train_then_classify() {
        let classifier = Classifier::new();
        classifier.train("weather", "what is the weather").await.unwrap();
        classifier.train("cancel", "cancel my order").await.unwrap();

        let result = classifier.classify("weather today").await.unwrap();
        assert_eq!(result.label, "weather");
    }

    #[tokio::test]
    async fn flush_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("classifier.json");

        let classifier = Classifier::new();
        classifier.train("greeting", "hello there friend").await.unwrap();
        classifier.flush(&snapshot).await.unwrap();

        let restored = Classifier::load(&snapshot).unwrap();
        assert_eq!(restored.label_weight("greeting").await, 3);
    }

    #[tokio::test]
    async fn load_missing_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = Classifier::load(&dir.path().join("absent.json")).unwrap();
        assert!(classifier.classify("anything").await.is_none());
    }
}
