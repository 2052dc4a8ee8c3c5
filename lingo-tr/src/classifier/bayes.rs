//! Multinomial naive-Bayes text model
//!
//! Per-label token frequency tables with Laplace smoothing. Training
//! is monotonic: counters only increase, there is no un-train. All
//! maps are BTree-backed so classification is deterministic for a
//! given model state regardless of insertion order.

use crate::error::{TrainError, TrainResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Classification outcome: the top-ranked label and how far ahead of
/// the runner-up it is
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    /// Relative certainty in 0.0..=1.0; 1.0 when only one label exists
    pub confidence: f64,
}

/// Frequency statistics for a single label
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LabelStats {
    token_counts: BTreeMap<String, u64>,
    total_tokens: u64,
    examples: u64,
}

/// Token frequency model over all labels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BayesModel {
    labels: BTreeMap<String, LabelStats>,
    vocabulary: BTreeSet<String>,
}

impl BayesModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one labeled example
    ///
    /// The label is normalized (trim + lowercase) before use. Fails
    /// when the normalized label is empty or the text has no tokens;
    /// callers must not count a failed update against an item.
    pub fn train(&mut self, label: &str, text: &str) -> TrainResult<()> {
        let label = normalize_label(label);
        if label.is_empty() {
            return Err(TrainError::ModelUpdate("empty label".to_string()));
        }
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(TrainError::ModelUpdate(format!(
                "no trainable tokens in {:?}",
                text
            )));
        }

        let stats = self.labels.entry(label).or_default();
        for token in tokens {
            *stats.token_counts.entry(token.clone()).or_insert(0) += 1;
            stats.total_tokens += 1;
            self.vocabulary.insert(token);
        }
        stats.examples += 1;
        Ok(())
    }

    /// Rank the text against all known labels
    ///
    /// Returns `None` when no label has been trained yet. Confidence
    /// is the posterior gap between the top label and the runner-up
    /// after log-sum-exp normalization.
    pub fn classify(&self, text: &str) -> Option<Classification> {
        if self.labels.is_empty() {
            return None;
        }

        let tokens = tokenize(text);
        let total_examples: u64 = self.labels.values().map(|s| s.examples).sum();
        let vocab_size = self.vocabulary.len() as f64;

        // Log-posterior per label; BTreeMap order makes ties resolve
        // to the lexicographically smallest label
        let scores: Vec<(&str, f64)> = self
            .labels
            .iter()
            .map(|(label, stats)| {
                let prior = (stats.examples as f64 / total_examples as f64).ln();
                let likelihood: f64 = tokens
                    .iter()
                    .map(|token| {
                        let count = stats.token_counts.get(token).copied().unwrap_or(0) as f64;
                        ((count + 1.0) / (stats.total_tokens as f64 + vocab_size)).ln()
                    })
                    .sum();
                (label.as_str(), prior + likelihood)
            })
            .collect();

        let (top_label, top_score) = scores
            .iter()
            .fold(None::<(&str, f64)>, |best, &(label, score)| match best {
                Some((_, best_score)) if score <= best_score => best,
                _ => Some((label, score)),
            })?;

        if scores.len() == 1 {
            return Some(Classification {
                label: top_label.to_string(),
                confidence: 1.0,
            });
        }

        // Normalize via log-sum-exp so the gap is a probability mass
        let max_score = top_score;
        let denom: f64 = scores.iter().map(|&(_, s)| (s - max_score).exp()).sum();
        let mut posteriors: Vec<(&str, f64)> = scores
            .iter()
            .map(|&(label, s)| (label, (s - max_score).exp() / denom))
            .collect();
        posteriors.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });

        let confidence = (posteriors[0].1 - posteriors[1].1).clamp(0.0, 1.0);
        Some(Classification {
            label: posteriors[0].0.to_string(),
            confidence,
        })
    }

    /// Total token observations recorded for a label (0 if unknown)
    ///
    /// Exposed so callers can observe whether a training pass changed
    /// the model, e.g. to verify promotion ran exactly once.
    pub fn label_weight(&self, label: &str) -> u64 {
        self.labels
            .get(&normalize_label(label))
            .map(|s| s.total_tokens)
            .unwrap_or(0)
    }

    /// Number of distinct trained labels
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

/// Canonical label form used for training, consensus, and lookups
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Lowercased alphanumeric word split
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}
