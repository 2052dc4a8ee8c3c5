//! Trainer event types and EventBus
//!
//! Events describe observable transitions in the crowd-training loop
//! and are broadcast to SSE subscribers. Emission is fire-and-forget:
//! a slow or absent subscriber never blocks a submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events emitted by the trainer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrainerEvent {
    /// A new training item was queued for rating
    ItemQueued {
        id: i64,
        foreign_id: String,
        timestamp: DateTime<Utc>,
    },

    /// A rater's label was accepted and applied to the model
    SubmissionAccepted {
        id: i64,
        label: String,
        trained_count: i64,
        timestamp: DateTime<Utc>,
    },

    /// An item reached a majority resolution
    ItemResolved {
        id: i64,
        label: String,
        timestamp: DateTime<Utc>,
    },

    /// An item exhausted its quota without a majority
    ItemConflicted { id: i64, timestamp: DateTime<Utc> },
}

impl TrainerEvent {
    /// SSE event name for this variant
    pub fn event_type(&self) -> &'static str {
        match self {
            TrainerEvent::ItemQueued { .. } => "ItemQueued",
            TrainerEvent::SubmissionAccepted { .. } => "SubmissionAccepted",
            TrainerEvent::ItemResolved { .. } => "ItemResolved",
            TrainerEvent::ItemConflicted { .. } => "ItemConflicted",
        }
    }
}

/// Broadcast bus for trainer events
///
/// Thin wrapper over `tokio::sync::broadcast`: non-blocking publish,
/// any number of subscribers, lagged receivers drop old events.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<TrainerEvent>,
}

impl EventBus {
    /// Create a new bus with the given buffered capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<TrainerEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Send errors (no receivers) are ignored.
    pub fn emit(&self, event: TrainerEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_emitted_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(TrainerEvent::ItemResolved {
            id: 7,
            label: "book_flight".to_string(),
            timestamp: Utc::now(),
        });

        match rx.recv().await.unwrap() {
            TrainerEvent::ItemResolved { id, label, .. } => {
                assert_eq!(id, 7);
                assert_eq!(label, "book_flight");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn emit_without_subscribers_is_ok() {
        let bus = EventBus::new(4);
        bus.emit(TrainerEvent::ItemConflicted {
            id: 1,
            timestamp: Utc::now(),
        });
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = TrainerEvent::SubmissionAccepted {
            id: 3,
            label: "cancel".to_string(),
            trained_count: 2,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"SubmissionAccepted\""));
        assert!(json.contains("\"trained_count\":2"));
    }
}
