//! Events the engine reports to whoever drives the conversation.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Externally observable results of node processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A node was activated and should be spoken or shown.
    Output { text: String },

    /// A user prompt had no edges in the store.
    NotUnderstood { text: String },

    /// User input matched a pending expectation.
    ExpectationsMet { text: String },

    /// User input missed every pending expectation.
    ExpectationsFailed { text: String },
}

impl EngineEvent {
    pub fn text(&self) -> &str {
        match self {
            EngineEvent::Output { text }
            | EngineEvent::NotUnderstood { text }
            | EngineEvent::ExpectationsMet { text }
            | EngineEvent::ExpectationsFailed { text } => text,
        }
    }
}

pub type EventSender = UnboundedSender<EngineEvent>;
pub type EventReceiver = UnboundedReceiver<EngineEvent>;

/// Create a channel for engine events.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
