//! Reserved marker nodes.
//!
//! These texts must match the store content exactly. They are the protocol
//! between the engine and the script author, not ordinary dialogue.

use serde::{Deserialize, Serialize};

/// Marker nodes with engine-defined meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// Processed (as SYSTEM) after a batch of definitions set expectations.
    ExpectationsSet,
    /// Processed (as SYSTEM) when user input meets a pending expectation.
    ExpectationsSuccess,
    /// Queried in place of user input that misses pending expectations.
    ExpectationsFailure,
    /// Reaching this node clears the expectations list.
    ResetExpectations,
}

impl Marker {
    pub const ALL: [Marker; 4] = [
        Marker::ExpectationsSet,
        Marker::ExpectationsSuccess,
        Marker::ExpectationsFailure,
        Marker::ResetExpectations,
    ];

    pub fn text(&self) -> &'static str {
        match self {
            Marker::ExpectationsSet => "EXPECTATIONS SET",
            Marker::ExpectationsSuccess => "EXPECTATIONS SUCCESS",
            Marker::ExpectationsFailure => "EXPECTATIONS FAILURE",
            Marker::ResetExpectations => "RESET EXPECTATIONS",
        }
    }

    /// Recognize a marker by its exact store text.
    pub fn from_text(text: &str) -> Option<Marker> {
        Marker::ALL.iter().find(|m| m.text() == text).copied()
    }

    /// Whether a node text is reserved vocabulary.
    pub fn is_reserved(text: &str) -> bool {
        Marker::from_text(text).is_some()
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}
