//! The relationship taxonomy.
//!
//! Every edge in the script carries one of twelve relationship types, split
//! into three families. The family is decided once, when the raw type string
//! coming from the store is parsed.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Activation relationships, declared in priority order.
///
/// The derived ordering is the resolution priority: `Checks` is tried first,
/// `Defaults` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Activation {
    Checks,
    /// Fires only when the end node is unlocked or primed.
    Attempts,
    Triggers,
    Defaults,
}

impl Activation {
    pub const PRIORITY: [Activation; 4] = [
        Activation::Checks,
        Activation::Attempts,
        Activation::Triggers,
        Activation::Defaults,
    ];
}

/// Definition relationships write timed items into the conversation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Definition {
    Locks,
    Unlocks,
    Primes,
    Expects,
    Initiates,
}

impl Definition {
    pub const ORDER: [Definition; 5] = [
        Definition::Locks,
        Definition::Unlocks,
        Definition::Primes,
        Definition::Expects,
        Definition::Initiates,
    ];
}

/// Modification relationships undo previously defined state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modification {
    Disables,
    /// Reserved. Accepted from the store but never acted upon.
    Delays,
    Reverts,
}

/// A relationship type tagged with its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    Activation(Activation),
    Definition(Definition),
    Modification(Modification),
}

impl Relationship {
    pub const ALL: [Relationship; 12] = [
        Relationship::Activation(Activation::Checks),
        Relationship::Activation(Activation::Attempts),
        Relationship::Activation(Activation::Triggers),
        Relationship::Activation(Activation::Defaults),
        Relationship::Definition(Definition::Locks),
        Relationship::Definition(Definition::Unlocks),
        Relationship::Definition(Definition::Primes),
        Relationship::Definition(Definition::Expects),
        Relationship::Definition(Definition::Initiates),
        Relationship::Modification(Modification::Disables),
        Relationship::Modification(Modification::Delays),
        Relationship::Modification(Modification::Reverts),
    ];

    /// The spelling used by the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Activation(Activation::Checks) => "CHECKS",
            Relationship::Activation(Activation::Attempts) => "ATTEMPTS",
            Relationship::Activation(Activation::Triggers) => "TRIGGERS",
            Relationship::Activation(Activation::Defaults) => "DEFAULTS",
            Relationship::Definition(Definition::Locks) => "LOCKS",
            Relationship::Definition(Definition::Unlocks) => "UNLOCKS",
            Relationship::Definition(Definition::Primes) => "PRIMES",
            Relationship::Definition(Definition::Expects) => "EXPECTS",
            Relationship::Definition(Definition::Initiates) => "INITIATES",
            Relationship::Modification(Modification::Disables) => "DISABLES",
            Relationship::Modification(Modification::Delays) => "DELAYS",
            Relationship::Modification(Modification::Reverts) => "REVERTS",
        }
    }
}

impl From<Activation> for Relationship {
    fn from(kind: Activation) -> Self {
        Relationship::Activation(kind)
    }
}

impl From<Definition> for Relationship {
    fn from(kind: Definition) -> Self {
        Relationship::Definition(kind)
    }
}

impl From<Modification> for Relationship {
    fn from(kind: Modification) -> Self {
        Relationship::Modification(kind)
    }
}

/// Returned when the store hands back a relationship type outside the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown relationship type: {0}")]
pub struct UnknownRelationship(pub String);

impl FromStr for Relationship {
    type Err = UnknownRelationship;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relationship::ALL
            .iter()
            .find(|rel| rel.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownRelationship(s.to_string()))
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
