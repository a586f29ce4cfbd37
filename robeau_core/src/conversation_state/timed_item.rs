//! Timed items - entries of the conversation state lists.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use robeau_graph::Definition;

/// The five named lists of the conversation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateList {
    Locks,
    Unlocks,
    Expectations,
    Primes,
    Initiations,
}

/// Returned when a list name does not match any of the five lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateListError {
    #[error("unknown conversation state list: \"{0}\"")]
    Unknown(String),
}

impl StateList {
    pub const ALL: [StateList; 5] = [
        StateList::Locks,
        StateList::Unlocks,
        StateList::Expectations,
        StateList::Primes,
        StateList::Initiations,
    ];

    /// Lists whose items simply disappear when their countdown ends.
    pub const LAPSING: [StateList; 4] = [
        StateList::Locks,
        StateList::Unlocks,
        StateList::Expectations,
        StateList::Primes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateList::Locks => "locks",
            StateList::Unlocks => "unlocks",
            StateList::Expectations => "expectations",
            StateList::Primes => "primes",
            StateList::Initiations => "initiations",
        }
    }

    /// Singular item kind, for log lines.
    pub fn item_kind(&self) -> &'static str {
        match self {
            StateList::Locks => "lock",
            StateList::Unlocks => "unlock",
            StateList::Expectations => "expectation",
            StateList::Primes => "prime",
            StateList::Initiations => "initiation",
        }
    }
}

impl From<Definition> for StateList {
    fn from(definition: Definition) -> Self {
        match definition {
            Definition::Locks => StateList::Locks,
            Definition::Unlocks => StateList::Unlocks,
            Definition::Primes => StateList::Primes,
            Definition::Expects => StateList::Expectations,
            Definition::Initiates => StateList::Initiations,
        }
    }
}

impl FromStr for StateList {
    type Err = StateListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateList::ALL
            .iter()
            .find(|list| list.as_str() == s)
            .copied()
            .ok_or_else(|| StateListError::Unknown(s.to_string()))
    }
}

impl std::fmt::Display for StateList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node key held in one of the state lists, with an optional countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedItem {
    pub list: StateList,
    pub node: String,
    /// Original duration. `None` = never expires.
    pub duration: Option<Duration>,
    /// Remaining time as of the last aging pass. `None` = never expires.
    pub time_left: Option<Duration>,
    pub started_at: Instant,
}

impl TimedItem {
    pub fn new(list: StateList, node: impl Into<String>, duration: Option<Duration>, now: Instant) -> Self {
        Self {
            list,
            node: node.into(),
            duration,
            time_left: duration,
            started_at: now,
        }
    }

    /// Restart the countdown with a new duration.
    pub fn refresh(&mut self, duration: Duration, now: Instant) {
        self.duration = Some(duration);
        self.time_left = Some(duration);
        self.started_at = now;
    }

    /// Recompute the remaining time from the wall-clock time elapsed since
    /// the item started.
    pub fn update_time_left(&mut self, now: Instant) {
        if let (Some(_), Some(duration)) = (self.time_left, self.duration) {
            let elapsed = now.saturating_duration_since(self.started_at);
            self.time_left = Some(duration.saturating_sub(elapsed));
        }
    }

    /// Whether the countdown has reached zero.
    pub fn is_expired(&self) -> bool {
        self.time_left == Some(Duration::ZERO)
    }

    pub fn is_permanent(&self) -> bool {
        self.time_left.is_none()
    }
}

impl std::fmt::Display for TimedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.time_left {
            Some(left) => write!(
                f,
                "{} \"{}\" ({:.1}s left)",
                self.list.item_kind(),
                self.node,
                left.as_secs_f64()
            ),
            None => write!(f, "{} \"{}\" (permanent)", self.list.item_kind(), self.node),
        }
    }
}
