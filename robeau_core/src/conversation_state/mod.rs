//! Conversation State - the mutable, timed memory of one conversation.
//!
//! Five lists hold timed items keyed by node text:
//! - **locks**: nodes that may not be activated
//! - **unlocks**: nodes that `ATTEMPTS` edges may reach
//! - **expectations**: answers the next user input is checked against
//! - **primes**: single-use enablers for `ATTEMPTS`, consumed on any activation
//! - **initiations**: nodes that fire by themselves once their countdown ends
//!
//! The state is shared between the input path and the expiry loop through a
//! [`SharedState`] handle. Every read-modify-write sequence happens under its
//! lock.

mod timed_item;

pub use timed_item::*;

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use robeau_graph::same_node;

/// Handle to a conversation state shared by every execution context.
pub type SharedState = Arc<Mutex<ConversationState>>;

/// What adding an item did to its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new item was appended.
    Added,
    /// An existing item got a fresh countdown.
    Refreshed,
    /// An existing item was left as it was (infinite duration requested).
    Unchanged,
}

/// Items removed by one aging pass.
#[derive(Debug, Default)]
pub struct AgingReport {
    /// Locks, unlocks, expectations and primes whose countdown ended.
    pub expired: Vec<TimedItem>,
    /// Initiations whose countdown ended. The caller fires them.
    pub matured: Vec<TimedItem>,
    /// Initiations without a countdown. Dropped.
    pub malformed: Vec<TimedItem>,
}

/// The per-conversation state.
#[derive(Debug, Default)]
pub struct ConversationState {
    locks: Vec<TimedItem>,
    unlocks: Vec<TimedItem>,
    expectations: Vec<TimedItem>,
    primes: Vec<TimedItem>,
    initiations: Vec<TimedItem>,
}

impl ConversationState {
    /// Create a new empty conversation state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty state wrapped in a shared handle.
    pub fn shared() -> SharedState {
        Arc::new(Mutex::new(Self::new()))
    }

    fn list_mut(&mut self, list: StateList) -> &mut Vec<TimedItem> {
        match list {
            StateList::Locks => &mut self.locks,
            StateList::Unlocks => &mut self.unlocks,
            StateList::Expectations => &mut self.expectations,
            StateList::Primes => &mut self.primes,
            StateList::Initiations => &mut self.initiations,
        }
    }

    /// Items currently held in a list, in insertion order.
    pub fn items(&self, list: StateList) -> &[TimedItem] {
        match list {
            StateList::Locks => &self.locks,
            StateList::Unlocks => &self.unlocks,
            StateList::Expectations => &self.expectations,
            StateList::Primes => &self.primes,
            StateList::Initiations => &self.initiations,
        }
    }

    /// Add an item, or refresh the one already held for this node.
    ///
    /// A list never holds two items for the same node. Re-adding with a
    /// finite duration restarts the countdown; re-adding with `None` leaves
    /// the existing item untouched.
    pub fn add(
        &mut self,
        list: StateList,
        node: &str,
        duration: Option<Duration>,
        now: Instant,
    ) -> AddOutcome {
        let items = self.list_mut(list);

        if let Some(existing) = items.iter_mut().find(|item| same_node(&item.node, node)) {
            return match duration {
                Some(duration) => {
                    existing.refresh(duration, now);
                    debug!(item = %existing, "Refreshed timed item");
                    AddOutcome::Refreshed
                }
                None => AddOutcome::Unchanged,
            };
        }

        let item = TimedItem::new(list, node, duration, now);
        debug!(%item, "Added timed item");
        items.push(item);
        AddOutcome::Added
    }

    pub fn add_lock(&mut self, node: &str, duration: Option<Duration>) -> AddOutcome {
        self.add(StateList::Locks, node, duration, Instant::now())
    }

    pub fn add_unlock(&mut self, node: &str, duration: Option<Duration>) -> AddOutcome {
        self.add(StateList::Unlocks, node, duration, Instant::now())
    }

    pub fn add_expectation(&mut self, node: &str, duration: Option<Duration>) -> AddOutcome {
        self.add(StateList::Expectations, node, duration, Instant::now())
    }

    pub fn add_prime(&mut self, node: &str, duration: Option<Duration>) -> AddOutcome {
        self.add(StateList::Primes, node, duration, Instant::now())
    }

    pub fn add_initiation(&mut self, node: &str, duration: Option<Duration>) -> AddOutcome {
        self.add(StateList::Initiations, node, duration, Instant::now())
    }

    /// Check whether a node is held in a list (ignoring case).
    pub fn contains(&self, list: StateList, node: &str) -> bool {
        self.items(list).iter().any(|item| same_node(&item.node, node))
    }

    pub fn is_locked(&self, node: &str) -> bool {
        self.contains(StateList::Locks, node)
    }

    /// Whether an `ATTEMPTS` edge towards `node` may fire.
    pub fn is_reachable(&self, node: &str) -> bool {
        self.contains(StateList::Unlocks, node) || self.contains(StateList::Primes, node)
    }

    pub fn has_expectations(&self) -> bool {
        !self.expectations.is_empty()
    }

    /// Whether `text` matches one of the pending expectations.
    pub fn meets_expectations(&self, text: &str) -> bool {
        self.contains(StateList::Expectations, text)
    }

    /// Clear a list.
    pub fn reset(&mut self, list: StateList) {
        let items = self.list_mut(list);
        if !items.is_empty() {
            items.clear();
            info!(%list, "Reset conversation state list");
        }
    }

    /// Clear a list given by name. Unknown names are logged and ignored.
    pub fn reset_named(&mut self, name: &str) {
        match name.parse::<StateList>() {
            Ok(list) => self.reset(list),
            Err(err) => error!(%err, "Ignoring reset request"),
        }
    }

    /// Age every item of a list and remove those whose countdown ended.
    ///
    /// Returns the removed items. For initiations these are the ones that
    /// are due to fire.
    pub fn remove_expired(&mut self, list: StateList, now: Instant) -> Vec<TimedItem> {
        let items = self.list_mut(list);
        for item in items.iter_mut() {
            item.update_time_left(now);
        }

        let (expired, kept): (Vec<_>, Vec<_>) =
            std::mem::take(items).into_iter().partition(TimedItem::is_expired);
        *items = kept;

        for item in &expired {
            debug!(%item, "Timed item expired");
        }
        expired
    }

    /// One aging pass over every list.
    ///
    /// Initiations without a countdown cannot mature; they are dropped with
    /// a warning instead of stalling the loop.
    pub fn age(&mut self, now: Instant) -> AgingReport {
        let mut report = AgingReport::default();

        for list in StateList::LAPSING {
            report.expired.extend(self.remove_expired(list, now));
        }

        let (malformed, valid): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.initiations).into_iter().partition(TimedItem::is_permanent);
        self.initiations = valid;
        for item in &malformed {
            warn!(node = %item.node, "Dropping initiation without a countdown");
        }
        report.malformed = malformed;

        report.matured = self.remove_expired(StateList::Initiations, now);
        for item in &report.matured {
            info!(node = %item.node, "Initiation complete");
        }

        report
    }

    /// Remove the first prime or initiation held for `node`.
    ///
    /// Primes are searched before initiations.
    pub fn disable(&mut self, node: &str) -> Option<TimedItem> {
        for list in [StateList::Primes, StateList::Initiations] {
            let items = self.list_mut(list);
            if let Some(index) = items.iter().position(|item| same_node(&item.node, node)) {
                let item = items.remove(index);
                info!(%item, "Item disabled");
                return Some(item);
            }
        }
        None
    }

    /// Remove every lock and unlock held for any of `nodes`.
    ///
    /// Returns how many items were removed.
    pub fn revert<'a>(&mut self, nodes: impl IntoIterator<Item = &'a str>) -> usize {
        let mut removed = 0;
        for node in nodes {
            for list in [StateList::Locks, StateList::Unlocks] {
                let items = self.list_mut(list);
                let before = items.len();
                items.retain(|item| !same_node(&item.node, node));
                if items.len() < before {
                    info!(kind = list.item_kind(), node, "Reverted definition");
                    removed += before - items.len();
                }
            }
        }
        removed
    }

    /// Total number of items across all lists.
    pub fn len(&self) -> usize {
        StateList::ALL.iter().map(|list| self.items(*list).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dump every list at debug level.
    pub fn log_state(&self) {
        if self.is_empty() {
            debug!("No items in conversation state");
            return;
        }
        for list in StateList::ALL {
            for item in self.items(list) {
                debug!(%list, %item, "Conversation state");
            }
        }
    }
}
