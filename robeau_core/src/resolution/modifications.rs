//! Modification processing.

use parking_lot::Mutex;
use tracing::{debug, info};

use robeau_graph::{Edge, GraphError, GraphStore, Modification, QuerySource};

use super::ClassifiedEdges;
use crate::conversation_state::ConversationState;

/// Apply `DISABLES`, `DELAYS` and `REVERTS` edges.
///
/// - `DISABLES` removes the first prime or initiation held for the end node.
/// - `DELAYS` is accepted and ignored.
/// - `REVERTS` looks up the end node as an engine response and removes every
///   lock or unlock keyed by one of that node's targets. An edge can so undo
///   whatever another node would lock or unlock without naming it.
///
/// The store is queried without holding the state lock.
pub fn apply_modifications(
    classified: &ClassifiedEdges,
    store: &dyn GraphStore,
    state: &Mutex<ConversationState>,
) -> Result<(), GraphError> {
    let disables = classified.modifications(Modification::Disables);
    if !disables.is_empty() {
        let mut state = state.lock();
        for edge in disables {
            if state.disable(&edge.end).is_none() {
                debug!(%edge, "Nothing to disable");
            }
        }
    }

    for edge in classified.modifications(Modification::Delays) {
        debug!(%edge, "DELAYS is reserved, ignoring");
    }

    for edge in classified.modifications(Modification::Reverts) {
        let definitions = revert_targets(store, edge)?;
        info!(
            %edge,
            targets = ?definitions.iter().map(|d| d.end.as_str()).collect::<Vec<_>>(),
            "Obtained definitions to revert"
        );
        state.lock().revert(definitions.iter().map(|d| d.end.as_str()));
    }

    Ok(())
}

/// The current connections of a `REVERTS` edge's end node.
fn revert_targets(store: &dyn GraphStore, edge: &Edge) -> Result<Vec<Edge>, GraphError> {
    store.edges_of(&edge.end, QuerySource::Robeau.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation_state::StateList;
    use robeau_graph::{EdgeParams, Label, MemoryGraph};
    use std::time::Duration;

    #[test]
    fn test_disables_primes_then_initiations() {
        let store = MemoryGraph::new();
        let state = Mutex::new(ConversationState::new());
        {
            let mut s = state.lock();
            s.add_prime("bell", None);
            s.add_initiation("bell", Some(Duration::from_secs(5)));
            s.add_initiation("alarm", Some(Duration::from_secs(5)));
        }

        let classified = ClassifiedEdges::classify(vec![
            Edge::new("x", "DISABLES", "bell"),
            Edge::new("x", "DISABLES", "alarm"),
        ]);
        apply_modifications(&classified, &store, &state).unwrap();

        let s = state.lock();
        assert!(!s.contains(StateList::Primes, "bell"));
        assert!(s.contains(StateList::Initiations, "bell"));
        assert!(!s.contains(StateList::Initiations, "alarm"));
    }

    #[test]
    fn test_reverts_what_the_target_would_define() {
        let mut store = MemoryGraph::new();
        store
            .connect((Label::Response, "shut up"), "LOCKS", (Label::Response, "chatter"), EdgeParams::default())
            .connect((Label::Response, "shut up"), "UNLOCKS", (Label::Response, "silence"), EdgeParams::default());

        let state = Mutex::new(ConversationState::new());
        {
            let mut s = state.lock();
            s.add_lock("chatter", None);
            s.add_unlock("silence", None);
            s.add_lock("other", None);
        }

        let classified = ClassifiedEdges::classify(vec![Edge::new("sorry", "REVERTS", "shut up")]);
        apply_modifications(&classified, &store, &state).unwrap();

        let s = state.lock();
        assert!(!s.is_locked("chatter"));
        assert!(!s.contains(StateList::Unlocks, "silence"));
        assert!(s.is_locked("other"));
    }

    #[test]
    fn test_delays_is_inert() {
        let store = MemoryGraph::new();
        let state = Mutex::new(ConversationState::new());
        state.lock().add_lock("door", Some(Duration::from_secs(5)));

        let classified =
            ClassifiedEdges::classify(vec![Edge::new("x", "DELAYS", "door").with_duration(60.0)]);
        apply_modifications(&classified, &store, &state).unwrap();

        let s = state.lock();
        assert_eq!(s.items(StateList::Locks)[0].duration, Some(Duration::from_secs(5)));
    }
}
