//! Activation resolution.

use rand::Rng;
use tracing::{debug, info};

use robeau_graph::{Activation, Edge};

use super::{group_pools, select_from_pools, ClassifiedEdges};
use crate::conversation_state::{ConversationState, StateList};

/// Outcome of one activation pass.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// The bucket that fired, if any.
    pub fired: Option<Activation>,
    /// Activated edges: one winner per random pool, then regular edges.
    pub activated: Vec<Edge>,
}

impl Resolution {
    /// End-node texts of the activated edges, in activation order.
    pub fn end_nodes(&self) -> Vec<&str> {
        self.activated.iter().map(|edge| edge.end.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.activated.is_empty()
    }
}

/// Decide which activation edges fire.
///
/// Buckets are walked in priority order (`CHECKS`, `ATTEMPTS`, `TRIGGERS`,
/// `DEFAULTS`) and the first one that activates anything wins:
///
/// 1. Edges towards locked nodes are discarded, in every bucket.
/// 2. `ATTEMPTS` edges also need their end node unlocked or primed.
/// 3. Edges carrying a `randomWeight` are pooled by `randomPoolId` and one
///    winner is drawn per pool; every other surviving edge fires.
///
/// Any activation consumes all primes. The caller must hold the state lock
/// for the whole call so the checks and the prime reset see one state.
pub fn resolve_activations<R: Rng + ?Sized>(
    classified: &ClassifiedEdges,
    state: &mut ConversationState,
    rng: &mut R,
) -> Resolution {
    for kind in Activation::PRIORITY {
        let bucket = classified.activations(kind);
        if bucket.is_empty() {
            continue;
        }

        let (random, regular): (Vec<Edge>, Vec<Edge>) = bucket
            .iter()
            .filter(|edge| admits(kind, edge, state))
            .cloned()
            .partition(Edge::is_random);

        let mut activated = select_from_pools(&group_pools(random), rng);
        activated.extend(regular);

        if activated.is_empty() {
            debug!(?kind, "Nothing activated, falling through");
            continue;
        }

        for edge in &activated {
            info!(%edge, ?kind, "Activated connection");
        }
        // Priming is single-use
        state.reset(StateList::Primes);

        return Resolution {
            fired: Some(kind),
            activated,
        };
    }

    Resolution::default()
}

fn admits(kind: Activation, edge: &Edge, state: &ConversationState) -> bool {
    if state.is_locked(&edge.end) {
        debug!(%edge, "Connection is locked");
        return false;
    }

    if kind == Activation::Attempts {
        if !state.is_reachable(&edge.end) {
            info!(%edge, "Failed attempt at connection");
            return false;
        }
        info!(%edge, "Successful attempt at connection");
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn resolve(edges: Vec<Edge>, state: &mut ConversationState) -> Resolution {
        let mut rng = StdRng::seed_from_u64(0);
        resolve_activations(&ClassifiedEdges::classify(edges), state, &mut rng)
    }

    #[test]
    fn test_priority_short_circuit() {
        let mut state = ConversationState::new();
        let resolution = resolve(
            vec![
                Edge::new("X", "TRIGGERS", "Z"),
                Edge::new("X", "CHECKS", "Y"),
            ],
            &mut state,
        );

        assert_eq!(resolution.fired, Some(Activation::Checks));
        assert_eq!(resolution.end_nodes(), vec!["Y"]);
    }

    #[test]
    fn test_locked_edge_falls_through() {
        let mut state = ConversationState::new();
        state.add_lock("Y", None);

        let resolution = resolve(
            vec![
                Edge::new("X", "CHECKS", "Y"),
                Edge::new("X", "DEFAULTS", "fallback"),
            ],
            &mut state,
        );

        assert_eq!(resolution.fired, Some(Activation::Defaults));
        assert_eq!(resolution.end_nodes(), vec!["fallback"]);
    }

    #[test]
    fn test_locks_apply_to_every_bucket() {
        let mut state = ConversationState::new();
        state.add_lock("Y", None);

        let resolution = resolve(vec![Edge::new("X", "DEFAULTS", "Y")], &mut state);
        assert!(resolution.is_empty());
        assert_eq!(resolution.fired, None);
    }

    #[test]
    fn test_attempt_gating_and_prime_consumption() {
        let mut state = ConversationState::new();
        let edges = vec![Edge::new("X", "ATTEMPTS", "Y")];

        assert!(resolve(edges.clone(), &mut state).is_empty());

        state.add_prime("Y", None);
        let resolution = resolve(edges.clone(), &mut state);
        assert_eq!(resolution.end_nodes(), vec!["Y"]);
        assert!(state.items(StateList::Primes).is_empty(), "primes are single-use");

        assert!(resolve(edges, &mut state).is_empty());
    }

    #[test]
    fn test_unlock_enables_attempt_repeatedly() {
        let mut state = ConversationState::new();
        state.add_unlock("Y", None);
        let edges = vec![Edge::new("X", "ATTEMPTS", "Y")];

        assert_eq!(resolve(edges.clone(), &mut state).end_nodes(), vec!["Y"]);
        assert_eq!(resolve(edges, &mut state).end_nodes(), vec!["Y"]);
    }

    #[test]
    fn test_failed_attempt_falls_through_to_triggers() {
        let mut state = ConversationState::new();
        let resolution = resolve(
            vec![
                Edge::new("X", "ATTEMPTS", "secret"),
                Edge::new("X", "TRIGGERS", "public"),
            ],
            &mut state,
        );

        assert_eq!(resolution.fired, Some(Activation::Triggers));
        assert_eq!(resolution.end_nodes(), vec!["public"]);
    }

    #[test]
    fn test_random_winners_come_before_regular_edges() {
        let mut state = ConversationState::new();
        let resolution = resolve(
            vec![
                Edge::new("X", "TRIGGERS", "always"),
                Edge::new("X", "TRIGGERS", "r1").with_weight(1.0),
                Edge::new("X", "TRIGGERS", "r2").with_weight(1.0),
            ],
            &mut state,
        );

        let ends = resolution.end_nodes();
        assert_eq!(ends.len(), 2);
        assert!(ends[0] == "r1" || ends[0] == "r2");
        assert_eq!(ends[1], "always");
    }

    #[test]
    fn test_no_activation_keeps_primes() {
        let mut state = ConversationState::new();
        state.add_prime("other", None);

        let resolution = resolve(vec![Edge::new("X", "ATTEMPTS", "Y")], &mut state);
        assert!(resolution.is_empty());
        assert!(state.contains(StateList::Primes, "other"));
    }
}
