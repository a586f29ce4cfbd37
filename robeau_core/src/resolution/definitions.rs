//! Definition processing.

use tokio::time::Instant;
use tracing::debug;

use robeau_graph::Definition;

use super::ClassifiedEdges;
use crate::conversation_state::{ConversationState, StateList};

/// Write every definition edge into the conversation state.
///
/// Each edge adds (or refreshes) a timed item keyed by its end node, with the
/// edge's `duration` parameter. Returns `true` when expectations were set,
/// in which case the caller processes the expectations-set marker once the
/// whole batch is applied.
pub fn apply_definitions(
    classified: &ClassifiedEdges,
    state: &mut ConversationState,
    now: Instant,
) -> bool {
    for kind in Definition::ORDER {
        let list = StateList::from(kind);
        for edge in classified.definitions(kind) {
            let outcome = state.add(list, &edge.end, edge.duration(), now);
            debug!(%edge, ?outcome, "Applied definition");
        }
    }

    !classified.definitions(Definition::Expects).is_empty()
}
