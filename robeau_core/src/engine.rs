//! Node processing - the recursive orchestrator.
//!
//! Processing one node:
//! 1. **Lookup**: Pick the label from the source and pending expectations, query the store
//! 2. **Classify**: Partition the edges by relationship type
//! 3. **Define / Modify**: Update the conversation state
//! 4. **Activate**: Resolve the edges that fire and emit their end nodes
//! 5. **Recurse**: Process every activated node as an engine response

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

use robeau_graph::{GraphStore, Label, Marker, QuerySource};

use crate::config::EngineConfig;
use crate::conversation_state::{ConversationState, SharedState, StateList, TimedItem};
use crate::error::EngineError;
use crate::events::{EngineEvent, EventSender};
use crate::resolution::{apply_definitions, apply_modifications, resolve_activations, ClassifiedEdges};

/// Unique identifier for a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one timed-expiry pass.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Lapsed locks, unlocks, expectations and primes.
    pub expired: Vec<TimedItem>,
    /// Initiations that fired, by node text.
    pub fired: Vec<String>,
    /// Every output emitted while processing the fired initiations.
    pub outputs: Vec<String>,
    /// Failures while processing fired initiations. Already logged.
    pub errors: Vec<EngineError>,
}

/// The dialogue engine for one conversation.
///
/// Holds handles to the graph store and the conversation state; both are
/// shared with the background expiry loop.
pub struct Engine {
    id: SessionId,
    store: Arc<dyn GraphStore>,
    state: SharedState,
    rng: Mutex<StdRng>,
    events: Option<EventSender>,
    config: EngineConfig,
}

/// Where a node text ends up being looked up.
struct Query {
    text: String,
    label: Label,
}

impl Engine {
    /// Create an engine with a fresh conversation state.
    pub fn new(store: Arc<dyn GraphStore>, config: EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            id: SessionId::new(),
            store,
            state: ConversationState::shared(),
            rng: Mutex::new(rng),
            events: None,
            config,
        }
    }

    /// Report outputs and expectation signals on a channel.
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process a node and everything it activates.
    ///
    /// Returns every output emitted during the call, nested activations
    /// included, in emission order.
    pub fn process(&self, text: &str, source: QuerySource) -> Result<Vec<String>, EngineError> {
        let _span = info_span!("session", id = %self.id).entered();
        let mut transcript = Vec::new();
        self.process_at(text, source, 0, &mut transcript)?;
        Ok(transcript)
    }

    fn process_at(
        &self,
        text: &str,
        source: QuerySource,
        depth: usize,
        transcript: &mut Vec<String>,
    ) -> Result<(), EngineError> {
        if depth > self.config.max_depth {
            error!(node = text, depth, "Recursion limit exceeded");
            return Err(EngineError::RecursionLimit {
                node: text.to_string(),
                depth,
            });
        }

        info!(node = text, %source, depth, "Processing node");
        self.state.lock().log_state();

        let query = self.prepare_query(text, source, depth, transcript)?;
        let edges = self.store.edges_of(&query.text, query.label)?;

        if edges.is_empty() {
            if query.label == Label::Prompt && source == QuerySource::User {
                warn!(node = %query.text, "Prompt not found in store");
                self.emit(EngineEvent::NotUnderstood {
                    text: query.text.clone(),
                });
            }
            debug!(node = %query.text, %source, "No connections, end of branch");
            return Ok(());
        }

        let classified = ClassifiedEdges::classify(edges);
        if classified.dropped() > 0 {
            debug!(node = %query.text, dropped = classified.dropped(), "Ignored edges of unknown type");
        }

        let expectations_set = {
            let mut state = self.state.lock();
            apply_definitions(&classified, &mut state, Instant::now())
        };
        if expectations_set {
            self.process_at(Marker::ExpectationsSet.text(), QuerySource::System, depth + 1, transcript)?;
        }

        apply_modifications(&classified, self.store.as_ref(), &self.state)?;

        let resolution = {
            let mut state = self.state.lock();
            let mut rng = self.rng.lock();
            resolve_activations(&classified, &mut state, &mut *rng)
        };

        let activated = resolution.end_nodes();
        for node in &activated {
            if !Marker::is_reserved(node) {
                self.output(node, transcript);
            }
        }

        for node in activated {
            if Marker::from_text(node) == Some(Marker::ResetExpectations) {
                self.state.lock().reset(StateList::Expectations);
                continue;
            }
            self.process_at(node, QuerySource::Robeau, depth + 1, transcript)?;
        }

        debug!(node = %query.text, "End of process");
        Ok(())
    }

    /// Decide which text and label to query for.
    ///
    /// User input is checked against pending expectations first: a match is
    /// looked up as an `Answer` after the success marker has been processed;
    /// a miss is replaced by the failure marker.
    fn prepare_query(
        &self,
        text: &str,
        source: QuerySource,
        depth: usize,
        transcript: &mut Vec<String>,
    ) -> Result<Query, EngineError> {
        if source != QuerySource::User {
            return Ok(Query {
                text: text.to_string(),
                label: source.label(),
            });
        }

        let (pending, met) = {
            let state = self.state.lock();
            (state.has_expectations(), state.meets_expectations(text))
        };

        if !pending {
            return Ok(Query {
                text: text.to_string(),
                label: Label::Prompt,
            });
        }

        if met {
            info!(node = text, "Input meets conversation expectations");
            self.emit(EngineEvent::ExpectationsMet {
                text: text.to_string(),
            });
            self.process_at(
                Marker::ExpectationsSuccess.text(),
                QuerySource::System,
                depth + 1,
                transcript,
            )?;
            Ok(Query {
                text: text.to_string(),
                label: Label::Answer,
            })
        } else {
            info!(node = text, "Input does not meet conversation expectations");
            self.emit(EngineEvent::ExpectationsFailed {
                text: text.to_string(),
            });
            Ok(Query {
                text: Marker::ExpectationsFailure.text().to_string(),
                label: Label::Input,
            })
        }
    }

    /// Age the conversation state once and fire matured initiations.
    pub fn tick(&self) -> TickReport {
        self.tick_at(Instant::now())
    }

    /// Age the conversation state as of `now`.
    ///
    /// Matured initiations are processed after the state lock is released,
    /// as engine responses: their text is emitted, then processed.
    pub fn tick_at(&self, now: Instant) -> TickReport {
        let _span = info_span!("session", id = %self.id).entered();
        let aging = self.state.lock().age(now);

        let mut report = TickReport {
            expired: aging.expired,
            ..Default::default()
        };

        for initiation in aging.matured {
            let mut transcript = Vec::new();
            self.output(&initiation.node, &mut transcript);
            if let Err(err) =
                self.process_at(&initiation.node, QuerySource::Robeau, 0, &mut transcript)
            {
                error!(node = %initiation.node, %err, "Failed to process initiation");
                report.errors.push(err);
            }
            report.fired.push(initiation.node);
            report.outputs.extend(transcript);
        }

        report
    }

    fn output(&self, text: &str, transcript: &mut Vec<String>) {
        info!(">>> OUTPUT: \"{}\"", text);
        transcript.push(text.to_string());
        self.emit(EngineEvent::Output {
            text: text.to_string(),
        });
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(events) = &self.events {
            if events.send(event).is_err() {
                debug!("Event receiver dropped");
            }
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
