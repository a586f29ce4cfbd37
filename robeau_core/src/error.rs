//! Engine errors.
//!
//! Resolution-level problems (an unknown prompt, a reset naming an unknown
//! list, a malformed initiation) are absorbed and logged where they happen.
//! Only the variants below travel up the recursion.

use robeau_graph::GraphError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The graph store could not be queried. Ends the session.
    #[error("graph store failure: {0}")]
    Store(#[from] GraphError),

    /// A chain of activations went deeper than the configured limit.
    #[error("recursion limit exceeded at depth {depth} while processing \"{node}\"")]
    RecursionLimit { node: String, depth: usize },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl EngineError {
    /// Whether the interactive session has to stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Store(_) | EngineError::TaskJoin(_))
    }
}
