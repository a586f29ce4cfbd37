//! Store module - the narrow read-only interface the engine queries.
//!
//! The engine never writes edges back. A store only has to answer one
//! question: which edges leave the node with this text under this label.

mod memory;
mod script;

pub use memory::*;
pub use script::*;

use std::sync::Arc;

use crate::{Edge, GraphError, Label};

/// Source of outgoing edges for the engine.
///
/// Implementations must be safe for concurrent reads: the interactive input
/// path and the background expiry loop query the same store.
pub trait GraphStore: Send + Sync {
    /// Outgoing edges of the node whose text matches `text` (ignoring case)
    /// under `label`, in store order. Returns an empty list when the node
    /// does not exist or has no outgoing edges.
    ///
    /// An `Err` means the store itself could not be reached.
    fn edges_of(&self, text: &str, label: Label) -> Result<Vec<Edge>, GraphError>;
}

impl<T: GraphStore + ?Sized> GraphStore for Arc<T> {
    fn edges_of(&self, text: &str, label: Label) -> Result<Vec<Edge>, GraphError> {
        (**self).edges_of(text, label)
    }
}

impl<T: GraphStore + ?Sized> GraphStore for &T {
    fn edges_of(&self, text: &str, label: Label) -> Result<Vec<Edge>, GraphError> {
        (**self).edges_of(text, label)
    }
}
