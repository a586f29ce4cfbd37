//! Relationship classification.

use std::collections::BTreeMap;
use tracing::debug;

use robeau_graph::{Activation, Definition, Edge, Modification, Relationship};

/// A node's edges partitioned by relationship type.
///
/// Each bucket keeps the store order of its edges.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedEdges {
    activations: BTreeMap<Activation, Vec<Edge>>,
    definitions: BTreeMap<Definition, Vec<Edge>>,
    modifications: BTreeMap<Modification, Vec<Edge>>,
    dropped: usize,
}

impl ClassifiedEdges {
    /// Partition edges into the twelve buckets.
    ///
    /// Edges with a relationship type outside the taxonomy are dropped, so
    /// scripts written for newer engines still load.
    pub fn classify(edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut classified = Self::default();

        for edge in edges {
            match edge.kind() {
                Ok(Relationship::Activation(kind)) => {
                    classified.activations.entry(kind).or_default().push(edge)
                }
                Ok(Relationship::Definition(kind)) => {
                    classified.definitions.entry(kind).or_default().push(edge)
                }
                Ok(Relationship::Modification(kind)) => {
                    classified.modifications.entry(kind).or_default().push(edge)
                }
                Err(unknown) => {
                    debug!(%edge, %unknown, "Dropping edge");
                    classified.dropped += 1;
                }
            }
        }

        classified
    }

    pub fn activations(&self, kind: Activation) -> &[Edge] {
        self.activations.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn definitions(&self, kind: Definition) -> &[Edge] {
        self.definitions.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn modifications(&self, kind: Modification) -> &[Edge] {
        self.modifications.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// The bucket for any relationship type.
    pub fn bucket(&self, relationship: Relationship) -> &[Edge] {
        match relationship {
            Relationship::Activation(kind) => self.activations(kind),
            Relationship::Definition(kind) => self.definitions(kind),
            Relationship::Modification(kind) => self.modifications(kind),
        }
    }

    /// Number of edges dropped for carrying an unknown relationship type.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of classified edges.
    pub fn len(&self) -> usize {
        Relationship::ALL.iter().map(|r| self.bucket(*r).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
