//! In-memory graph store.

use std::collections::HashMap;
use tracing::trace;

use super::GraphStore;
use crate::{node_key, Edge, EdgeParams, EndpointLabels, GraphError, Label};

/// Index of a node inside a `MemoryGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node as declared in the script.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScriptNodeEntry {
    text: String,
    labels: Vec<Label>,
}

#[derive(Debug, Clone)]
struct StoredEdge {
    relationship: String,
    target: NodeId,
    params: EdgeParams,
}

/// A dialogue graph held entirely in memory.
///
/// Nodes are addressed by lowercase text. Two nodes may share a text as long
/// as their label sets differ, which is how the same phrase can exist both as
/// a user `Prompt` and as an engine `Response`.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    nodes: Vec<ScriptNodeEntry>,

    /// Index: lowercase text -> nodes carrying that text.
    by_text: HashMap<String, Vec<NodeId>>,

    /// Adjacency list, in insertion order.
    outgoing: HashMap<NodeId, Vec<StoredEdge>>,

    edge_count: usize,
}

impl MemoryGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node. Declaring the same text with the same labels twice
    /// returns the existing node.
    pub fn add_node(&mut self, text: impl Into<String>, labels: Vec<Label>) -> NodeId {
        let text = text.into();
        let key = node_key(&text);

        if let Some(ids) = self.by_text.get(&key) {
            if let Some(id) = ids.iter().find(|id| self.nodes[id.0].labels == labels) {
                return *id;
            }
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(ScriptNodeEntry { text, labels });
        self.by_text.entry(key).or_default().push(id);
        id
    }

    /// Add a directed edge between two declared nodes.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        relationship: impl Into<String>,
        to: NodeId,
        params: EdgeParams,
    ) {
        self.outgoing.entry(from).or_default().push(StoredEdge {
            relationship: relationship.into(),
            target: to,
            params,
        });
        self.edge_count += 1;
    }

    /// Declare both endpoints (single label each) and link them.
    ///
    /// Convenience for building scripts in code.
    pub fn connect(
        &mut self,
        from: (Label, &str),
        relationship: &str,
        to: (Label, &str),
        params: EdgeParams,
    ) -> &mut Self {
        let start = self.add_node(from.1, vec![from.0]);
        let end = self.add_node(to.1, vec![to.0]);
        self.add_edge(start, relationship, end, params);
        self
    }

    /// Get the total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

impl GraphStore for MemoryGraph {
    fn edges_of(&self, text: &str, label: Label) -> Result<Vec<Edge>, GraphError> {
        let Some(ids) = self.by_text.get(&node_key(text)) else {
            return Ok(Vec::new());
        };

        let mut edges = Vec::new();
        for id in ids {
            let start = &self.nodes[id.0];
            if !start.labels.contains(&label) {
                continue;
            }
            for stored in self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[]) {
                let end = &self.nodes[stored.target.0];
                edges.push(Edge {
                    start: start.text.clone(),
                    relationship: stored.relationship.clone(),
                    end: end.text.clone(),
                    params: stored.params.clone(),
                    labels: EndpointLabels {
                        start: start.labels.clone(),
                        end: end.labels.clone(),
                    },
                });
            }
        }

        trace!(node = text, %label, found = edges.len(), "Answered edge query");
        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted(weight: f64) -> EdgeParams {
        EdgeParams {
            random_weight: Some(weight),
            ..Default::default()
        }
    }

    #[test]
    fn test_edges_of_matches_text_ignoring_case() {
        let mut graph = MemoryGraph::new();
        graph.connect(
            (Label::Prompt, "Hello"),
            "TRIGGERS",
            (Label::Response, "hi there"),
            EdgeParams::default(),
        );

        let edges = graph.edges_of("HELLO", Label::Prompt).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].start, "Hello");
        assert_eq!(edges[0].end, "hi there");
        assert_eq!(edges[0].labels.start, vec![Label::Prompt]);
        assert_eq!(edges[0].labels.end, vec![Label::Response]);
    }

    #[test]
    fn test_edges_of_filters_by_label() {
        let mut graph = MemoryGraph::new();
        graph.connect(
            (Label::Prompt, "hello"),
            "TRIGGERS",
            (Label::Response, "hi there"),
            EdgeParams::default(),
        );
        graph.connect(
            (Label::Response, "hello"),
            "TRIGGERS",
            (Label::Response, "you said hello"),
            EdgeParams::default(),
        );

        let as_prompt = graph.edges_of("hello", Label::Prompt).unwrap();
        let as_response = graph.edges_of("hello", Label::Response).unwrap();
        assert_eq!(as_prompt.len(), 1);
        assert_eq!(as_response.len(), 1);
        assert_eq!(as_response[0].end, "you said hello");
        assert!(graph.edges_of("hello", Label::Answer).unwrap().is_empty());
    }

    #[test]
    fn test_edges_preserve_insertion_order() {
        let mut graph = MemoryGraph::new();
        for end in ["one", "two", "three"] {
            graph.connect((Label::Prompt, "count"), "TRIGGERS", (Label::Response, end), weighted(1.0));
        }

        let ends: Vec<_> = graph
            .edges_of("count", Label::Prompt)
            .unwrap()
            .into_iter()
            .map(|e| e.end)
            .collect();
        assert_eq!(ends, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_unknown_node_has_no_edges() {
        let graph = MemoryGraph::new();
        assert!(graph.edges_of("nobody", Label::Prompt).unwrap().is_empty());
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = MemoryGraph::new();
        let a = graph.add_node("Hello", vec![Label::Prompt]);
        let b = graph.add_node("hello", vec![Label::Prompt]);
        let c = graph.add_node("hello", vec![Label::Response]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(graph.node_count(), 2);
    }
}
