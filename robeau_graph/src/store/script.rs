//! Dialogue script documents.
//!
//! A script declares nodes with their labels and the edges between them. It
//! can be written as TOML or JSON:
//!
//! ```toml
//! [[nodes]]
//! text = "hello"
//! labels = ["Prompt"]
//!
//! [[nodes]]
//! text = "hi there"
//! labels = ["Response"]
//!
//! [[edges]]
//! from = "hello"
//! relationship = "TRIGGERS"
//! to = "hi there"
//! params = { randomWeight = 1 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::{MemoryGraph, NodeId};
use crate::{same_node, EdgeParams, GraphError, Label};

/// A node declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptNode {
    pub text: String,
    pub labels: Vec<Label>,
}

/// An edge declaration. Endpoints are node texts; the optional labels pick
/// between declared nodes that share a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEdge {
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_label: Option<Label>,
    pub relationship: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_label: Option<Label>,
    #[serde(default)]
    pub params: EdgeParams,
}

/// A complete dialogue script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueScript {
    #[serde(default)]
    pub nodes: Vec<ScriptNode>,
    #[serde(default)]
    pub edges: Vec<ScriptEdge>,
}

impl DialogueScript {
    pub fn from_toml_str(source: &str) -> Result<Self, GraphError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a script, picking the format from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&source),
            Some("json") => Self::from_json_str(&source),
            _ => Err(GraphError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Build an in-memory graph from this script.
    ///
    /// Every edge endpoint must match a declared node.
    pub fn into_graph(self) -> Result<MemoryGraph, GraphError> {
        let mut graph = MemoryGraph::new();
        let ids: Vec<NodeId> = self
            .nodes
            .iter()
            .map(|node| graph.add_node(node.text.clone(), node.labels.clone()))
            .collect();

        for edge in &self.edges {
            let describe = || format!("{} -[{}]-> {}", edge.from, edge.relationship, edge.to);
            let from = resolve(&self.nodes, &ids, &edge.from, edge.from_label).ok_or_else(|| {
                GraphError::UndeclaredNode {
                    edge: describe(),
                    node: edge.from.clone(),
                }
            })?;
            let to = resolve(&self.nodes, &ids, &edge.to, edge.to_label).ok_or_else(|| {
                GraphError::UndeclaredNode {
                    edge: describe(),
                    node: edge.to.clone(),
                }
            })?;
            graph.add_edge(from, edge.relationship.clone(), to, edge.params.clone());
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Dialogue script loaded"
        );
        Ok(graph)
    }
}

/// First declared node matching the text (and label, when given).
fn resolve(nodes: &[ScriptNode], ids: &[NodeId], text: &str, label: Option<Label>) -> Option<NodeId> {
    nodes
        .iter()
        .zip(ids)
        .find(|(node, _)| {
            same_node(&node.text, text) && label.map_or(true, |l| node.labels.contains(&l))
        })
        .map(|(_, id)| *id)
}

impl MemoryGraph {
    /// Load a script file straight into a graph.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        DialogueScript::load(path)?.into_graph()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphStore;
    use std::io::Write;

    const GREETING_TOML: &str = r#"
        [[nodes]]
        text = "hello"
        labels = ["Prompt"]

        [[nodes]]
        text = "hi there"
        labels = ["Response"]

        [[nodes]]
        text = "hello"
        labels = ["Response"]

        [[edges]]
        from = "hello"
        from_label = "Prompt"
        relationship = "TRIGGERS"
        to = "hi there"
        params = { randomWeight = 2, randomPoolId = 1 }

        [[edges]]
        from = "hi there"
        relationship = "LOCKS"
        to = "hello"
        to_label = "Response"
        params = { duration = 5 }
    "#;

    #[test]
    fn test_toml_script() {
        let graph = DialogueScript::from_toml_str(GREETING_TOML)
            .unwrap()
            .into_graph()
            .unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        let edges = graph.edges_of("hello", Label::Prompt).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].params.random_weight, Some(2.0));
        assert_eq!(edges[0].pool_id(), 1);

        let locks = graph.edges_of("hi there", Label::Response).unwrap();
        assert_eq!(locks[0].labels.end, vec![Label::Response]);
        assert_eq!(locks[0].params.duration, Some(5.0));
    }

    #[test]
    fn test_json_script() {
        let json = r#"{
            "nodes": [
                {"text": "start", "labels": ["Prompt"]},
                {"text": "ready?", "labels": ["Question"]}
            ],
            "edges": [
                {"from": "start", "relationship": "DEFAULTS", "to": "ready?", "params": {"duration": null}}
            ]
        }"#;

        let graph = DialogueScript::from_json_str(json).unwrap().into_graph().unwrap();
        let edges = graph.edges_of("START", Label::Prompt).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].params.duration, None);
    }

    #[test]
    fn test_undeclared_endpoint_is_rejected() {
        let script = DialogueScript {
            nodes: vec![ScriptNode {
                text: "hello".into(),
                labels: vec![Label::Prompt],
            }],
            edges: vec![ScriptEdge {
                from: "hello".into(),
                from_label: None,
                relationship: "TRIGGERS".into(),
                to: "ghost".into(),
                to_label: None,
                params: EdgeParams::default(),
            }],
        };

        let err = script.into_graph().unwrap_err();
        assert!(matches!(err, GraphError::UndeclaredNode { node, .. } if node == "ghost"));
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(GREETING_TOML.as_bytes()).unwrap();

        let graph = MemoryGraph::load(file.path()).unwrap();
        assert_eq!(graph.edge_count(), 2);

        let other = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(
            DialogueScript::load(other.path()),
            Err(GraphError::UnsupportedFormat(_))
        ));
    }
}
