//! Edges ("connections") - typed, parameterized links between two nodes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Label, Relationship, UnknownRelationship};

/// Optional parameters carried by an edge.
///
/// Field names follow the store spelling (`randomWeight`, `randomPoolId`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeParams {
    /// Seconds. `None` means the defined state never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Presence makes the edge a weighted-random candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_weight: Option<f64>,

    /// Pool the random candidate competes in. Absent means pool 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_pool_id: Option<i64>,
}

/// Label sets of both endpoints of an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointLabels {
    pub start: Vec<Label>,
    pub end: Vec<Label>,
}

/// A directed connection between two nodes as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Text of the start node.
    pub start: String,

    /// Relationship type in store spelling. Kept raw so unknown types from
    /// newer scripts survive until classification drops them.
    pub relationship: String,

    /// Text of the end node.
    pub end: String,

    #[serde(default)]
    pub params: EdgeParams,

    #[serde(default)]
    pub labels: EndpointLabels,
}

impl Edge {
    /// Create a new edge with empty parameters.
    pub fn new(
        start: impl Into<String>,
        relationship: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            start: start.into(),
            relationship: relationship.into(),
            end: end.into(),
            params: EdgeParams::default(),
            labels: EndpointLabels::default(),
        }
    }

    /// Set the duration parameter in seconds.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.params.duration = Some(seconds);
        self
    }

    /// Set the random weight parameter.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.params.random_weight = Some(weight);
        self
    }

    /// Set the random pool parameter.
    pub fn with_pool(mut self, pool_id: i64) -> Self {
        self.params.random_pool_id = Some(pool_id);
        self
    }

    /// Set the endpoint label sets.
    pub fn with_labels(mut self, start: Vec<Label>, end: Vec<Label>) -> Self {
        self.labels = EndpointLabels { start, end };
        self
    }

    /// Parse the raw relationship type into the taxonomy.
    pub fn kind(&self) -> Result<Relationship, UnknownRelationship> {
        self.relationship.parse()
    }

    /// The duration as a `Duration`, or `None` for "never expires".
    ///
    /// Negative and NaN values collapse to zero, so the item lapses on the
    /// next aging pass. Values too large for a `Duration` saturate.
    pub fn duration(&self) -> Option<Duration> {
        self.params.duration.map(|secs| {
            if secs.is_nan() || secs <= 0.0 {
                Duration::ZERO
            } else {
                Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
            }
        })
    }

    /// Whether this edge competes in a weighted-random pool.
    pub fn is_random(&self) -> bool {
        self.params.random_weight.is_some()
    }

    /// The random pool this edge belongs to.
    pub fn pool_id(&self) -> i64 {
        self.params.random_pool_id.unwrap_or(0)
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(\"{}\")-[{}]->(\"{}\")", self.start, self.relationship, self.end)
    }
}
