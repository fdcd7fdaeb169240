//! Observed service topology.
//!
//! Nodes are keyed by an opaque id and carry the aggregation key that joins
//! them to a registered service's metrics.

use serde::{Deserialize, Serialize};

/// Global topology over a time window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyResponse {
    /// Vertices of the observed call graph.
    #[serde(default)]
    pub nodes: Vec<TopologyNode>,
    /// Observed directed calls between nodes.
    #[serde(default)]
    pub calls: Vec<TopologyCall>,
}

/// A vertex in the observed call graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyNode {
    /// Node identifier referenced by calls.
    pub id: String,
    /// Join key shared with service metrics.
    #[serde(rename = "name")]
    pub aggregation_key: String,
}

/// One observed directed call relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyCall {
    /// Edge identifier.
    pub id: String,
    /// Calling node id.
    pub source: String,
    /// Called node id.
    pub target: String,
}

impl TopologyResponse {
    /// Creates an empty topology.
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// Adds a node.
    #[must_use]
    pub fn with_node(mut self, id: impl Into<String>, aggregation_key: impl Into<String>) -> Self {
        self.nodes.push(TopologyNode {
            id: id.into(),
            aggregation_key: aggregation_key.into(),
        });
        self
    }

    /// Adds a call from `source` to `target`, numbering it after the existing calls.
    #[must_use]
    pub fn with_call(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        self.calls.push(TopologyCall {
            id: format!("{source}-{target}-{}", self.calls.len()),
            source,
            target,
        });
        self
    }
}
