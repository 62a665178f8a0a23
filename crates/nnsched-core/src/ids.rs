//! Dense integer identities for nodes and edges.
//!
//! Both identifiers are plain indices into the caller's node and edge arrays.
//! They are never aliased references, so a cyclic topology needs no shared
//! ownership: the graph stores ids, and the caller keeps its computation
//! objects.
use std::fmt;

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Position of a node in the caller-supplied node array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Wraps a raw index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<NodeIndex> for NodeId {
    fn from(idx: NodeIndex) -> Self {
        Self(idx.index())
    }
}

impl From<NodeId> for NodeIndex {
    fn from(id: NodeId) -> Self {
        NodeIndex::new(id.0)
    }
}

// ---------------------------------------------------------------------------
// EdgeId
// ---------------------------------------------------------------------------

/// Position of an edge in the caller-supplied edge array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Wraps a raw index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl From<usize> for EdgeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<EdgeIndex> for EdgeId {
    fn from(idx: EdgeIndex) -> Self {
        Self(idx.index())
    }
}

impl From<EdgeId> for EdgeIndex {
    fn from(id: EdgeId) -> Self {
        EdgeIndex::new(id.0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn ids_round_trip_through_petgraph_indices() {
        let node = NodeId::new(7);
        assert_eq!(NodeId::from(NodeIndex::from(node)), node);

        let edge = EdgeId::new(3);
        assert_eq!(EdgeId::from(EdgeIndex::from(edge)), edge);
    }

    #[test]
    fn display_distinguishes_nodes_from_edges() {
        assert_eq!(NodeId::new(2).to_string(), "#2");
        assert_eq!(EdgeId::new(2).to_string(), "e2");
    }

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json =
            serde_json::to_string(&vec![EdgeId::new(0), EdgeId::new(5)]).expect("serializes");
        assert_eq!(json, "[0,5]");
    }
}
