//! Structural and resource errors raised by the scheduling pipeline.
//!
//! Every failure is fatal for the topology being scheduled: it means the
//! description handed in by the topology loader is malformed (or that an
//! internal invariant was broken), so nothing is retried and no partial
//! schedule is returned. Each variant names the offending node or edge.
use crate::ids::{EdgeId, NodeId};

/// Errors produced while building, traversing, ordering or scheduling a graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    // --- Construction ---
    /// None of the nodes is marked as the entry node.
    #[error("no entry node among {node_count} nodes")]
    NoEntryNode {
        /// Number of nodes supplied.
        node_count: usize,
    },

    /// More than one node is marked as the entry node.
    #[error("multiple entry nodes: {first} ({first_name:?}) and {second} ({second_name:?})")]
    MultipleEntryNodes {
        /// The first entry node encountered.
        first: NodeId,
        /// Name of `first`.
        first_name: String,
        /// The second entry node encountered.
        second: NodeId,
        /// Name of `second`.
        second_name: String,
    },

    /// Two nodes share a name.
    #[error("duplicate node name {name:?} at {first} and {second}")]
    DuplicateNodeName {
        /// The repeated name.
        name: String,
        /// The earlier node carrying the name.
        first: NodeId,
        /// The later node carrying the name.
        second: NodeId,
    },

    /// An edge endpoint is not a valid node index.
    #[error("edge {edge} references {node}, but the graph has only {node_count} nodes")]
    DanglingEdge {
        /// The offending edge.
        edge: EdgeId,
        /// The out-of-range endpoint.
        node: NodeId,
        /// Number of nodes supplied.
        node_count: usize,
    },

    // --- Traversal ---
    /// Depth-first traversal from the entry node never reached this node.
    #[error("node {node} ({name:?}) is not reachable from the entry node")]
    UnreachableNode {
        /// The unvisited node.
        node: NodeId,
        /// Its name.
        name: String,
    },

    /// Depth-first traversal never passed this edge.
    #[error("edge {edge} was never traversed from the entry node")]
    UntraversedEdge {
        /// The unpassed edge.
        edge: EdgeId,
    },

    // --- Ordering ---
    /// The node order has the wrong length.
    #[error("node order has {actual} entries, expected {expected}")]
    NodeOrderLength {
        /// Number of nodes in the graph.
        expected: usize,
        /// Number of entries produced.
        actual: usize,
    },

    /// A node appears more than once in the node order.
    #[error("node {node} appears more than once in the node order")]
    NodeOrderDuplicate {
        /// The repeated node.
        node: NodeId,
    },

    /// A node is absent from the node order.
    #[error("node {node} is missing from the node order")]
    NodeOrderMissing {
        /// The absent node.
        node: NodeId,
    },

    /// A node order handed to the edge scheduler references a node outside
    /// the graph.
    #[error("node order references {node}, but the graph has only {node_count} nodes")]
    NodeOrderInvalid {
        /// The out-of-range node.
        node: NodeId,
        /// Number of nodes in the graph.
        node_count: usize,
    },

    // --- Edge schedule ---
    /// The edge schedule has the wrong length.
    #[error("edge schedule has {actual} entries, expected {expected}")]
    EdgeScheduleLength {
        /// Number of edges in the graph.
        expected: usize,
        /// Number of entries produced.
        actual: usize,
    },

    /// An edge appears more than once in the edge schedule.
    #[error("edge {edge} appears more than once in the edge schedule")]
    EdgeScheduleDuplicate {
        /// The repeated edge.
        edge: EdgeId,
    },

    /// An edge is absent from the edge schedule.
    #[error("edge {edge} is missing from the edge schedule")]
    EdgeScheduleMissing {
        /// The absent edge.
        edge: EdgeId,
    },

    // --- Resources ---
    /// A working buffer could not be allocated.
    #[error("failed to allocate {what} for {count} elements")]
    OutOfMemory {
        /// Which buffer failed.
        what: &'static str,
        /// Requested element count.
        count: usize,
    },
}

impl ScheduleError {
    /// Returns `true` for errors caused by the topology description itself,
    /// as opposed to allocation failures.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::OutOfMemory { .. })
    }
}

/// Reserves room for `count` more elements in `buf`, mapping allocation
/// failure to [`ScheduleError::OutOfMemory`].
pub(crate) fn reserve<T>(
    buf: &mut Vec<T>,
    count: usize,
    what: &'static str,
) -> Result<(), ScheduleError> {
    buf.try_reserve_exact(count)
        .map_err(|_| ScheduleError::OutOfMemory { what, count })
}
