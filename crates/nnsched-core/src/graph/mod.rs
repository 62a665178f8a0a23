//! Computation graph construction plus the scheduling algorithms over it.
//!
//! [`build_graph`] assembles a [`Graph`] from the caller's node and edge specs.
//! The submodules then run, in order:
//!
//! 1. [`cycles`]: depth-first cycle detection and edge classification.
//! 2. [`order`]: topological node order from the reversed post-order.
//! 3. [`schedule`]: linear edge schedule with feedback edges spliced ahead
//!    of their target node's outgoing edges.
//!
//! [`overlap`] holds diagnostics over the detected cycles.
//!
//! # Construction
//!
//! [`build_graph`] runs two passes:
//! 1. **Node pass**: checks name uniqueness and the single entry node, and
//!    inserts each node into the petgraph `DiGraph` so that `NodeIndex(i)`
//!    is node `i`.
//! 2. **Edge pass**: checks both endpoints, appends the edge to its source's
//!    outgoing list and inserts it so that `EdgeIndex(i)` is edge `i`.
pub mod cycles;
pub mod order;
pub mod overlap;
pub mod schedule;

pub use cycles::{Cycle, CycleReport, Traversal, detect_cycles, detect_cycles_with};
pub use order::topo_order;
pub use overlap::{SharedEdge, overlapping_cycles};
pub use schedule::schedule_edges;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use petgraph::graph::DiGraph;

use crate::error::{ScheduleError, reserve};
use crate::ids::{EdgeId, NodeId};
use crate::structures::{EdgeSpec, NodeSpec, RecurType};

// ---------------------------------------------------------------------------
// Weight types
// ---------------------------------------------------------------------------

/// Weight stored on each petgraph node.
#[derive(Debug, Clone)]
pub struct NodeWeight {
    /// Node name copied from the [`NodeSpec`].
    pub name: String,
    /// Whether this is the entry node.
    pub entry: bool,
}

impl fmt::Display for NodeWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Weight stored on each petgraph edge.
#[derive(Debug, Clone)]
pub struct EdgeWeight {
    /// The caller's edge id (equal to the petgraph edge index).
    pub id: EdgeId,
    /// Display label copied from the [`EdgeSpec`].
    pub label: Option<String>,
}

impl fmt::Display for EdgeWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => f.write_str(label),
            None => write!(f, "{}", self.id),
        }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Adjacency structure for one scheduling run.
///
/// Node and edge ids are dense indices shared with the caller's arrays and
/// with the wrapped petgraph [`DiGraph`]. The per-node outgoing lists are kept
/// separately in natural order (ascending edge id) because petgraph iterates
/// outgoing edges newest-first.
///
/// The graph also owns the classification slot of every edge. It starts as
/// [`RecurType::NonRecurrent`] and is filled in by [`detect_cycles`].
///
/// Construct with [`build_graph`].
#[derive(Debug, Clone)]
pub struct Graph {
    graph: DiGraph<NodeWeight, EdgeWeight>,
    outgoing: Vec<Vec<EdgeId>>,
    sources: Vec<NodeId>,
    targets: Vec<NodeId>,
    entry: NodeId,
    name_to_id: HashMap<String, NodeId>,
    classes: Vec<RecurType>,
}

impl Graph {
    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.targets.len()
    }

    /// Returns the entry node.
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Looks up a node by name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.name_to_id.get(name).copied()
    }

    /// Returns the name of `node`, or `None` if it is out of range.
    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.graph
            .node_weight(node.into())
            .map(|w| w.name.as_str())
    }

    /// Returns the outgoing edges of `node` in natural order.
    ///
    /// Returns an empty slice if `node` is out of range.
    pub fn outgoing(&self, node: NodeId) -> &[EdgeId] {
        self.outgoing
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the source node of `edge`.
    pub fn source(&self, edge: EdgeId) -> Option<NodeId> {
        self.sources.get(edge.index()).copied()
    }

    /// Returns the target node of `edge`.
    pub fn target(&self, edge: EdgeId) -> Option<NodeId> {
        self.targets.get(edge.index()).copied()
    }

    /// Returns `true` when `edge` starts and ends at the same node.
    pub fn is_self_loop(&self, edge: EdgeId) -> bool {
        match (self.source(edge), self.target(edge)) {
            (Some(s), Some(t)) => s == t,
            _ => false,
        }
    }

    /// Returns the current classification of `edge`.
    pub fn recur_type(&self, edge: EdgeId) -> Option<RecurType> {
        self.classes.get(edge.index()).copied()
    }

    /// Returns the classification of every edge, indexed by edge id.
    pub fn classification(&self) -> &[RecurType] {
        &self.classes
    }

    /// Returns the underlying petgraph [`DiGraph`].
    pub fn graph(&self) -> &DiGraph<NodeWeight, EdgeWeight> {
        &self.graph
    }

    /// Replaces the classification with the result of a detection run.
    pub(crate) fn set_classification(&mut self, classes: Vec<RecurType>) {
        debug_assert_eq!(classes.len(), self.edge_count());
        self.classes = classes;
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Builds a [`Graph`] from the caller's node and edge specs.
///
/// Edge classifications carried by `edges` are ignored; the graph starts with
/// every edge [`RecurType::NonRecurrent`].
///
/// # Errors
///
/// - [`ScheduleError::DuplicateNodeName`]: two nodes share a name.
/// - [`ScheduleError::NoEntryNode`] / [`ScheduleError::MultipleEntryNodes`]:
///   not exactly one node is marked as entry.
/// - [`ScheduleError::DanglingEdge`]: an edge endpoint is out of range.
/// - [`ScheduleError::OutOfMemory`]: a working buffer could not be reserved.
pub fn build_graph(nodes: &[NodeSpec], edges: &[EdgeSpec]) -> Result<Graph, ScheduleError> {
    let node_count = nodes.len();
    let edge_count = edges.len();

    let mut graph: DiGraph<NodeWeight, EdgeWeight> =
        DiGraph::with_capacity(node_count, edge_count);
    let mut name_to_id: HashMap<String, NodeId> = HashMap::with_capacity(node_count);
    let mut outgoing: Vec<Vec<EdgeId>> = Vec::new();
    reserve(&mut outgoing, node_count, "outgoing edge lists")?;
    let mut entry: Option<NodeId> = None;

    // Pass 1: nodes.
    for (index, node) in nodes.iter().enumerate() {
        let id = NodeId::new(index);

        match name_to_id.entry(node.name.clone()) {
            Entry::Occupied(existing) => {
                return Err(ScheduleError::DuplicateNodeName {
                    name: node.name.clone(),
                    first: *existing.get(),
                    second: id,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        if node.entry {
            if let Some(first) = entry {
                return Err(ScheduleError::MultipleEntryNodes {
                    first,
                    first_name: nodes
                        .get(first.index())
                        .map(|n| n.name.clone())
                        .unwrap_or_default(),
                    second: id,
                    second_name: node.name.clone(),
                });
            }
            entry = Some(id);
        }

        graph.add_node(NodeWeight {
            name: node.name.clone(),
            entry: node.entry,
        });
        outgoing.push(Vec::new());
    }

    let entry = entry.ok_or(ScheduleError::NoEntryNode { node_count })?;

    // Pass 2: edges.
    let mut sources: Vec<NodeId> = Vec::new();
    let mut targets: Vec<NodeId> = Vec::new();
    reserve(&mut sources, edge_count, "edge sources")?;
    reserve(&mut targets, edge_count, "edge targets")?;

    for (index, edge) in edges.iter().enumerate() {
        let id = EdgeId::new(index);

        for endpoint in [edge.source, edge.target] {
            if endpoint.index() >= node_count {
                return Err(ScheduleError::DanglingEdge {
                    edge: id,
                    node: endpoint,
                    node_count,
                });
            }
        }

        if let Some(list) = outgoing.get_mut(edge.source.index()) {
            list.push(id);
        }
        sources.push(edge.source);
        targets.push(edge.target);
        graph.add_edge(
            edge.source.into(),
            edge.target.into(),
            EdgeWeight {
                id,
                label: edge.label.clone(),
            },
        );
    }

    let mut classes: Vec<RecurType> = Vec::new();
    reserve(&mut classes, edge_count, "edge classification")?;
    classes.resize(edge_count, RecurType::NonRecurrent);

    tracing::debug!(
        nodes = node_count,
        edges = edge_count,
        entry = %entry,
        "built computation graph"
    );

    Ok(Graph {
        graph,
        outgoing,
        sources,
        targets,
        entry,
        name_to_id,
        classes,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
