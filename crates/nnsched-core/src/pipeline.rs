/// Full scheduling pipeline.
///
/// Chains the four stages over one caller-supplied registry:
///
/// 1. [`build_graph`]: validate the registry and build the adjacency.
/// 2. [`detect_cycles_with`]: classify edges and collect loops.
/// 3. [`topo_order`]: reverse the post-order into a node order.
/// 4. [`schedule_edges`]: produce the edge schedule.
///
/// The caller's [`EdgeSpec::recur`] slots are written only after all four
/// stages succeed. A failing run leaves the edges exactly as they were and
/// returns no partial schedule.
///
/// The primary entry point is [`schedule`].
use serde::Serialize;

use crate::error::ScheduleError;
use crate::graph::{
    Cycle, SharedEdge, Traversal, build_graph, detect_cycles_with, overlapping_cycles,
    schedule_edges, topo_order,
};
use crate::ids::{EdgeId, NodeId};
use crate::structures::{EdgeSpec, NodeSpec, RecurType};

// ---------------------------------------------------------------------------
// ScheduleConfig
// ---------------------------------------------------------------------------

/// Configuration for the scheduling pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleConfig {
    /// Depth-first traversal strategy used for cycle detection.
    ///
    /// Default: [`Traversal::Iterative`].
    pub traversal: Traversal,
}

impl ScheduleConfig {
    /// Returns a copy using `traversal`.
    #[must_use]
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// The result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    /// Every node once, sources before targets along non-head edges.
    pub node_order: Vec<NodeId>,
    /// Every edge once, in execution order.
    pub edge_order: Vec<EdgeId>,
    /// Classification of each edge, indexed by edge id.
    pub classification: Vec<RecurType>,
    /// Detected loops in discovery order.
    pub cycles: Vec<Cycle>,
}

impl Schedule {
    /// Position of `edge` in [`Schedule::edge_order`]. Linear scan.
    pub fn edge_position(&self, edge: EdgeId) -> Option<usize> {
        self.edge_order.iter().position(|e| *e == edge)
    }

    /// Position of `node` in [`Schedule::node_order`].
    pub fn node_position(&self, node: NodeId) -> Option<usize> {
        self.node_order.iter().position(|n| *n == node)
    }

    /// Classification of `edge`.
    pub fn recur_type(&self, edge: EdgeId) -> Option<RecurType> {
        self.classification.get(edge.index()).copied()
    }

    /// Edges classified as cycle heads, ascending by id.
    pub fn heads(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.classification
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == RecurType::CycleHead)
            .map(|(i, _)| EdgeId::new(i))
    }

    /// Edges lying on more than one cycle. See [`overlapping_cycles`].
    pub fn shared_edges(&self) -> Vec<SharedEdge> {
        overlapping_cycles(&self.cycles)
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Schedules `nodes` and `edges` with the default [`ScheduleConfig`].
///
/// # Errors
///
/// See [`schedule_with_config`].
pub fn schedule(nodes: &[NodeSpec], edges: &mut [EdgeSpec]) -> Result<Schedule, ScheduleError> {
    schedule_with_config(nodes, edges, &ScheduleConfig::default())
}

/// Schedules `nodes` and `edges` using the given configuration.
///
/// On success every `EdgeSpec::recur` holds the edge's classification.
///
/// # Errors
///
/// Returns the first [`ScheduleError`] raised by any stage. The caller's
/// edges are not modified in that case.
pub fn schedule_with_config(
    nodes: &[NodeSpec],
    edges: &mut [EdgeSpec],
    config: &ScheduleConfig,
) -> Result<Schedule, ScheduleError> {
    let span = tracing::debug_span!(
        "schedule",
        nodes = nodes.len(),
        edges = edges.len(),
        traversal = config.traversal.as_str()
    );
    let _guard = span.enter();

    let mut graph = build_graph(nodes, edges)?;
    let report = detect_cycles_with(&mut graph, config.traversal)?;
    let node_order = topo_order(&report.post_order, graph.node_count())?;
    let edge_order = schedule_edges(&node_order, &graph, &report.cycles)?;

    let classification = graph.classification().to_vec();
    for (spec, class) in edges.iter_mut().zip(&classification) {
        spec.recur = *class;
    }

    tracing::debug!(
        cycles = report.cycles.len(),
        entry = %graph.entry(),
        "schedule complete"
    );

    Ok(Schedule {
        node_order,
        edge_order,
        classification,
        cycles: report.cycles,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
