/// Cycle detection and edge classification.
///
/// A single depth-first traversal from the entry node discovers every
/// back-edge of the graph. Each back-edge closes a loop: it is classified
/// [`RecurType::CycleHead`], and the edges on the traversal path between its
/// target and its source become [`RecurType::CycleBody`]. Every back-edge
/// yields its own [`Cycle`], so loops sharing body edges are reported
/// independently.
///
/// # Algorithm Overview
///
/// Nodes move through three states: unvisited, on path, done. The path is an
/// explicit stack of edge ids (the tree edges from the entry node down to the
/// node currently being expanded). Outgoing edges are visited in natural
/// order. When an edge reaches an on-path node, the path stack is walked from
/// the top downward, collecting edges until one whose target is the
/// back-edge's target; that edge is the way into the loop and is not part of
/// it.
///
/// Nodes are appended to the post-order list as they finish. Reversing it
/// gives the topological order used by [`super::order`].
///
/// Once the traversal completes, every node must be done and every edge must
/// have been passed. Anything left over is unreachable from the entry node,
/// which is a malformed topology.
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, reserve};
use crate::graph::Graph;
use crate::ids::{EdgeId, NodeId};
use crate::structures::RecurType;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One detected loop.
///
/// The head is the edge that closed the loop during traversal. The body lists
/// the remaining loop edges from the head's source back toward its target
/// (the order they were popped off the path stack). A self-loop has an empty
/// body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    head: EdgeId,
    body: Vec<EdgeId>,
}

impl Cycle {
    /// Creates a cycle from its closing edge and body edges.
    pub fn new(head: EdgeId, body: Vec<EdgeId>) -> Self {
        Self { head, body }
    }

    /// The closing edge.
    pub fn head(&self) -> EdgeId {
        self.head
    }

    /// The body edges, top of the path stack first.
    pub fn body(&self) -> &[EdgeId] {
        &self.body
    }

    /// All edges of the loop, head first.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        std::iter::once(self.head).chain(self.body.iter().copied())
    }

    /// Number of edges in the loop, head included.
    pub fn len(&self) -> usize {
        self.body.len() + 1
    }

    /// A cycle always contains its head, so this is always `false`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` when the body is empty, which happens only for an edge
    /// from a node to itself.
    pub fn is_self_loop(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns `true` when `edge` lies on this loop.
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.head == edge || self.body.contains(&edge)
    }
}

/// Result of a successful detection run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CycleReport {
    /// Nodes in completion order (first finished first).
    pub post_order: Vec<NodeId>,
    /// Every detected loop, in discovery order.
    pub cycles: Vec<Cycle>,
}

/// Depth-first traversal strategy.
///
/// Both strategies visit edges in the same order and produce identical
/// reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Traversal {
    /// Explicit frame stack; depth is limited only by heap memory.
    #[default]
    Iterative,
    /// Native recursion; depth is limited by the thread's stack size.
    Recursive,
}

impl Traversal {
    /// Returns the `snake_case` name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Iterative => "iterative",
            Self::Recursive => "recursive",
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Detects and classifies every cycle using the default traversal.
///
/// See [`detect_cycles_with`].
///
/// # Errors
///
/// Same as [`detect_cycles_with`].
pub fn detect_cycles(graph: &mut Graph) -> Result<CycleReport, ScheduleError> {
    detect_cycles_with(graph, Traversal::default())
}

/// Detects and classifies every cycle reachable from the entry node.
///
/// On success the graph's classification is replaced with the result of this
/// run, so calling it twice on the same graph yields identical output. On
/// failure the graph's classification is left as it was.
///
/// # Errors
///
/// - [`ScheduleError::UnreachableNode`]: the first node the traversal never
///   reached.
/// - [`ScheduleError::UntraversedEdge`]: the first edge the traversal never
///   passed.
/// - [`ScheduleError::OutOfMemory`]: a working buffer could not be reserved.
pub fn detect_cycles_with(
    graph: &mut Graph,
    traversal: Traversal,
) -> Result<CycleReport, ScheduleError> {
    let mut detector = Detector::new(graph)?;
    match traversal {
        Traversal::Iterative => detector.run_iterative()?,
        Traversal::Recursive => detector.descend(graph.entry()),
    }
    detector.check_coverage()?;

    let Detector {
        classes,
        post_order,
        cycles,
        ..
    } = detector;

    tracing::debug!(
        traversal = traversal.as_str(),
        cycles = cycles.len(),
        heads = classes.iter().filter(|c| **c == RecurType::CycleHead).count(),
        "cycle detection finished"
    );

    graph.set_classification(classes);
    Ok(CycleReport { post_order, cycles })
}

// ---------------------------------------------------------------------------
// Internal: traversal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnPath,
    Done,
}

struct Detector<'g> {
    graph: &'g Graph,
    state: Vec<Visit>,
    passed: Vec<bool>,
    path: Vec<EdgeId>,
    classes: Vec<RecurType>,
    post_order: Vec<NodeId>,
    cycles: Vec<Cycle>,
}

impl<'g> Detector<'g> {
    fn new(graph: &'g Graph) -> Result<Self, ScheduleError> {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();

        let mut state = Vec::new();
        reserve(&mut state, node_count, "node visit states")?;
        state.resize(node_count, Visit::Unvisited);

        let mut passed = Vec::new();
        reserve(&mut passed, edge_count, "edge pass flags")?;
        passed.resize(edge_count, false);

        let mut classes = Vec::new();
        reserve(&mut classes, edge_count, "edge classification")?;
        classes.resize(edge_count, RecurType::NonRecurrent);

        let mut post_order = Vec::new();
        reserve(&mut post_order, node_count, "post-order list")?;

        Ok(Self {
            graph,
            state,
            passed,
            path: Vec::new(),
            classes,
            post_order,
            cycles: Vec::new(),
        })
    }

    fn state(&self, node: NodeId) -> Visit {
        self.state
            .get(node.index())
            .copied()
            .unwrap_or(Visit::Done)
    }

    fn set_state(&mut self, node: NodeId, visit: Visit) {
        if let Some(slot) = self.state.get_mut(node.index()) {
            *slot = visit;
        }
    }

    /// Passes `edge` and returns its target when the traversal should
    /// descend into it.
    fn visit_edge(&mut self, edge: EdgeId) -> Option<NodeId> {
        if let Some(flag) = self.passed.get_mut(edge.index()) {
            *flag = true;
        }
        let target = self.graph.target(edge)?;
        match self.state(target) {
            Visit::Unvisited => Some(target),
            Visit::OnPath => {
                self.close_cycle(edge, target);
                None
            }
            Visit::Done => None,
        }
    }

    fn close_cycle(&mut self, head: EdgeId, target: NodeId) {
        if let Some(slot) = self.classes.get_mut(head.index()) {
            *slot = RecurType::CycleHead;
        }

        let mut body = Vec::new();
        for &edge in self.path.iter().rev() {
            if self.graph.target(edge) == Some(target) {
                break;
            }
            body.push(edge);
        }

        for &edge in &body {
            if let Some(slot) = self.classes.get_mut(edge.index()) {
                if *slot == RecurType::NonRecurrent {
                    *slot = RecurType::CycleBody;
                }
            }
        }

        tracing::trace!(
            head = %head,
            target = %target,
            body_len = body.len(),
            "closed cycle"
        );
        self.cycles.push(Cycle::new(head, body));
    }

    fn finish(&mut self, node: NodeId) {
        self.set_state(node, Visit::Done);
        self.post_order.push(node);
    }

    fn run_iterative(&mut self) -> Result<(), ScheduleError> {
        let graph = self.graph;
        let entry = graph.entry();

        // Each frame is a node plus the position of its next outgoing edge.
        let mut frames: Vec<(NodeId, usize)> = Vec::new();
        reserve(&mut frames, 1, "traversal frames")?;
        frames.push((entry, 0));
        self.set_state(entry, Visit::OnPath);

        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;
            match graph.outgoing(node).get(next).copied() {
                Some(edge) => {
                    frame.1 += 1;
                    if let Some(target) = self.visit_edge(edge) {
                        self.set_state(target, Visit::OnPath);
                        self.path.push(edge);
                        frames.push((target, 0));
                    }
                }
                None => {
                    frames.pop();
                    self.finish(node);
                    if !frames.is_empty() {
                        self.path.pop();
                    }
                }
            }
        }
        Ok(())
    }

    fn descend(&mut self, node: NodeId) {
        let graph = self.graph;
        self.set_state(node, Visit::OnPath);
        for &edge in graph.outgoing(node) {
            if let Some(target) = self.visit_edge(edge) {
                self.path.push(edge);
                self.descend(target);
                self.path.pop();
            }
        }
        self.finish(node);
    }

    fn check_coverage(&self) -> Result<(), ScheduleError> {
        if let Some(index) = self.state.iter().position(|s| *s != Visit::Done) {
            let node = NodeId::new(index);
            return Err(ScheduleError::UnreachableNode {
                node,
                name: self.graph.node_name(node).unwrap_or_default().to_owned(),
            });
        }
        if let Some(index) = self.passed.iter().position(|p| !*p) {
            return Err(ScheduleError::UntraversedEdge {
                edge: EdgeId::new(index),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::graph::build_graph;
    use crate::structures::{EdgeSpec, NodeSpec};

    // -----------------------------------------------------------------------
    // Fixture helpers
    // -----------------------------------------------------------------------

    /// Builds a graph whose node 0 is the entry and the rest are named `n1`,
    /// `n2`, ...
    fn graph(node_count: usize, edges: &[(usize, usize)]) -> Graph {
        let nodes: Vec<NodeSpec> = (0..node_count)
            .map(|i| {
                if i == 0 {
                    NodeSpec::entry("n0")
                } else {
                    NodeSpec::new(format!("n{i}"))
                }
            })
            .collect();
        let edges: Vec<EdgeSpec> = edges.iter().map(|&(s, t)| EdgeSpec::new(s, t)).collect();
        build_graph(&nodes, &edges).expect("valid graph")
    }

    fn e(index: usize) -> EdgeId {
        EdgeId::new(index)
    }

    fn n(index: usize) -> NodeId {
        NodeId::new(index)
    }

    fn both(g: &Graph) -> (CycleReport, CycleReport) {
        let mut a = g.clone();
        let mut b = g.clone();
        let iterative = detect_cycles_with(&mut a, Traversal::Iterative).expect("iterative");
        let recursive = detect_cycles_with(&mut b, Traversal::Recursive).expect("recursive");
        assert_eq!(a.classification(), b.classification());
        (iterative, recursive)
    }

    // -----------------------------------------------------------------------
    // Acyclic graphs
    // -----------------------------------------------------------------------

    #[test]
    fn test_acyclic_chain_has_no_cycles() {
        let mut g = graph(3, &[(0, 1), (1, 2)]);
        let report = detect_cycles(&mut g).expect("detects");
        assert!(report.cycles.is_empty());
        assert!(
            g.classification()
                .iter()
                .all(|c| *c == RecurType::NonRecurrent)
        );
        assert_eq!(report.post_order, vec![n(2), n(1), n(0)]);
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        // 0 -> 1 -> 3 and 0 -> 2 -> 3: node 3 is done when reached again.
        let mut g = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let report = detect_cycles(&mut g).expect("detects");
        assert!(report.cycles.is_empty());
        assert_eq!(report.post_order, vec![n(3), n(1), n(2), n(0)]);
    }

    #[test]
    fn test_single_node_without_edges() {
        let mut g = graph(1, &[]);
        let report = detect_cycles(&mut g).expect("detects");
        assert_eq!(report.post_order, vec![n(0)]);
        assert!(report.cycles.is_empty());
    }

    // -----------------------------------------------------------------------
    // Cycles
    // -----------------------------------------------------------------------

    #[test]
    fn test_self_loop_is_cycle_of_body_length_zero() {
        let mut g = graph(2, &[(0, 1), (1, 1)]);
        let report = detect_cycles(&mut g).expect("detects");
        assert_eq!(report.cycles, vec![Cycle::new(e(1), vec![])]);
        assert!(report.cycles[0].is_self_loop());
        assert_eq!(g.recur_type(e(1)), Some(RecurType::CycleHead));
        assert_eq!(g.recur_type(e(0)), Some(RecurType::NonRecurrent));
    }

    #[test]
    fn test_self_loop_on_entry_node() {
        let mut g = graph(1, &[(0, 0)]);
        let report = detect_cycles(&mut g).expect("detects");
        assert_eq!(report.cycles, vec![Cycle::new(e(0), vec![])]);
        assert_eq!(g.recur_type(e(0)), Some(RecurType::CycleHead));
    }

    #[test]
    fn test_simple_triangle() {
        // A -> B -> C -> A with A as entry.
        let mut g = graph(3, &[(0, 1), (1, 2), (2, 0)]);
        let report = detect_cycles(&mut g).expect("detects");

        assert_eq!(report.cycles.len(), 1);
        let cycle = &report.cycles[0];
        assert_eq!(cycle.head(), e(2));
        assert_eq!(cycle.body(), &[e(1), e(0)]);
        assert_eq!(cycle.len(), 3);

        assert_eq!(g.recur_type(e(2)), Some(RecurType::CycleHead));
        assert_eq!(g.recur_type(e(0)), Some(RecurType::CycleBody));
        assert_eq!(g.recur_type(e(1)), Some(RecurType::CycleBody));
    }

    #[test]
    fn test_entry_edge_is_not_part_of_cycle() {
        // E -> H1, H1 -> H2, H2 -> H1.
        let mut g = graph(3, &[(0, 1), (1, 2), (2, 1)]);
        let report = detect_cycles(&mut g).expect("detects");

        assert_eq!(report.cycles, vec![Cycle::new(e(2), vec![e(1)])]);
        assert_eq!(
            g.classification(),
            &[
                RecurType::NonRecurrent,
                RecurType::CycleBody,
                RecurType::CycleHead
            ]
        );
        assert_eq!(report.post_order.last(), Some(&n(0)));
    }

    #[test]
    fn test_cycles_sharing_body_edges_are_independent() {
        // 0 -> 1 -> 2 -> 3, with back-edges 3 -> 1 and 3 -> 2.
        let mut g = graph(4, &[(0, 1), (1, 2), (2, 3), (3, 1), (3, 2)]);
        let report = detect_cycles(&mut g).expect("detects");

        assert_eq!(
            report.cycles,
            vec![
                Cycle::new(e(3), vec![e(2), e(1)]),
                Cycle::new(e(4), vec![e(2)]),
            ]
        );
        assert_eq!(g.recur_type(e(2)), Some(RecurType::CycleBody));
        assert_eq!(g.recur_type(e(3)), Some(RecurType::CycleHead));
        assert_eq!(g.recur_type(e(4)), Some(RecurType::CycleHead));
        assert_eq!(g.recur_type(e(0)), Some(RecurType::NonRecurrent));
    }

    #[test]
    fn test_cross_edge_into_finished_node_is_not_a_cycle() {
        // 0 -> 1 -> 2 -> 1 (cycle), then 0 -> 2 reaches a done node.
        let mut g = graph(3, &[(0, 1), (1, 2), (2, 1), (0, 2)]);
        let report = detect_cycles(&mut g).expect("detects");
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(g.recur_type(e(3)), Some(RecurType::NonRecurrent));
    }

    #[test]
    fn test_cycle_contains_and_edges() {
        let cycle = Cycle::new(e(5), vec![e(2), e(1)]);
        assert!(cycle.contains(e(5)));
        assert!(cycle.contains(e(1)));
        assert!(!cycle.contains(e(0)));
        assert_eq!(cycle.edges().collect::<Vec<_>>(), vec![e(5), e(2), e(1)]);
        assert!(!cycle.is_empty());
    }

    // -----------------------------------------------------------------------
    // Coverage
    // -----------------------------------------------------------------------

    #[test]
    fn test_unreachable_node_is_reported() {
        let mut g = graph(3, &[(0, 1)]);
        let err = detect_cycles(&mut g).expect_err("node 2 unreachable");
        assert_eq!(
            err,
            ScheduleError::UnreachableNode {
                node: n(2),
                name: "n2".to_owned(),
            }
        );
    }

    #[test]
    fn test_edge_into_entry_from_unreachable_node_is_reported() {
        // Node 2 only points at the entry; nothing reaches it.
        let mut g = graph(3, &[(0, 1), (2, 0)]);
        let err = detect_cycles(&mut g).expect_err("node 2 unreachable");
        assert!(matches!(err, ScheduleError::UnreachableNode { node, .. } if node == n(2)));
    }

    #[test]
    fn test_failure_leaves_classification_untouched() {
        let mut g = graph(3, &[(0, 0)]);
        assert!(detect_cycles(&mut g).is_err());
        assert_eq!(g.recur_type(e(0)), Some(RecurType::NonRecurrent));
    }

    // -----------------------------------------------------------------------
    // Determinism
    // -----------------------------------------------------------------------

    #[test]
    fn test_detection_is_idempotent() {
        let mut g = graph(4, &[(0, 1), (1, 2), (2, 3), (3, 1), (3, 3), (2, 0)]);
        let first = detect_cycles(&mut g).expect("first run");
        let first_classes = g.classification().to_vec();
        let second = detect_cycles(&mut g).expect("second run");
        assert_eq!(first, second);
        assert_eq!(first_classes, g.classification());
    }

    #[test]
    fn test_traversals_agree() {
        let g = graph(
            6,
            &[
                (0, 1),
                (1, 2),
                (2, 1),
                (2, 3),
                (3, 3),
                (3, 4),
                (4, 1),
                (4, 5),
                (5, 0),
                (1, 5),
            ],
        );
        let (iterative, recursive) = both(&g);
        assert_eq!(iterative, recursive);
    }

    #[test]
    fn test_deep_chain_does_not_need_native_stack() {
        let edges: Vec<(usize, usize)> = (0..50_000).map(|i| (i, i + 1)).collect();
        let mut g = graph(50_001, &edges);
        let report = detect_cycles_with(&mut g, Traversal::Iterative).expect("detects");
        assert_eq!(report.post_order.len(), 50_001);
        assert_eq!(report.post_order.first(), Some(&n(50_000)));
    }

    #[test]
    fn test_traversal_serializes_snake_case() {
        let json = serde_json::to_string(&Traversal::Recursive).expect("serializes");
        assert_eq!(json, "\"recursive\"");
        assert_eq!(Traversal::default(), Traversal::Iterative);
    }
}
