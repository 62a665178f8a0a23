/// Linear edge scheduling.
///
/// Nodes are walked in topological order and each contributes its outgoing
/// edges in natural order. Cycle-head edges are the exception: a head is
/// pulled out of its source's block and emitted right before its target's
/// block, so that the value it carries from the previous time step is in
/// place before the target node fires.
///
/// Self-loop heads stay in their node's block, since source and target are
/// the same node.
use crate::error::{ScheduleError, reserve};
use crate::graph::Graph;
use crate::graph::cycles::Cycle;
use crate::ids::{EdgeId, NodeId};

/// Produces the edge schedule for `graph`.
///
/// `node_order` is normally the output of [`super::topo_order`] and `cycles`
/// the loops found by [`super::detect_cycles`]. Head edges targeting the same
/// node are emitted ascending by the rank of their source in `node_order`,
/// then by edge id.
///
/// # Errors
///
/// - [`ScheduleError::NodeOrderInvalid`]: `node_order` names a node outside
///   the graph.
/// - [`ScheduleError::EdgeScheduleLength`],
///   [`ScheduleError::EdgeScheduleDuplicate`],
///   [`ScheduleError::EdgeScheduleMissing`]: the result is not a
///   permutation of the graph's edges.
/// - [`ScheduleError::OutOfMemory`]: a working buffer could not be reserved.
pub fn schedule_edges(
    node_order: &[NodeId],
    graph: &Graph,
    cycles: &[Cycle],
) -> Result<Vec<EdgeId>, ScheduleError> {
    let node_count = graph.node_count();
    let edge_count = graph.edge_count();

    let mut rank: Vec<usize> = Vec::new();
    reserve(&mut rank, node_count, "node ranks")?;
    rank.resize(node_count, usize::MAX);
    for (position, &node) in node_order.iter().enumerate() {
        match rank.get_mut(node.index()) {
            Some(slot) => *slot = position,
            None => {
                return Err(ScheduleError::NodeOrderInvalid { node, node_count });
            }
        }
    }

    // Non-self-loop heads, flagged per edge and grouped by target.
    let mut spliced: Vec<bool> = Vec::new();
    reserve(&mut spliced, edge_count, "head flags")?;
    spliced.resize(edge_count, false);

    let mut heads_by_target: Vec<Vec<EdgeId>> = Vec::new();
    reserve(&mut heads_by_target, node_count, "head groups")?;
    heads_by_target.resize_with(node_count, Vec::new);

    for cycle in cycles {
        let head = cycle.head();
        if graph.is_self_loop(head) {
            continue;
        }
        let (Some(flag), Some(target)) = (spliced.get_mut(head.index()), graph.target(head))
        else {
            continue;
        };
        if *flag {
            continue;
        }
        *flag = true;
        if let Some(group) = heads_by_target.get_mut(target.index()) {
            group.push(head);
        }
    }

    let source_rank = |edge: EdgeId| {
        graph
            .source(edge)
            .and_then(|s| rank.get(s.index()).copied())
            .unwrap_or(usize::MAX)
    };
    for group in &mut heads_by_target {
        group.sort_by_key(|&edge| (source_rank(edge), edge));
    }

    let mut order: Vec<EdgeId> = Vec::new();
    reserve(&mut order, edge_count, "edge schedule")?;

    for &node in node_order {
        if let Some(group) = heads_by_target.get(node.index()) {
            order.extend_from_slice(group);
        }
        order.extend(
            graph
                .outgoing(node)
                .iter()
                .copied()
                .filter(|edge| !spliced.get(edge.index()).copied().unwrap_or(false)),
        );
    }

    validate(&order, edge_count)?;

    tracing::debug!(
        edges = order.len(),
        spliced = spliced.iter().filter(|f| **f).count(),
        "edge schedule ready"
    );
    Ok(order)
}

/// Checks that `order` is a permutation of `0..edge_count`.
fn validate(order: &[EdgeId], edge_count: usize) -> Result<(), ScheduleError> {
    if order.len() != edge_count {
        return Err(ScheduleError::EdgeScheduleLength {
            expected: edge_count,
            actual: order.len(),
        });
    }

    let mut seen: Vec<bool> = Vec::new();
    reserve(&mut seen, edge_count, "edge schedule check")?;
    seen.resize(edge_count, false);

    for &edge in order {
        if let Some(slot) = seen.get_mut(edge.index()) {
            if *slot {
                return Err(ScheduleError::EdgeScheduleDuplicate { edge });
            }
            *slot = true;
        }
    }

    match seen.iter().position(|s| !*s) {
        Some(index) => Err(ScheduleError::EdgeScheduleMissing {
            edge: EdgeId::new(index),
        }),
        None => Ok(()),
    }
}
