/// Topological node ordering.
///
/// Reversing a depth-first post-order puts every node before the targets of
/// its non-head outgoing edges. Head edges point back up the traversal path,
/// which is exactly why they are the ones carrying values across time steps.
use crate::error::{ScheduleError, reserve};
use crate::ids::NodeId;

/// Returns the reversed `post_order`, checked to be a permutation of
/// `0..node_count`.
///
/// # Errors
///
/// - [`ScheduleError::NodeOrderLength`]: wrong number of entries.
/// - [`ScheduleError::NodeOrderDuplicate`]: an entry repeats.
/// - [`ScheduleError::NodeOrderMissing`]: a node is absent.
/// - [`ScheduleError::OutOfMemory`]: a working buffer could not be reserved.
pub fn topo_order(
    post_order: &[NodeId],
    node_count: usize,
) -> Result<Vec<NodeId>, ScheduleError> {
    if post_order.len() != node_count {
        return Err(ScheduleError::NodeOrderLength {
            expected: node_count,
            actual: post_order.len(),
        });
    }

    let mut seen: Vec<bool> = Vec::new();
    reserve(&mut seen, node_count, "node order check")?;
    seen.resize(node_count, false);

    let mut order: Vec<NodeId> = Vec::new();
    reserve(&mut order, node_count, "node order")?;

    for &node in post_order.iter().rev() {
        if let Some(slot) = seen.get_mut(node.index()) {
            if *slot {
                return Err(ScheduleError::NodeOrderDuplicate { node });
            }
            *slot = true;
        }
        order.push(node);
    }

    // An out-of-range entry leaves some in-range node unseen.
    if let Some(index) = seen.iter().position(|s| !*s) {
        return Err(ScheduleError::NodeOrderMissing {
            node: NodeId::new(index),
        });
    }

    tracing::debug!(nodes = order.len(), "topological order ready");
    Ok(order)
}
