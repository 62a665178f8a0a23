//! Post-pipeline invariant checkers for correctness validation.
//!
//! Each checker returns `Err` with a description of the first violation.

use std::collections::HashSet;

use nnsched_core::{EdgeId, EdgeSpec, Graph, NodeId, NodeSpec, RecurType, Schedule};
use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::DiGraph;

/// Verifies graph construction invariants.
pub fn check_graph_invariants(
    nodes: &[NodeSpec],
    edges: &[EdgeSpec],
    graph: &Graph,
) -> Result<(), String> {
    if graph.node_count() != nodes.len() {
        return Err(format!(
            "node count mismatch: graph={}, registry={}",
            graph.node_count(),
            nodes.len()
        ));
    }
    if graph.edge_count() != edges.len() {
        return Err(format!(
            "edge count mismatch: graph={}, registry={}",
            graph.edge_count(),
            edges.len()
        ));
    }
    for (i, node) in nodes.iter().enumerate() {
        if graph.node_id(&node.name) != Some(NodeId::new(i)) {
            return Err(format!("node {:?} not found at #{i}", node.name));
        }
    }
    let entry = graph.entry();
    if nodes.get(entry.index()).is_none_or(|n| !n.entry) {
        return Err(format!("entry {entry} is not marked as entry"));
    }
    for (i, edge) in edges.iter().enumerate() {
        let id = EdgeId::new(i);
        if graph.source(id) != Some(edge.source) || graph.target(id) != Some(edge.target) {
            return Err(format!("edge {id} endpoints differ from registry"));
        }
    }
    Ok(())
}

/// Verifies that `order` holds every id in `0..count` exactly once.
pub fn check_permutation(order: &[usize], count: usize, what: &str) -> Result<(), String> {
    if order.len() != count {
        return Err(format!(
            "{what} order has {} entries, expected {count}",
            order.len()
        ));
    }
    let mut seen = vec![false; count];
    for &index in order {
        match seen.get_mut(index) {
            None => return Err(format!("{what} {index} out of range")),
            Some(true) => return Err(format!("{what} {index} appears twice")),
            Some(slot) => *slot = true,
        }
    }
    Ok(())
}

/// Verifies both orders of `schedule` are permutations.
pub fn check_coverage(
    nodes: &[NodeSpec],
    edges: &[EdgeSpec],
    schedule: &Schedule,
) -> Result<(), String> {
    let node_order: Vec<usize> = schedule.node_order.iter().map(|n| n.index()).collect();
    check_permutation(&node_order, nodes.len(), "node")?;
    let edge_order: Vec<usize> = schedule.edge_order.iter().map(|e| e.index()).collect();
    check_permutation(&edge_order, edges.len(), "edge")
}

/// Verifies that every non-head edge runs forward in the node order.
pub fn check_forward_edges(edges: &[EdgeSpec], schedule: &Schedule) -> Result<(), String> {
    for (i, edge) in edges.iter().enumerate() {
        if edge.recur == RecurType::CycleHead {
            continue;
        }
        let source = schedule.node_position(edge.source);
        let target = schedule.node_position(edge.target);
        if source >= target {
            return Err(format!(
                "non-head edge e{i} runs from position {source:?} to {target:?}"
            ));
        }
    }
    Ok(())
}

/// Verifies that the edge schedule visits nodes in node order.
///
/// Each edge is anchored at its target when it is a cycle head and at its
/// source otherwise; anchor positions must never decrease along the
/// schedule.
pub fn check_edge_grouping(edges: &[EdgeSpec], schedule: &Schedule) -> Result<(), String> {
    let mut last = 0usize;
    for (position, &id) in schedule.edge_order.iter().enumerate() {
        let edge = edges
            .get(id.index())
            .ok_or_else(|| format!("edge {id} out of range"))?;
        let anchor = if edge.recur == RecurType::CycleHead {
            edge.target
        } else {
            edge.source
        };
        let rank = schedule
            .node_position(anchor)
            .ok_or_else(|| format!("node {anchor} missing from node order"))?;
        if rank < last {
            return Err(format!(
                "edge {id} at schedule position {position} belongs to node rank {rank}, \
                 after rank {last}"
            ));
        }
        last = rank;
    }
    Ok(())
}

/// Builds a plain petgraph copy of the registry, keeping the edges `keep`
/// selects.
fn to_digraph(
    nodes: &[NodeSpec],
    edges: &[EdgeSpec],
    keep: impl Fn(&EdgeSpec) -> bool,
) -> Result<DiGraph<(), ()>, String> {
    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(nodes.len(), edges.len());
    let indices: Vec<_> = nodes.iter().map(|_| graph.add_node(())).collect();
    for edge in edges.iter().filter(|e| keep(e)) {
        let (Some(&s), Some(&t)) = (
            indices.get(edge.source.index()),
            indices.get(edge.target.index()),
        ) else {
            return Err(format!("edge {} -> {} out of range", edge.source, edge.target));
        };
        graph.add_edge(s, t, ());
    }
    Ok(graph)
}

/// Verifies that removing every cycle head leaves an acyclic graph.
pub fn check_heads_break_cycles(nodes: &[NodeSpec], edges: &[EdgeSpec]) -> Result<(), String> {
    let graph = to_digraph(nodes, edges, |e| e.recur != RecurType::CycleHead)?;
    if is_cyclic_directed(&graph) {
        return Err("graph without cycle heads still has a cycle".to_owned());
    }
    Ok(())
}

/// Verifies that every recurrent edge lies inside one strongly connected
/// component.
pub fn check_recurrent_edges_in_scc(nodes: &[NodeSpec], edges: &[EdgeSpec]) -> Result<(), String> {
    let graph = to_digraph(nodes, edges, |_| true)?;
    let mut component = vec![usize::MAX; nodes.len()];
    for (c, members) in tarjan_scc(&graph).into_iter().enumerate() {
        for node in members {
            component[node.index()] = c;
        }
    }
    for (i, edge) in edges.iter().enumerate() {
        if edge.recur.is_recurrent()
            && component[edge.source.index()] != component[edge.target.index()]
        {
            return Err(format!("recurrent edge e{i} crosses components"));
        }
    }
    Ok(())
}

/// Verifies that every cycle is a closed walk made of recurrent edges, with
/// a `CycleHead` head, and that no two cycles share a head.
pub fn check_cycles(edges: &[EdgeSpec], schedule: &Schedule) -> Result<(), String> {
    let mut heads = HashSet::new();
    for (c, cycle) in schedule.cycles.iter().enumerate() {
        if !heads.insert(cycle.head()) {
            return Err(format!("cycle {c} repeats head {}", cycle.head()));
        }
        let walk: Vec<&EdgeSpec> = cycle
            .edges()
            .map(|id| edges.get(id.index()).ok_or_else(|| format!("edge {id} out of range")))
            .collect::<Result<_, _>>()?;
        let Some(head) = walk.first() else {
            return Err(format!("cycle {c} is empty"));
        };
        if head.recur != RecurType::CycleHead {
            return Err(format!("cycle {c} head {} is {}", cycle.head(), head.recur));
        }
        if walk.iter().any(|e| !e.recur.is_recurrent()) {
            return Err(format!("cycle {c} contains a non-recurrent edge"));
        }
        for pair in walk.windows(2) {
            if pair[0].source != pair[1].target {
                return Err(format!("cycle {c} is not a connected walk"));
            }
        }
        let last = walk.last().unwrap_or(head);
        if last.source != head.target {
            return Err(format!("cycle {c} does not close on its head"));
        }
    }
    Ok(())
}

/// Runs every schedule checker.
pub fn check_all(nodes: &[NodeSpec], edges: &[EdgeSpec], schedule: &Schedule) -> Result<(), String> {
    check_coverage(nodes, edges, schedule)?;
    check_forward_edges(edges, schedule)?;
    check_edge_grouping(edges, schedule)?;
    check_heads_break_cycles(nodes, edges)?;
    check_recurrent_edges_in_scc(nodes, edges)?;
    check_cycles(edges, schedule)
}
