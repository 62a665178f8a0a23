/// Graphviz DOT rendering of a scheduled computation graph.
///
/// Rendering goes through [`petgraph::dot::Dot`] over the graph built by
/// [`build_graph`]. Edge colour follows [`EdgeSpec::recur`], so render after
/// a successful [`crate::schedule`] run to see the classification.
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};

use crate::error::ScheduleError;
use crate::graph::{EdgeWeight, NodeWeight, build_graph};
use crate::pipeline::Schedule;
use crate::structures::{EdgeSpec, NodeSpec, RecurType};

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DotOptions {
    /// Append each edge's position in the schedule to its label.
    pub show_order: bool,
}

fn edge_color(recur: RecurType) -> Option<&'static str> {
    match recur {
        RecurType::NonRecurrent => None,
        RecurType::CycleHead => Some("red"),
        RecurType::CycleBody => Some("blue"),
    }
}

/// Renders `nodes` and `edges` as a DOT digraph.
///
/// The entry node is drawn as a box. Cycle-head edges are red, cycle-body
/// edges blue. Edge labels come from [`EdgeSpec::label`], falling back to the
/// edge id. With [`DotOptions::show_order`] and a `schedule`, labels also
/// carry the edge's schedule position.
///
/// # Errors
///
/// Returns the [`ScheduleError`] raised by [`build_graph`] for a malformed
/// registry.
pub fn render_dot(
    nodes: &[NodeSpec],
    edges: &[EdgeSpec],
    schedule: Option<&Schedule>,
    options: &DotOptions,
) -> Result<String, ScheduleError> {
    type Inner = DiGraph<NodeWeight, EdgeWeight>;

    let graph = build_graph(nodes, edges)?;

    // Schedule position per edge id.
    let mut positions: Vec<Option<usize>> = vec![None; edges.len()];
    if options.show_order {
        if let Some(schedule) = schedule {
            for (position, edge) in schedule.edge_order.iter().enumerate() {
                if let Some(slot) = positions.get_mut(edge.index()) {
                    *slot = Some(position);
                }
            }
        }
    }

    let edge_attrs = |_: &Inner, edge: EdgeReference<'_, EdgeWeight>| {
        let weight = edge.weight();
        let mut label = weight.to_string();
        if let Some(position) = positions.get(weight.id.index()).copied().flatten() {
            label = format!("{label} #{position}");
        }
        let recur = edges
            .get(weight.id.index())
            .map(|e| e.recur)
            .unwrap_or_default();
        match edge_color(recur) {
            Some(color) => format!("label = {label:?}, color = {color}, fontcolor = {color}"),
            None => format!("label = {label:?}"),
        }
    };
    let node_attrs = |_: &Inner, (_, weight): (NodeIndex, &NodeWeight)| {
        if weight.entry {
            format!("label = {:?}, shape = box", weight.name)
        } else {
            format!("label = {:?}", weight.name)
        }
    };

    let dot = Dot::with_attr_getters(
        graph.graph(),
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &edge_attrs,
        &node_attrs,
    );
    Ok(format!("{dot}"))
}
