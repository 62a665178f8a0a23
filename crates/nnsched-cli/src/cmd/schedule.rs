//! Implementation of `nnsched schedule <file>`.
//!
//! Loads a topology, runs the scheduling pipeline and writes the node order
//! and the edge schedule to stdout.
//!
//! Output (human mode): a numbered node list, then a numbered edge list with
//! each edge's classification.
//! Output (JSON mode): `{"node_order": [...], "edge_order": [...], "cycles": N}`.
//!
//! Exit codes: 0 = success, 1 = scheduling failure, 2 = input failure.
use std::io::Write;

use nnsched_core::{EdgeSpec, NodeSpec, Schedule};
use serde_json::json;

use super::{Context, Scheduled, load_and_schedule, with_stdout};
use crate::error::CliError;
use crate::format::{describe_edge, paint_recur};
use crate::{OutputFormat, PathOrStdin};

/// Runs the `schedule` command.
///
/// # Errors
///
/// See [`load_and_schedule`]; also [`CliError::IoError`] if stdout cannot
/// be written.
pub fn run(file: &PathOrStdin, ctx: &Context) -> Result<(), CliError> {
    let Scheduled { registry, schedule } = load_and_schedule(file, ctx)?;
    with_stdout(|out| match ctx.format {
        OutputFormat::Human => print_human(
            out,
            &registry.nodes,
            &registry.edges,
            &schedule,
            ctx.colors,
        ),
        OutputFormat::Json => print_json(out, &registry.nodes, &registry.edges, &schedule),
    })
}

fn print_human(
    out: &mut dyn Write,
    nodes: &[NodeSpec],
    edges: &[EdgeSpec],
    schedule: &Schedule,
    colors: bool,
) -> std::io::Result<()> {
    writeln!(out, "node order:")?;
    for (position, node) in schedule.node_order.iter().enumerate() {
        let name = nodes.get(node.index()).map_or("?", |n| n.name.as_str());
        writeln!(out, "  {position:>3}  {name}")?;
    }

    writeln!(out, "edge schedule:")?;
    for (position, &edge) in schedule.edge_order.iter().enumerate() {
        let recur = edges.get(edge.index()).map(|e| e.recur).unwrap_or_default();
        writeln!(
            out,
            "  {position:>3}  {}  [{}]",
            describe_edge(edge, nodes, edges),
            paint_recur(recur, colors)
        )?;
    }

    writeln!(out, "{} cycle(s)", schedule.cycles.len())
}

fn print_json(
    out: &mut dyn Write,
    nodes: &[NodeSpec],
    edges: &[EdgeSpec],
    schedule: &Schedule,
) -> std::io::Result<()> {
    let node_order: Vec<serde_json::Value> = schedule
        .node_order
        .iter()
        .map(|node| {
            json!({
                "id": node,
                "name": nodes.get(node.index()).map(|n| n.name.as_str()),
            })
        })
        .collect();

    let edge_order: Vec<serde_json::Value> = schedule
        .edge_order
        .iter()
        .filter_map(|&edge| {
            let spec = edges.get(edge.index())?;
            Some(json!({
                "id": edge,
                "label": spec.label,
                "source": nodes.get(spec.source.index()).map(|n| n.name.as_str()),
                "target": nodes.get(spec.target.index()).map(|n| n.name.as_str()),
                "recur": spec.recur,
            }))
        })
        .collect();

    let doc = json!({
        "node_order": node_order,
        "edge_order": edge_order,
        "cycles": schedule.cycles.len(),
    });
    serde_json::to_writer_pretty(&mut *out, &doc).map_err(std::io::Error::from)?;
    writeln!(out)
}
