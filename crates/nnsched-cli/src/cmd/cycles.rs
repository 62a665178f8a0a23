//! Implementation of `nnsched cycles <file>`.
//!
//! Output (human mode): one block per cycle, head edge first, then the body
//! edges in traversal order.
//! Output (JSON mode): `{"cycles": [{"head": {...}, "body": [...]}], "count": N}`.
//!
//! Exit codes: 0 = success (including zero cycles), 1 = scheduling failure,
//! 2 = input failure.
use std::io::Write;

use nnsched_core::{Cycle, EdgeId, EdgeSpec, NodeSpec};
use serde_json::json;

use super::{Context, Scheduled, load_and_schedule, with_stdout};
use crate::error::CliError;
use crate::format::describe_edge;
use crate::{OutputFormat, PathOrStdin};

/// Runs the `cycles` command.
///
/// # Errors
///
/// See [`load_and_schedule`].
pub fn run(file: &PathOrStdin, ctx: &Context) -> Result<(), CliError> {
    let Scheduled { registry, schedule } = load_and_schedule(file, ctx)?;
    with_stdout(|out| match ctx.format {
        OutputFormat::Human => print_human(out, &registry.nodes, &registry.edges, &schedule.cycles),
        OutputFormat::Json => print_json(out, &registry.nodes, &registry.edges, &schedule.cycles),
    })
}

fn print_human(
    out: &mut dyn Write,
    nodes: &[NodeSpec],
    edges: &[EdgeSpec],
    cycles: &[Cycle],
) -> std::io::Result<()> {
    if cycles.is_empty() {
        return writeln!(out, "no cycles");
    }
    for (index, cycle) in cycles.iter().enumerate() {
        let kind = if cycle.is_self_loop() {
            "self-loop"
        } else {
            "cycle"
        };
        writeln!(out, "{kind} {index} ({} edge(s))", cycle.len())?;
        writeln!(out, "  head  {}", describe_edge(cycle.head(), nodes, edges))?;
        for &edge in cycle.body() {
            writeln!(out, "  body  {}", describe_edge(edge, nodes, edges))?;
        }
    }
    Ok(())
}

fn edge_json(edge: EdgeId, nodes: &[NodeSpec], edges: &[EdgeSpec]) -> serde_json::Value {
    let spec = edges.get(edge.index());
    let name = |i: usize| nodes.get(i).map(|n| n.name.as_str());
    json!({
        "id": edge,
        "label": spec.and_then(|s| s.label.as_deref()),
        "source": spec.and_then(|s| name(s.source.index())),
        "target": spec.and_then(|s| name(s.target.index())),
    })
}

fn print_json(
    out: &mut dyn Write,
    nodes: &[NodeSpec],
    edges: &[EdgeSpec],
    cycles: &[Cycle],
) -> std::io::Result<()> {
    let entries: Vec<serde_json::Value> = cycles
        .iter()
        .map(|cycle| {
            let body: Vec<serde_json::Value> = cycle
                .body()
                .iter()
                .map(|&edge| edge_json(edge, nodes, edges))
                .collect();
            json!({
                "head": edge_json(cycle.head(), nodes, edges),
                "body": body,
            })
        })
        .collect();
    let doc = json!({ "cycles": entries, "count": cycles.len() });
    serde_json::to_writer_pretty(&mut *out, &doc).map_err(std::io::Error::from)?;
    writeln!(out)
}
