//! Implementation of `nnsched check <file>`.
//!
//! Runs the full pipeline and reports whether the topology schedules, plus
//! every edge that lies on more than one cycle. Shared edges are warnings
//! on stderr unless `--deny-overlap` is set, in which case they fail the
//! command with exit code 1.
//!
//! Output (human mode): a one-line summary.
//! Output (JSON mode): `{"ok": bool, "nodes": N, "edges": N, "cycles": N,
//! "shared_edges": [...]}`.
use std::io::Write;

use nnsched_core::{EdgeSpec, NodeSpec, SharedEdge};
use serde_json::json;

use super::{Context, Scheduled, load_and_schedule, with_stdout};
use crate::error::CliError;
use crate::format::{describe_edge, warning};
use crate::{OutputFormat, PathOrStdin};

/// Summary counts of a scheduled topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Summary {
    nodes: usize,
    edges: usize,
    cycles: usize,
}

/// Runs the `check` command.
///
/// # Errors
///
/// See [`load_and_schedule`]; additionally [`CliError::OverlapDenied`] when
/// `deny_overlap` is set and some edge is shared between cycles.
pub fn run(file: &PathOrStdin, deny_overlap: bool, ctx: &Context) -> Result<(), CliError> {
    let Scheduled { registry, schedule } = load_and_schedule(file, ctx)?;
    let shared = schedule.shared_edges();
    let summary = Summary {
        nodes: registry.nodes.len(),
        edges: registry.edges.len(),
        cycles: schedule.cycles.len(),
    };
    let ok = !deny_overlap || shared.is_empty();

    if !ctx.quiet || deny_overlap {
        for line in shared_edge_lines(&registry.nodes, &registry.edges, &shared) {
            eprintln!("{}", warning(&line, ctx.colors));
        }
    }

    with_stdout(|out| match ctx.format {
        OutputFormat::Human => print_human(out, summary, shared.len(), ok),
        OutputFormat::Json => print_json(out, summary, &shared, ok),
    })?;

    if ok {
        Ok(())
    } else {
        Err(CliError::OverlapDenied {
            count: shared.len(),
        })
    }
}

fn shared_edge_lines(nodes: &[NodeSpec], edges: &[EdgeSpec], shared: &[SharedEdge]) -> Vec<String> {
    shared
        .iter()
        .map(|entry| {
            let cycles: Vec<String> = entry.cycles.iter().map(ToString::to_string).collect();
            format!(
                "edge {} is shared by cycles {}",
                describe_edge(entry.edge, nodes, edges),
                cycles.join(", ")
            )
        })
        .collect()
}

fn print_human(
    out: &mut dyn Write,
    summary: Summary,
    shared: usize,
    ok: bool,
) -> std::io::Result<()> {
    let status = if ok { "ok" } else { "failed" };
    writeln!(
        out,
        "{status}: {} node(s), {} edge(s), {} cycle(s), {shared} shared edge(s)",
        summary.nodes, summary.edges, summary.cycles
    )
}

fn print_json(
    out: &mut dyn Write,
    summary: Summary,
    shared: &[SharedEdge],
    ok: bool,
) -> std::io::Result<()> {
    let doc = json!({
        "ok": ok,
        "nodes": summary.nodes,
        "edges": summary.edges,
        "cycles": summary.cycles,
        "shared_edges": shared,
    });
    serde_json::to_writer_pretty(&mut *out, &doc).map_err(std::io::Error::from)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use nnsched_core::EdgeId;

    use super::*;

    const SUMMARY: Summary = Summary {
        nodes: 4,
        edges: 6,
        cycles: 3,
    };

    #[test]
    fn human_summary_line() {
        let mut buf = Vec::new();
        print_human(&mut buf, SUMMARY, 1, true).expect("writes");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "ok: 4 node(s), 6 edge(s), 3 cycle(s), 1 shared edge(s)\n"
        );
    }

    #[test]
    fn json_lists_shared_edges() {
        let shared = vec![SharedEdge {
            edge: EdgeId::new(2),
            cycles: vec![0, 1],
        }];
        let mut buf = Vec::new();
        print_json(&mut buf, SUMMARY, &shared, false).expect("writes");
        let doc: serde_json::Value = serde_json::from_slice(&buf).expect("valid JSON");
        assert_eq!(doc["ok"], false);
        assert_eq!(doc["shared_edges"][0]["edge"], 2);
        assert_eq!(doc["shared_edges"][0]["cycles"][1], 1);
    }

    #[test]
    fn shared_edge_lines_name_endpoints() {
        let nodes = vec![NodeSpec::entry("in"), NodeSpec::new("h")];
        let edges = vec![EdgeSpec::new(0usize, 1usize).with_label("g")];
        let shared = vec![SharedEdge {
            edge: EdgeId::new(0),
            cycles: vec![0, 2],
        }];
        assert_eq!(
            shared_edge_lines(&nodes, &edges, &shared),
            vec!["edge g: in -> h is shared by cycles 0, 2".to_owned()]
        );
    }
}
