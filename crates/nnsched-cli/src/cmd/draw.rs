//! Implementation of `nnsched draw <file>`.
//!
//! Schedules the topology and writes a Graphviz DOT rendering to stdout.
//! `--format` is ignored: the output is always DOT.
use std::io::Write as _;

use nnsched_core::{DotOptions, render_dot};

use super::{Context, Scheduled, load_and_schedule, with_stdout};
use crate::PathOrStdin;
use crate::error::CliError;

/// Runs the `draw` command.
///
/// # Errors
///
/// See [`load_and_schedule`].
pub fn run(file: &PathOrStdin, show_order: bool, ctx: &Context) -> Result<(), CliError> {
    let Scheduled { registry, schedule } = load_and_schedule(file, ctx)?;
    let dot = render_dot(
        &registry.nodes,
        &registry.edges,
        Some(&schedule),
        &DotOptions { show_order },
    )?;
    with_stdout(|out| out.write_all(dot.as_bytes()))
}
