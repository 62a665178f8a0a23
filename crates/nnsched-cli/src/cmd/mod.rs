/// Command module for the `nnsched` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes the parsed arguments and returns `Ok(())` on success or
/// a [`crate::error::CliError`] on failure.
pub mod check;
pub mod cycles;
pub mod draw;
pub mod init;
pub mod schedule;

use std::io::Write;

use nnsched_core::{Registry, Schedule, ScheduleConfig, schedule_with_config};

use crate::error::CliError;
use crate::format::colors_enabled;
use crate::{Cli, InputFormat, OutputFormat, PathOrStdin, io};

/// Global flags shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output format.
    pub format: OutputFormat,
    /// Whether ANSI colors are enabled on stdout.
    pub colors: bool,
    /// Suppress warnings.
    pub quiet: bool,
    /// Input size limit in bytes.
    pub max_file_size: u64,
    /// Topology encoding.
    pub input_format: InputFormat,
    /// Pipeline configuration.
    pub config: ScheduleConfig,
}

impl Context {
    /// Builds the context from the parsed global flags.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            colors: colors_enabled(cli.no_color),
            quiet: cli.quiet,
            max_file_size: cli.max_file_size,
            input_format: cli.input_format,
            config: ScheduleConfig::default().with_traversal(cli.traversal.into()),
        }
    }
}

/// A loaded topology after a successful pipeline run.
///
/// `registry.edges` carries the classification written back by the pipeline.
pub struct Scheduled {
    /// The expanded node and edge specs.
    pub registry: Registry,
    /// The pipeline output.
    pub schedule: Schedule,
}

/// Reads, expands and schedules the topology at `file`.
///
/// # Errors
///
/// Input errors (exit code 2) while reading or decoding, and
/// [`CliError::Schedule`] (exit code 1) when the pipeline fails.
pub fn load_and_schedule(file: &PathOrStdin, ctx: &Context) -> Result<Scheduled, CliError> {
    let topology = io::load_topology(file, ctx.max_file_size, ctx.input_format)?;
    let mut registry = topology
        .registry()
        .map_err(|error| CliError::InvalidTopology {
            source: file.label(),
            error,
        })?;
    let schedule = schedule_with_config(&registry.nodes, &mut registry.edges, &ctx.config)?;
    tracing::info!(
        nodes = registry.nodes.len(),
        edges = registry.edges.len(),
        cycles = schedule.cycles.len(),
        "scheduled {}",
        file.label()
    );
    Ok(Scheduled { registry, schedule })
}

/// Runs `write` against a locked stdout, mapping write failures to
/// [`CliError::IoError`].
pub fn with_stdout(
    write: impl FnOnce(&mut dyn Write) -> std::io::Result<()>,
) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write(&mut out)
        .and_then(|()| out.flush())
        .map_err(|e| CliError::IoError {
            source: "stdout".to_owned(),
            detail: e.to_string(),
        })
}
