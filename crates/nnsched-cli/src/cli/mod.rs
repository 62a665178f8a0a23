//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use nnsched_core::Traversal;

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl PathOrStdin {
    /// Label used in messages: the path, or `-` for stdin.
    pub fn label(&self) -> String {
        match self {
            Self::Stdin => "-".to_owned(),
            Self::Path(path) => path.display().to_string(),
        }
    }
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// A single JSON document on stdout.
    Json,
}

/// How the topology input is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// JSON when the first non-blank character is `{`, text otherwise
    /// (default).
    Auto,
    /// Line-oriented layer/glue text.
    Text,
    /// The JSON topology document.
    Json,
}

/// Depth-first traversal strategy for cycle detection.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TraversalArg {
    /// Explicit frame stack (default).
    Iterative,
    /// Native recursion; may overflow the stack on very deep graphs.
    Recursive,
}

impl From<TraversalArg> for Traversal {
    fn from(arg: TraversalArg) -> Self {
        match arg {
            TraversalArg::Iterative => Traversal::Iterative,
            TraversalArg::Recursive => Traversal::Recursive,
        }
    }
}

/// All top-level subcommands exposed by the `nnsched` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Print the node order and the edge schedule with classifications.
    Schedule {
        /// Path to a topology file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// List every detected cycle, head edge first.
    Cycles {
        /// Path to a topology file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Render the scheduled graph as Graphviz DOT on stdout.
    Draw {
        /// Path to a topology file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Append each edge's schedule position to its label.
        #[arg(long)]
        show_order: bool,
    },

    /// Schedule a topology and report edges shared between cycles.
    Check {
        /// Path to a topology file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Treat edges shared between cycles as an error.
        #[arg(long)]
        deny_overlap: bool,
    },

    /// Print a template topology.
    Init,
}

/// Root CLI struct for the `nnsched` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser)]
#[command(
    name = "nnsched",
    version,
    about = "Computation-graph scheduler for recurrent network topologies",
    long_about = "Schedules layer/glue network topologies.\n\
                  Detects feedback cycles, orders nodes and edges for the\n\
                  forward pass, and renders the result as text, JSON or DOT."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Only log errors to stderr (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log pipeline stages to stderr (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `NNSCHED_MAX_FILE_SIZE` environment variable.
    /// The CLI flag takes precedence over the environment variable.
    /// Default: 67108864 (64 MB).
    #[arg(
        long,
        global = true,
        env = "NNSCHED_MAX_FILE_SIZE",
        default_value = "67108864"
    )]
    pub max_file_size: u64,

    /// Topology encoding: auto (default), text or json.
    #[arg(long, global = true, default_value = "auto")]
    pub input_format: InputFormat,

    /// Cycle detection traversal: iterative (default) or recursive.
    ///
    /// `recursive` uses the native call stack and can abort the process with
    /// a stack overflow on very deep graphs.
    #[arg(long, global = true, default_value = "iterative")]
    pub traversal: TraversalArg,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}
