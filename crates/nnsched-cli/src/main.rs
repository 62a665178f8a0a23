mod cli;
mod cmd;
mod error;
mod format;
mod io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub(crate) use cli::{Cli, Command, InputFormat, OutputFormat, PathOrStdin};

use crate::cmd::Context;
use crate::error::CliError;

/// Environment variable holding a `tracing` filter directive, e.g.
/// `NNSCHED_LOG=nnsched_core=debug`.
const LOG_ENV: &str = "NNSCHED_LOG";

/// Installs the stderr log subscriber.
///
/// `NNSCHED_LOG` wins over `--quiet` and `--verbose`.
fn init_logging(cli: &Cli) {
    let default = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    // Fails only when a subscriber is already installed.
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        eprintln!("warning: log subscriber already installed");
    }
}

fn dispatch(cli: &Cli) -> Result<(), CliError> {
    let ctx = Context::from_cli(cli);
    match &cli.command {
        Command::Schedule { file } => cmd::schedule::run(file, &ctx),
        Command::Cycles { file } => cmd::cycles::run(file, &ctx),
        Command::Draw { file, show_order } => cmd::draw::run(file, *show_order, &ctx),
        Command::Check { file, deny_overlap } => cmd::check::run(file, *deny_overlap, &ctx),
        Command::Init => cmd::init::run(ctx.format),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = dispatch(&cli) {
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}
