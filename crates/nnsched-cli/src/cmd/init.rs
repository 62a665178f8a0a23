//! Implementation of `nnsched init`.
//!
//! Writes a small recurrent topology to stdout: the text format by default,
//! the JSON document with `--format json`. The template parses, expands and
//! schedules without errors.
//!
//! Exit codes: 0 = always succeeds unless stdout write fails.
use std::io::Write as _;

use nnsched_core::Topology;

use super::with_stdout;
use crate::OutputFormat;
use crate::error::CliError;

/// Template written by `nnsched init`.
pub const TEMPLATE: &str = "\
# nnsched topology
property name=example
input
layer name=hidden type=tanh size=128
layer name=proj type=linear size=32
glue name=embed type=fc in=input out=hidden
glue name=step type=fc in=hidden out=proj
glue name=feedback type=fc in=proj out=hidden
glue name=decode type=fc in=proj out=output
";

/// Runs the `init` command.
///
/// # Errors
///
/// Returns [`CliError::IoError`] if stdout cannot be written.
pub fn run(format: OutputFormat) -> Result<(), CliError> {
    let rendered = render(format)?;
    with_stdout(|out| out.write_all(rendered.as_bytes()))
}

fn render(format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Human => Ok(TEMPLATE.to_owned()),
        OutputFormat::Json => {
            let invalid = |error| CliError::InvalidTopology {
                source: "template".to_owned(),
                error,
            };
            let json = Topology::from_text(TEMPLATE)
                .and_then(|topology| topology.to_json())
                .map_err(invalid)?;
            Ok(format!("{json}\n"))
        }
    }
}
