/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `nnsched` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2** on input failure: the topology could not be read or
///   parsed. These errors terminate before any scheduling runs.
/// - Exit code **1** on logical failure: the topology was read but could not
///   be scheduled, or `check --deny-overlap` found shared cycle edges.
use std::fmt;
use std::path::PathBuf;

use nnsched_core::{ScheduleError, TopologyError};

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `nnsched` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// A generic I/O error not covered by the more specific variants above.
    IoError {
        /// A human-readable label for the source or sink.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The topology text or JSON is malformed.
    InvalidTopology {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The loader error.
        error: TopologyError,
    },

    // --- Exit code 1: logical failures ---
    /// The topology is well-formed but cannot be scheduled.
    Schedule {
        /// The pipeline error.
        error: ScheduleError,
    },

    /// `check --deny-overlap` found edges shared between cycles.
    ///
    /// The shared edges have already been reported.
    OverlapDenied {
        /// Number of shared edges.
        count: usize,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::InvalidTopology { .. } => 2,

            Self::Schedule { .. } | Self::OverlapDenied { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::InvalidTopology { source, error } => {
                format!("error: invalid topology in {source}: {error}")
            }
            Self::Schedule { error } => format!("error: cannot schedule topology: {error}"),
            Self::OverlapDenied { count } => {
                format!("error: {count} edge(s) shared between cycles")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

impl From<ScheduleError> for CliError {
    fn from(error: ScheduleError) -> Self {
        Self::Schedule { error }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use nnsched_core::NodeId;

    use super::*;

    // ── exit_code ────────────────────────────────────────────────────────────

    #[test]
    fn input_failures_are_exit_2() {
        let errors = [
            CliError::FileNotFound {
                path: PathBuf::from("net.topo"),
            },
            CliError::PermissionDenied {
                path: PathBuf::from("/root/net.topo"),
            },
            CliError::FileTooLarge {
                source: "big.topo".to_owned(),
                limit: 1024,
                actual: Some(2048),
            },
            CliError::InvalidUtf8 {
                source: "bad.topo".to_owned(),
                byte_offset: 42,
            },
            CliError::StdinReadError {
                detail: "broken pipe".to_owned(),
            },
            CliError::InvalidTopology {
                source: "net.topo".to_owned(),
                error: TopologyError::NoInput,
            },
        ];
        for e in &errors {
            assert_eq!(e.exit_code(), 2, "{e}");
        }
    }

    #[test]
    fn schedule_error_is_exit_1() {
        let e = CliError::from(ScheduleError::NoEntryNode { node_count: 2 });
        assert_eq!(e.exit_code(), 1);
    }

    #[test]
    fn overlap_denied_is_exit_1() {
        assert_eq!(CliError::OverlapDenied { count: 3 }.exit_code(), 1);
    }

    // ── message content ──────────────────────────────────────────────────────

    #[test]
    fn file_not_found_message_contains_path() {
        let e = CliError::FileNotFound {
            path: PathBuf::from("rnn.topo"),
        };
        let msg = e.message();
        assert!(msg.contains("rnn.topo"), "message: {msg}");
        assert!(msg.contains("not found"), "message: {msg}");
    }

    #[test]
    fn file_too_large_without_actual_mentions_limit() {
        let e = CliError::FileTooLarge {
            source: "-".to_owned(),
            limit: 512,
            actual: None,
        };
        assert!(e.message().contains("512"));
    }

    #[test]
    fn invalid_topology_message_carries_line() {
        let e = CliError::InvalidTopology {
            source: "net.topo".to_owned(),
            error: TopologyError::UnknownDirective {
                line: 7,
                directive: "neuron".to_owned(),
            },
        };
        let msg = e.message();
        assert!(msg.contains("net.topo"), "message: {msg}");
        assert!(msg.contains("line 7"), "message: {msg}");
    }

    #[test]
    fn schedule_message_names_node() {
        let e = CliError::from(ScheduleError::UnreachableNode {
            node: NodeId::new(3),
            name: "orphan".to_owned(),
        });
        let msg = e.message();
        assert!(msg.contains("orphan"), "message: {msg}");
        assert!(msg.contains("#3"), "message: {msg}");
    }

    #[test]
    fn display_matches_message() {
        let e = CliError::OverlapDenied { count: 1 };
        assert_eq!(format!("{e}"), e.message());
    }
}
