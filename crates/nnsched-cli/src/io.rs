/// Topology input: file and stdin reading with size enforcement, UTF-8
/// validation, and decoding into a [`Topology`].
///
/// `nnsched-core` never touches the filesystem; all reading happens here.
/// Every failure maps to a [`CliError`] with exit code 2.
use std::io::{ErrorKind, Read as _};
use std::path::Path;

use nnsched_core::Topology;

use crate::error::CliError;
use crate::{InputFormat, PathOrStdin};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads `source` and decodes it as a topology.
///
/// # Errors
///
/// Any [`read_input`] error, or [`CliError::InvalidTopology`] when the
/// content does not decode.
pub fn load_topology(
    source: &PathOrStdin,
    max_size: u64,
    format: InputFormat,
) -> Result<Topology, CliError> {
    let content = read_input(source, max_size)?;
    let json = match format {
        InputFormat::Json => true,
        InputFormat::Text => false,
        InputFormat::Auto => looks_like_json(&content),
    };
    tracing::debug!(
        source = %source.label(),
        bytes = content.len(),
        json,
        "decoding topology"
    );

    let decoded = if json {
        Topology::from_json(&content)
    } else {
        Topology::from_text(&content)
    };
    decoded.map_err(|error| CliError::InvalidTopology {
        source: source.label(),
        error,
    })
}

/// Reads the entire contents of `source` into a `String`.
///
/// Disk files are checked against `max_size` via their metadata before any
/// bytes are read. Stdin is read through a capped reader.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) for a missing or unreadable file, input
/// over `max_size`, any other I/O error, or invalid UTF-8.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_stdin(max_size),
    }
}

fn looks_like_json(content: &str) -> bool {
    content.trim_start().starts_with('{')
}

// ---------------------------------------------------------------------------
// Disk files
// ---------------------------------------------------------------------------

fn read_file(path: &Path, max_size: u64) -> Result<String, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();

    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))?;
    bytes_to_string(bytes, &path.display().to_string())
}

fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    let kind = e.kind();
    if kind == ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if kind == ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Stdin
// ---------------------------------------------------------------------------

/// Reads stdin, allowing one byte past `max_size` to detect overflow.
fn read_stdin(max_size: u64) -> Result<String, CliError> {
    let mut buf: Vec<u8> = Vec::new();
    std::io::stdin()
        .lock()
        .take(max_size.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;

    if buf.len() as u64 > max_size {
        return Err(CliError::FileTooLarge {
            source: "-".to_owned(),
            limit: max_size,
            actual: None,
        });
    }

    bytes_to_string(buf, "-")
}

// ---------------------------------------------------------------------------
// UTF-8 conversion
// ---------------------------------------------------------------------------

fn bytes_to_string(bytes: Vec<u8>, source_label: &str) -> Result<String, CliError> {
    String::from_utf8(bytes).map_err(|e| CliError::InvalidUtf8 {
        source: source_label.to_owned(),
        byte_offset: e.utf8_error().valid_up_to(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
