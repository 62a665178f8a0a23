/// Human-mode output helpers: ANSI colors and edge descriptions.
///
/// Colors are disabled when `--no-color` is set, the `NO_COLOR` environment
/// variable is present (per <https://no-color.org>), or stdout is not a TTY.
use std::io::IsTerminal as _;

use nnsched_core::{EdgeId, EdgeSpec, NodeSpec, RecurType};

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stdout.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

// ---------------------------------------------------------------------------
// ANSI escape sequences
// ---------------------------------------------------------------------------

const ANSI_RED: &str = "\x1b[31m";
const ANSI_BLUE: &str = "\x1b[34m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RESET: &str = "\x1b[0m";

fn wrap(text: &str, color: &str, colors: bool) -> String {
    if colors {
        format!("{color}{text}{ANSI_RESET}")
    } else {
        text.to_owned()
    }
}

/// Colors a classification name: heads red, body edges blue.
pub fn paint_recur(recur: RecurType, colors: bool) -> String {
    match recur {
        RecurType::NonRecurrent => recur.as_str().to_owned(),
        RecurType::CycleHead => wrap(recur.as_str(), ANSI_RED, colors),
        RecurType::CycleBody => wrap(recur.as_str(), ANSI_BLUE, colors),
    }
}

/// Prefixes `text` with a yellow `warning:` tag.
pub fn warning(text: &str, colors: bool) -> String {
    format!("{}: {text}", wrap("warning", ANSI_YELLOW, colors))
}

// ---------------------------------------------------------------------------
// Edge descriptions
// ---------------------------------------------------------------------------

/// Describes an edge as `label: source -> target`, or `eN: source -> target`
/// for unlabelled edges.
pub fn describe_edge(edge: EdgeId, nodes: &[NodeSpec], edges: &[EdgeSpec]) -> String {
    let Some(spec) = edges.get(edge.index()) else {
        return edge.to_string();
    };
    let name = |i: usize| nodes.get(i).map_or("?", |n| n.name.as_str());
    let label = spec.label.clone().unwrap_or_else(|| edge.to_string());
    format!(
        "{label}: {} -> {}",
        name(spec.source.index()),
        name(spec.target.index())
    )
}
