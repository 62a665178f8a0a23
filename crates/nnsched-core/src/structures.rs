//! Caller-facing node and edge descriptors.
//!
//! These are the registry the scheduler consumes: an ordered node list and an
//! ordered edge list whose positions are the [`NodeId`] and
//! [`EdgeId`](crate::ids::EdgeId) values used throughout the crate. The only
//! field the scheduler writes is [`EdgeSpec::recur`], and only after a
//! pipeline run succeeds.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::NodeId;

// ---------------------------------------------------------------------------
// RecurType
// ---------------------------------------------------------------------------

/// Role an edge plays with respect to the cycles of the graph.
///
/// Transitions are monotonic during detection: `NonRecurrent` may become
/// `CycleBody` or `CycleHead`, `CycleBody` never reverts, and `CycleHead` is
/// final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurType {
    /// The edge is not part of any detected cycle.
    #[default]
    NonRecurrent,
    /// The edge closes a cycle: its target was on the traversal path when the
    /// edge was reached. Values flowing through it come from the previous
    /// time step.
    CycleHead,
    /// The edge lies on a cycle but does not close it.
    CycleBody,
}

impl RecurType {
    /// Returns `true` for [`RecurType::CycleHead`] and [`RecurType::CycleBody`].
    pub fn is_recurrent(self) -> bool {
        match self {
            Self::NonRecurrent => false,
            Self::CycleHead | Self::CycleBody => true,
        }
    }

    /// Returns the `snake_case` name used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NonRecurrent => "non_recurrent",
            Self::CycleHead => "cycle_head",
            Self::CycleBody => "cycle_body",
        }
    }
}

impl fmt::Display for RecurType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NodeSpec
// ---------------------------------------------------------------------------

/// One computation node as described by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique node name, used for error reporting and rendering.
    pub name: String,
    /// Marks the single node traversal starts from.
    #[serde(default)]
    pub entry: bool,
}

impl NodeSpec {
    /// A non-entry node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry: false,
        }
    }

    /// The entry node.
    pub fn entry(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry: true,
        }
    }
}

// ---------------------------------------------------------------------------
// EdgeSpec
// ---------------------------------------------------------------------------

/// One directed connection as described by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// Node the value flows out of.
    pub source: NodeId,
    /// Node the value flows into.
    pub target: NodeId,
    /// Optional display label (the glue name for loaded topologies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Classification slot written back by a successful pipeline run.
    #[serde(default)]
    pub recur: RecurType,
}

impl EdgeSpec {
    /// An unlabelled, unclassified edge from `source` to `target`.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
            recur: RecurType::NonRecurrent,
        }
    }

    /// Attaches a display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns `true` when the edge starts and ends at the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
