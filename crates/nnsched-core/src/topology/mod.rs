//! Layer/glue topology descriptions and their conversion into a scheduling
//! registry.
//!
//! A topology names layers (computation nodes) and glues (connections). Two
//! layers are implicit: `output`, which is always node 0, and `input`, which
//! is node 1 and the entry node. Declared layers follow in declaration order.
//!
//! A glue with `m` input layers and `n` output layers expands into `m * n`
//! edges, ordered by glue, then input, then output. Every edge is labelled
//! with its glue's name and described by a [`GlueLink`].
//!
//! The text format is line oriented:
//!
//! ```text
//! property name=rnn
//! input
//! layer name=hidden type=sigmoid size=64
//! glue name=emb type=emb in=input out=hidden
//! glue name=recur type=fc in=hidden out=hidden
//! glue name=out type=out in=hidden out=output
//! ```
//!
//! The same model is available as JSON through serde.
mod error;
mod parse;


pub use error::{Line, TopologyError};

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::NodeId;
use crate::structures::{EdgeSpec, NodeSpec};

/// Name of the implicit output layer (node 0).
pub const OUTPUT_LAYER: &str = "output";
/// Name of the implicit input layer (node 1, the entry node).
pub const INPUT_LAYER: &str = "input";

/// `key=value` attributes kept verbatim from the description.
pub type Attrs = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// A declared layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDecl {
    /// Unique layer name.
    pub name: String,
    /// Remaining attributes, such as `type` and `size`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: Attrs,
}

/// A declared glue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlueDecl {
    /// Unique glue name.
    pub name: String,
    /// Glue type, if given.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Layers the glue reads from.
    #[serde(rename = "in")]
    pub inputs: Vec<String>,
    /// Layers the glue writes to.
    #[serde(rename = "out")]
    pub outputs: Vec<String>,
    /// Remaining attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: Attrs,
}

/// A complete topology description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Topology {
    /// Keys from `property` lines.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Attrs,
    /// Attributes of the `input` directive.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub input: Attrs,
    /// Declared layers in order.
    #[serde(default)]
    pub layers: Vec<LayerDecl>,
    /// Declared glues in order.
    #[serde(default)]
    pub glues: Vec<GlueDecl>,
}

/// Which glue, and which of its input and output layers, an edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlueLink {
    /// Index into [`Topology::glues`].
    pub glue: usize,
    /// Index into the glue's input list.
    pub input: usize,
    /// Index into the glue's output list.
    pub output: usize,
}

/// Node and edge specs derived from a [`Topology`], ready for scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registry {
    /// `output`, `input`, then declared layers.
    pub nodes: Vec<NodeSpec>,
    /// One edge per glue input/output pair.
    pub edges: Vec<EdgeSpec>,
    /// Origin of each edge, parallel to `edges`.
    pub links: Vec<GlueLink>,
}

/// Line numbers of the declarations, used to locate errors in text input.
#[derive(Debug, Default)]
pub(crate) struct DeclLines {
    pub(crate) layers: Vec<usize>,
    pub(crate) glues: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Topology {
    /// Parses the line-oriented text format.
    ///
    /// # Errors
    ///
    /// Returns the first [`TopologyError`] found, with its line number.
    pub fn from_text(text: &str) -> Result<Self, TopologyError> {
        let (topology, lines) = parse::parse(text)?;
        topology.check(Some(&lines))?;
        Ok(topology)
    }

    /// Decodes the JSON form and checks it like the text form.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Json`] for malformed JSON, or the first
    /// consistency error found.
    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        let topology: Self = serde_json::from_str(json)?;
        topology.check(None)?;
        Ok(topology)
    }

    /// Encodes the topology as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, TopologyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of nodes the topology expands into.
    pub fn node_count(&self) -> usize {
        self.layers.len() + 2
    }

    /// Resolves a layer name to its node id.
    ///
    /// The implicit layer names match case-insensitively.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        if name.eq_ignore_ascii_case(OUTPUT_LAYER) {
            return Some(NodeId::new(0));
        }
        if name.eq_ignore_ascii_case(INPUT_LAYER) {
            return Some(NodeId::new(1));
        }
        self.layers
            .iter()
            .position(|l| l.name == name)
            .map(|i| NodeId::new(i + 2))
    }

    /// Expands the topology into node and edge specs.
    ///
    /// # Errors
    ///
    /// Returns the first consistency error found (see [`TopologyError`]).
    pub fn registry(&self) -> Result<Registry, TopologyError> {
        self.check(None)?;

        let mut nodes = Vec::with_capacity(self.node_count());
        nodes.push(NodeSpec::new(OUTPUT_LAYER));
        nodes.push(NodeSpec::entry(INPUT_LAYER));
        nodes.extend(self.layers.iter().map(|l| NodeSpec::new(l.name.clone())));

        let mut edges = Vec::new();
        let mut links = Vec::new();
        for (g, glue) in self.glues.iter().enumerate() {
            let resolve = |name: &String| {
                self.node_id(name).ok_or_else(|| TopologyError::UnknownLayer {
                    at: Line(None),
                    glue: glue.name.clone(),
                    layer: name.clone(),
                })
            };
            for (i, input) in glue.inputs.iter().enumerate() {
                let source = resolve(input)?;
                for (o, output) in glue.outputs.iter().enumerate() {
                    let target = resolve(output)?;
                    edges.push(EdgeSpec::new(source, target).with_label(glue.name.clone()));
                    links.push(GlueLink {
                        glue: g,
                        input: i,
                        output: o,
                    });
                }
            }
        }

        tracing::debug!(
            layers = self.layers.len(),
            glues = self.glues.len(),
            edges = edges.len(),
            "expanded topology"
        );
        Ok(Registry {
            nodes,
            edges,
            links,
        })
    }

    /// Checks name uniqueness, reserved names and glue references.
    pub(crate) fn check(&self, lines: Option<&DeclLines>) -> Result<(), TopologyError> {
        let layer_line = |i: usize| Line(lines.and_then(|l| l.layers.get(i).copied()));
        let glue_line = |i: usize| Line(lines.and_then(|l| l.glues.get(i).copied()));

        let mut layer_names: HashSet<&str> = HashSet::new();
        for (i, layer) in self.layers.iter().enumerate() {
            if is_reserved(&layer.name) {
                return Err(TopologyError::ReservedLayerName {
                    at: layer_line(i),
                    name: layer.name.clone(),
                });
            }
            if !layer_names.insert(&layer.name) {
                return Err(TopologyError::DuplicateLayer {
                    at: layer_line(i),
                    name: layer.name.clone(),
                });
            }
        }

        if self.glues.is_empty() {
            return Err(TopologyError::NoGlues);
        }

        let mut glue_names: HashSet<&str> = HashSet::new();
        for (i, glue) in self.glues.iter().enumerate() {
            if !glue_names.insert(&glue.name) {
                return Err(TopologyError::DuplicateGlue {
                    at: glue_line(i),
                    name: glue.name.clone(),
                });
            }
            for (key, list) in [("in", &glue.inputs), ("out", &glue.outputs)] {
                if list.is_empty() {
                    return Err(TopologyError::MissingKey {
                        at: glue_line(i),
                        directive: "glue",
                        key,
                    });
                }
                if let Some(unknown) = list.iter().find(|name| self.node_id(name).is_none()) {
                    return Err(TopologyError::UnknownLayer {
                        at: glue_line(i),
                        glue: glue.name.clone(),
                        layer: unknown.clone(),
                    });
                }
                if let Some(lines) = lines {
                    self.check_declared_before(glue, lines, i)?;
                }
            }
        }
        Ok(())
    }

    /// Text form only: a glue may name a layer only once that layer's line
    /// has been read.
    fn check_declared_before(
        &self,
        glue: &GlueDecl,
        lines: &DeclLines,
        index: usize,
    ) -> Result<(), TopologyError> {
        let Some(&at) = lines.glues.get(index) else {
            return Ok(());
        };
        for name in glue.inputs.iter().chain(&glue.outputs) {
            let declared = self
                .layers
                .iter()
                .position(|l| l.name == *name)
                .and_then(|l| lines.layers.get(l).copied());
            if let Some(layer_line) = declared.filter(|&line| line > at) {
                return Err(TopologyError::LayerDeclaredLater {
                    at: Line(Some(at)),
                    glue: glue.name.clone(),
                    layer: name.clone(),
                    layer_line,
                });
            }
        }
        Ok(())
    }
}

fn is_reserved(name: &str) -> bool {
    name.eq_ignore_ascii_case(INPUT_LAYER) || name.eq_ignore_ascii_case(OUTPUT_LAYER)
}

impl FromStr for Topology {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

fn write_attrs(f: &mut fmt::Formatter<'_>, attrs: &Attrs) -> fmt::Result {
    for (key, value) in attrs {
        write!(f, " {key}={value}")?;
    }
    Ok(())
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.properties.is_empty() {
            f.write_str("property")?;
            write_attrs(f, &self.properties)?;
            writeln!(f)?;
        }

        f.write_str(INPUT_LAYER)?;
        write_attrs(f, &self.input)?;
        writeln!(f)?;

        for layer in &self.layers {
            write!(f, "layer name={}", layer.name)?;
            write_attrs(f, &layer.attrs)?;
            writeln!(f)?;
        }

        for glue in &self.glues {
            write!(f, "glue name={}", glue.name)?;
            if let Some(kind) = &glue.kind {
                write!(f, " type={kind}")?;
            }
            write!(
                f,
                " in={} out={}",
                glue.inputs.join(","),
                glue.outputs.join(",")
            )?;
            write_attrs(f, &glue.attrs)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
