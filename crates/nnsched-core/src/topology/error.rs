use std::fmt;

/// Optional 1-based source line, rendered as a `line N: ` prefix.
///
/// Topologies loaded from JSON have no line information, so errors raised
/// while checking them carry `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Line(pub Option<usize>);

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "line {n}: "),
            None => Ok(()),
        }
    }
}

/// Errors raised while loading a topology.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// The JSON document could not be decoded.
    #[error("invalid topology JSON: {0}")]
    Json(String),

    /// The first token of a line is not a known directive.
    #[error("line {line}: unknown directive {directive:?}")]
    UnknownDirective {
        /// 1-based line number.
        line: usize,
        /// The unrecognised token.
        directive: String,
    },

    /// A token is not of the form `key=value`, or a list item is empty.
    #[error("line {line}: malformed token {token:?}")]
    MalformedToken {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A directive lacks a required key.
    #[error("{at}{directive} is missing required key {key:?}")]
    MissingKey {
        /// Where the directive was declared.
        at: Line,
        /// `layer` or `glue`.
        directive: &'static str,
        /// The missing key.
        key: &'static str,
    },

    /// A key is given twice.
    #[error("line {line}: duplicate key {key:?}")]
    DuplicateKey {
        /// 1-based line number.
        line: usize,
        /// The repeated key.
        key: String,
    },

    /// A second `input` directive.
    #[error("line {line}: input already declared on line {first_line}")]
    DuplicateInput {
        /// 1-based line number of the second declaration.
        line: usize,
        /// 1-based line number of the first declaration.
        first_line: usize,
    },

    /// A `layer` or `glue` appears before the `input` directive.
    #[error("line {line}: {directive} declared before input")]
    BeforeInput {
        /// 1-based line number.
        line: usize,
        /// `layer` or `glue`.
        directive: &'static str,
    },

    /// Two layers share a name.
    #[error("{at}duplicate layer name {name:?}")]
    DuplicateLayer {
        /// Where the second layer was declared.
        at: Line,
        /// The repeated name.
        name: String,
    },

    /// Two glues share a name.
    #[error("{at}duplicate glue name {name:?}")]
    DuplicateGlue {
        /// Where the second glue was declared.
        at: Line,
        /// The repeated name.
        name: String,
    },

    /// A layer uses the name of the implicit input or output layer.
    #[error("{at}layer name {name:?} is reserved")]
    ReservedLayerName {
        /// Where the layer was declared.
        at: Line,
        /// The reserved name.
        name: String,
    },

    /// The text has no `input` directive.
    #[error("topology has no input directive")]
    NoInput,

    /// The topology declares no glues, so no edges.
    #[error("topology declares no glues")]
    NoGlues,

    /// A glue references a layer that was never declared.
    #[error("{at}glue {glue:?} references unknown layer {layer:?}")]
    UnknownLayer {
        /// Where the glue was declared.
        at: Line,
        /// The glue name.
        glue: String,
        /// The unresolved layer name.
        layer: String,
    },

    /// A glue references a layer declared further down the text.
    #[error(
        "{at}glue {glue:?} references layer {layer:?} before its declaration on line {layer_line}"
    )]
    LayerDeclaredLater {
        /// Where the glue was declared.
        at: Line,
        /// The glue name.
        glue: String,
        /// The layer name.
        layer: String,
        /// Line of the layer's declaration.
        layer_line: usize,
    },
}

impl From<serde_json::Error> for TopologyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
