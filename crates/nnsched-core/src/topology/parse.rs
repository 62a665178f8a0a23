//! Line-oriented topology text parser.
//!
//! Each non-blank line holds one directive followed by `key=value` tokens.
//! `#` starts a comment. Directives and keys are case-insensitive; values are
//! kept as written.
use super::{Attrs, DeclLines, GlueDecl, LayerDecl, Topology, TopologyError};

/// The `key=value` pairs of one directive line.
struct Directive<'a> {
    line: usize,
    pairs: Vec<(String, &'a str)>,
}

impl Directive<'_> {
    /// Collects the pairs into attributes, rejecting repeated keys.
    fn into_attrs(self) -> Result<Attrs, TopologyError> {
        let mut attrs = Attrs::new();
        for (key, value) in self.pairs {
            if attrs.contains_key(&key) {
                return Err(TopologyError::DuplicateKey {
                    line: self.line,
                    key,
                });
            }
            attrs.insert(key, value.to_owned());
        }
        Ok(attrs)
    }
}

/// Splits a line into its lowercased keyword and pairs. Blank and
/// comment-only lines yield `None`.
fn tokenize(line: usize, raw: &str) -> Result<Option<(String, Directive<'_>)>, TopologyError> {
    let content = raw.split_once('#').map_or(raw, |(before, _)| before);
    let mut tokens = content.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(None);
    };

    let mut pairs = Vec::new();
    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                pairs.push((key.to_ascii_lowercase(), value));
            }
            Some(_) | None => {
                return Err(TopologyError::MalformedToken {
                    line,
                    token: token.to_owned(),
                });
            }
        }
    }

    Ok(Some((keyword.to_ascii_lowercase(), Directive { line, pairs })))
}

/// Splits a comma-separated layer list, rejecting empty items.
fn split_list(line: usize, value: &str) -> Result<Vec<String>, TopologyError> {
    value
        .split(',')
        .map(|item| {
            let item = item.trim();
            if item.is_empty() {
                Err(TopologyError::MalformedToken {
                    line,
                    token: value.to_owned(),
                })
            } else {
                Ok(item.to_owned())
            }
        })
        .collect()
}

fn take_required(
    attrs: &mut Attrs,
    line: usize,
    directive: &'static str,
    key: &'static str,
) -> Result<String, TopologyError> {
    attrs.remove(key).ok_or(TopologyError::MissingKey {
        at: super::Line(Some(line)),
        directive,
        key,
    })
}

fn parse_layer(directive: Directive<'_>) -> Result<LayerDecl, TopologyError> {
    let line = directive.line;
    let mut attrs = directive.into_attrs()?;
    let name = take_required(&mut attrs, line, "layer", "name")?;
    Ok(LayerDecl { name, attrs })
}

fn parse_glue(directive: Directive<'_>) -> Result<GlueDecl, TopologyError> {
    let line = directive.line;
    let mut attrs = directive.into_attrs()?;
    let name = take_required(&mut attrs, line, "glue", "name")?;
    let inputs = split_list(line, &take_required(&mut attrs, line, "glue", "in")?)?;
    let outputs = split_list(line, &take_required(&mut attrs, line, "glue", "out")?)?;
    let kind = attrs.remove("type");
    Ok(GlueDecl {
        name,
        kind,
        inputs,
        outputs,
        attrs,
    })
}

/// Parses `text` into a topology plus the line number of each declaration.
///
/// Name-level checks (duplicates, references) are left to
/// [`Topology::check`].
pub(super) fn parse(text: &str) -> Result<(Topology, DeclLines), TopologyError> {
    let mut topology = Topology::default();
    let mut lines = DeclLines::default();
    let mut input_line: Option<usize> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let Some((keyword, directive)) = tokenize(line, raw)? else {
            continue;
        };

        match keyword.as_str() {
            "property" => {
                for (key, value) in directive.into_attrs()? {
                    if topology.properties.contains_key(&key) {
                        return Err(TopologyError::DuplicateKey { line, key });
                    }
                    topology.properties.insert(key, value);
                }
            }
            "input" => {
                if let Some(first_line) = input_line {
                    return Err(TopologyError::DuplicateInput { line, first_line });
                }
                input_line = Some(line);
                topology.input = directive.into_attrs()?;
            }
            "layer" => {
                if input_line.is_none() {
                    return Err(TopologyError::BeforeInput {
                        line,
                        directive: "layer",
                    });
                }
                topology.layers.push(parse_layer(directive)?);
                lines.layers.push(line);
            }
            "glue" => {
                if input_line.is_none() {
                    return Err(TopologyError::BeforeInput {
                        line,
                        directive: "glue",
                    });
                }
                topology.glues.push(parse_glue(directive)?);
                lines.glues.push(line);
            }
            other => {
                return Err(TopologyError::UnknownDirective {
                    line,
                    directive: other.to_owned(),
                });
            }
        }
    }

    if input_line.is_none() {
        return Err(TopologyError::NoInput);
    }
    Ok((topology, lines))
}
