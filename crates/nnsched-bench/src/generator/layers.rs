//! Layer and glue declaration builders.

use nnsched_core::{Attrs, GlueDecl, LayerDecl};
use rand::Rng;
use rand::rngs::StdRng;

const ACTIVATIONS: &[&str] = &["sigmoid", "tanh", "relu", "linear", "softmax"];
const SIZES: &[usize] = &[16, 32, 64, 128, 256, 512];
const GLUE_TYPES: &[&str] = &["fc", "emb", "conv", "out"];

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

/// Builds the layer at position `index` of tier `tier`.
///
/// Names are `t{tier}_{index}`, unique across the topology.
pub fn build_layer(rng: &mut StdRng, tier: usize, index: usize) -> LayerDecl {
    let mut attrs = Attrs::new();
    attrs.insert("type".to_owned(), (*pick(rng, ACTIVATIONS)).to_owned());
    attrs.insert("size".to_owned(), pick(rng, SIZES).to_string());
    LayerDecl {
        name: format!("t{tier}_{index}"),
        attrs,
    }
}

/// Builds a glue named `{prefix}{counter}` and advances `counter`.
pub fn build_glue(
    rng: &mut StdRng,
    prefix: &str,
    counter: &mut usize,
    inputs: Vec<String>,
    outputs: Vec<String>,
) -> GlueDecl {
    let name = format!("{prefix}{counter}");
    *counter += 1;
    let mut attrs = Attrs::new();
    if rng.gen_bool(0.3) {
        attrs.insert("lr".to_owned(), format!("{:.3}", rng.gen_range(0.001..0.1)));
    }
    GlueDecl {
        name,
        kind: Some((*pick(rng, GLUE_TYPES)).to_owned()),
        inputs,
        outputs,
        attrs,
    }
}
