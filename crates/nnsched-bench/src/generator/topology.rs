//! Topology strategies: tiered forward glues, skip connections, feedback
//! glues and self-loops.

use nnsched_core::{GlueDecl, INPUT_LAYER, LayerDecl, OUTPUT_LAYER, Topology};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::GeneratorConfig;
use super::layers::{build_glue, build_layer};

/// Builds a complete topology from the generator configuration.
pub fn build_topology(config: &GeneratorConfig, rng: &mut StdRng) -> Topology {
    let tiers = build_tiers(config, rng);
    let mut glues: Vec<GlueDecl> = Vec::new();
    let mut counter = 0usize;

    build_forward_glues(rng, &tiers, config, &mut glues, &mut counter);
    build_skip_glues(rng, &tiers, config, &mut glues, &mut counter);
    build_output_glue(rng, &tiers, &mut glues, &mut counter);
    build_feedback_glues(rng, &tiers, config, &mut glues, &mut counter);
    build_self_loops(rng, &tiers, config, &mut glues, &mut counter);

    let layers: Vec<LayerDecl> = tiers.into_iter().flatten().collect();

    let mut topology = Topology {
        layers,
        glues,
        ..Topology::default()
    };
    topology
        .properties
        .insert("seed".to_owned(), config.seed.to_string());
    topology
}

/// Spreads `num_layers` layers over at most `depth` non-empty tiers.
fn build_tiers(config: &GeneratorConfig, rng: &mut StdRng) -> Vec<Vec<LayerDecl>> {
    let depth = config.depth.clamp(1, config.num_layers.max(1));
    let per_tier = config.num_layers / depth;
    let extra = config.num_layers % depth;

    (0..depth)
        .map(|tier| {
            let count = per_tier + usize::from(tier < extra);
            (0..count).map(|i| build_layer(rng, tier, i)).collect()
        })
        .filter(|tier: &Vec<LayerDecl>| !tier.is_empty())
        .collect()
}

fn names(tier: &[LayerDecl]) -> Vec<String> {
    tier.iter().map(|l| l.name.clone()).collect()
}

/// Feeds every tier-0 layer from `input` and every later layer from one to
/// `max_fan_in` layers of the previous tier.
fn build_forward_glues(
    rng: &mut StdRng,
    tiers: &[Vec<LayerDecl>],
    config: &GeneratorConfig,
    glues: &mut Vec<GlueDecl>,
    counter: &mut usize,
) {
    for (t, tier) in tiers.iter().enumerate() {
        for layer in tier {
            let inputs = match t.checked_sub(1).and_then(|p| tiers.get(p)) {
                None => vec![INPUT_LAYER.to_owned()],
                Some(previous) => {
                    let fan_in = rng.gen_range(1..=config.max_fan_in.clamp(1, previous.len()));
                    let mut pool = names(previous);
                    pool.shuffle(rng);
                    pool.truncate(fan_in);
                    pool
                }
            };
            let glue = build_glue(rng, "fw", counter, inputs, vec![layer.name.clone()]);
            glues.push(glue);
        }
    }
}

/// Adds glues from `input` or a tier at least two back.
fn build_skip_glues(
    rng: &mut StdRng,
    tiers: &[Vec<LayerDecl>],
    config: &GeneratorConfig,
    glues: &mut Vec<GlueDecl>,
    counter: &mut usize,
) {
    for (t, tier) in tiers.iter().enumerate().skip(2) {
        for layer in tier {
            if !rng.gen_bool(config.skip_density) {
                continue;
            }
            let source_tier = rng.gen_range(0..t - 1);
            let source = tiers[source_tier]
                .choose(rng)
                .map_or_else(|| INPUT_LAYER.to_owned(), |l| l.name.clone());
            let glue = build_glue(rng, "skip", counter, vec![source], vec![layer.name.clone()]);
            glues.push(glue);
        }
    }
}

/// Connects the whole last tier to `output` with a single multi-input glue.
fn build_output_glue(
    rng: &mut StdRng,
    tiers: &[Vec<LayerDecl>],
    glues: &mut Vec<GlueDecl>,
    counter: &mut usize,
) {
    let inputs = tiers
        .last()
        .map_or_else(|| vec![INPUT_LAYER.to_owned()], |tier| names(tier));
    let glue = build_glue(rng, "head", counter, inputs, vec![OUTPUT_LAYER.to_owned()]);
    glues.push(glue);
}

/// Adds glues from a layer back to a layer in its own or an earlier tier.
fn build_feedback_glues(
    rng: &mut StdRng,
    tiers: &[Vec<LayerDecl>],
    config: &GeneratorConfig,
    glues: &mut Vec<GlueDecl>,
    counter: &mut usize,
) {
    for (t, tier) in tiers.iter().enumerate() {
        for layer in tier {
            if !rng.gen_bool(config.feedback_density) {
                continue;
            }
            let target_tier = rng.gen_range(0..=t);
            let Some(target) = tiers[target_tier].choose(rng) else {
                continue;
            };
            if target.name == layer.name {
                continue;
            }
            let glue = build_glue(
                rng,
                "fb",
                counter,
                vec![layer.name.clone()],
                vec![target.name.clone()],
            );
            glues.push(glue);
        }
    }
}

fn build_self_loops(
    rng: &mut StdRng,
    tiers: &[Vec<LayerDecl>],
    config: &GeneratorConfig,
    glues: &mut Vec<GlueDecl>,
    counter: &mut usize,
) {
    for layer in tiers.iter().flatten() {
        if rng.gen_bool(config.self_loop_density) {
            let name = layer.name.clone();
            let glue = build_glue(rng, "rec", counter, vec![name.clone()], vec![name]);
            glues.push(glue);
        }
    }
}
