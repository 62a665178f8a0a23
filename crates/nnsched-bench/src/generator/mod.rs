//! Recurrent topology generator.
//!
//! Produces valid [`Topology`] instances: layers arranged in tiers, each
//! fed by the tier before it, with optional skip connections, feedback glues
//! and self-loops. Every layer is reachable from `input` and every last-tier
//! layer feeds `output`, so the generated topologies always schedule.

pub mod layers;
pub mod topology;

use nnsched_core::Topology;
use rand::SeedableRng;
use rand::rngs::StdRng;

use topology::build_topology;

/// Configuration for the topology generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of declared layers (excluding `input` and `output`).
    pub num_layers: usize,
    /// Number of tiers the layers are spread over.
    pub depth: usize,
    /// Maximum number of previous-tier inputs per forward glue.
    pub max_fan_in: usize,
    /// Probability that a layer also receives a skip glue from an earlier
    /// tier (0.0-1.0).
    pub skip_density: f64,
    /// Probability that a layer emits a feedback glue to a layer in its own
    /// or an earlier tier (0.0-1.0).
    pub feedback_density: f64,
    /// Probability that a layer carries a self-loop glue (0.0-1.0).
    pub self_loop_density: f64,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// ~20 layers, ~40 edges
    Small,
    /// ~200 layers, ~500 edges
    Medium,
    /// ~2000 layers, ~5000 edges
    Large,
    /// ~10000 layers, ~25000 edges
    XLarge,
    /// ~200000 layers, ~500000 edges; written to disk by `gen-topology`
    Huge,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            SizeTier::Small => GeneratorConfig {
                seed,
                num_layers: 20,
                depth: 4,
                max_fan_in: 2,
                skip_density: 0.2,
                feedback_density: 0.2,
                self_loop_density: 0.1,
            },
            SizeTier::Medium => GeneratorConfig {
                seed,
                num_layers: 200,
                depth: 8,
                max_fan_in: 3,
                skip_density: 0.2,
                feedback_density: 0.15,
                self_loop_density: 0.1,
            },
            SizeTier::Large => GeneratorConfig {
                seed,
                num_layers: 2000,
                depth: 16,
                max_fan_in: 3,
                skip_density: 0.15,
                feedback_density: 0.1,
                self_loop_density: 0.1,
            },
            SizeTier::XLarge => GeneratorConfig {
                seed,
                num_layers: 10_000,
                depth: 24,
                max_fan_in: 3,
                skip_density: 0.15,
                feedback_density: 0.1,
                self_loop_density: 0.05,
            },
            SizeTier::Huge => GeneratorConfig {
                seed,
                num_layers: 200_000,
                depth: 64,
                max_fan_in: 3,
                skip_density: 0.1,
                feedback_density: 0.05,
                self_loop_density: 0.05,
            },
        }
    }
}

/// Generates a topology from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
pub fn generate_topology(config: &GeneratorConfig) -> Topology {
    let mut rng = StdRng::seed_from_u64(config.seed);
    build_topology(config, &mut rng)
}
