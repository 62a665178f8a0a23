//! Tests that generated topologies load and schedule across size tiers and seeds.
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use nnsched_bench::{GeneratorConfig, SizeTier, generate_topology};
use nnsched_core::{Topology, schedule};

fn assert_schedules(topology: &Topology, label: &str) {
    let mut registry = topology
        .registry()
        .unwrap_or_else(|e| panic!("{label}: expansion failed: {e}"));
    if let Err(e) = schedule(&registry.nodes, &mut registry.edges) {
        panic!("{label}: scheduling failed: {e}");
    }
}

#[test]
fn generated_small_schedules() {
    for seed in [42, 123, 999, 7777, 54321] {
        let topology = generate_topology(&SizeTier::Small.config(seed));
        assert_schedules(&topology, &format!("Small/seed={seed}"));
    }
}

#[test]
fn generated_medium_schedules() {
    for seed in [42, 123, 999] {
        let topology = generate_topology(&SizeTier::Medium.config(seed));
        assert_schedules(&topology, &format!("Medium/seed={seed}"));
    }
}

#[test]
fn generated_large_schedules() {
    let topology = generate_topology(&SizeTier::Large.config(42));
    assert_schedules(&topology, "Large/seed=42");
}

#[test]
fn generated_xlarge_schedules() {
    let topology = generate_topology(&SizeTier::XLarge.config(42));
    assert_schedules(&topology, "XLarge/seed=42");
}

#[test]
fn generated_small_round_trips_through_text() {
    let topology = generate_topology(&SizeTier::Small.config(42));
    let back = Topology::from_text(&topology.to_string()).expect("reparse");
    assert_eq!(topology, back);
}

#[test]
fn generated_small_round_trips_through_json() {
    let topology = generate_topology(&SizeTier::Small.config(42));
    let json = topology.to_json().expect("encode");
    let back = Topology::from_json(&json).expect("decode");
    assert_eq!(topology, back);
}

#[test]
fn generation_is_deterministic() {
    let a = generate_topology(&SizeTier::Medium.config(42));
    let b = generate_topology(&SizeTier::Medium.config(42));
    assert_eq!(a, b);
}

#[test]
fn different_seeds_differ() {
    let a = generate_topology(&SizeTier::Medium.config(1));
    let b = generate_topology(&SizeTier::Medium.config(2));
    assert_ne!(a.glues, b.glues);
}

#[test]
fn tier_sizes_are_ordered() {
    let sizes: Vec<usize> = [
        SizeTier::Small,
        SizeTier::Medium,
        SizeTier::Large,
        SizeTier::XLarge,
    ]
    .iter()
    .map(|t| t.config(42).num_layers)
    .collect();
    assert!(sizes.windows(2).all(|w| w[0] < w[1]), "sizes: {sizes:?}");
}

#[test]
fn feed_forward_config_has_no_cycles() {
    let config = GeneratorConfig {
        feedback_density: 0.0,
        self_loop_density: 0.0,
        ..SizeTier::Medium.config(42)
    };
    let mut registry = generate_topology(&config).registry().expect("expands");
    let result = schedule(&registry.nodes, &mut registry.edges).expect("schedules");
    assert!(result.cycles.is_empty());
}

#[test]
fn recurrent_config_has_cycles() {
    let config = GeneratorConfig {
        self_loop_density: 1.0,
        ..SizeTier::Small.config(42)
    };
    let mut registry = generate_topology(&config).registry().expect("expands");
    let result = schedule(&registry.nodes, &mut registry.edges).expect("schedules");
    assert!(result.cycles.len() >= config.num_layers);
}
