//! Post-pipeline invariant tests using generated data.
#![allow(clippy::expect_used)]

use nnsched_bench::correctness;
use nnsched_bench::{GeneratorConfig, SizeTier, generate_topology};
use nnsched_core::{
    EdgeSpec, NodeSpec, RecurType, Registry, Schedule, ScheduleConfig, Traversal, build_graph,
    schedule_with_config,
};
use proptest::prelude::*;

fn scheduled(config: &GeneratorConfig, traversal: Traversal) -> (Registry, Schedule) {
    let mut registry = generate_topology(config).registry().expect("expands");
    let result = schedule_with_config(
        &registry.nodes,
        &mut registry.edges,
        &ScheduleConfig::default().with_traversal(traversal),
    )
    .expect("schedules");
    (registry, result)
}

#[test]
fn graph_construction_invariants() {
    let registry = generate_topology(&SizeTier::Medium.config(42))
        .registry()
        .expect("expands");
    let graph = build_graph(&registry.nodes, &registry.edges).expect("builds");
    correctness::check_graph_invariants(&registry.nodes, &registry.edges, &graph)
        .expect("graph invariants hold");
}

#[test]
fn medium_schedules_satisfy_all_invariants() {
    for seed in [42, 123, 999] {
        for traversal in [Traversal::Iterative, Traversal::Recursive] {
            let (registry, result) = scheduled(&SizeTier::Medium.config(seed), traversal);
            correctness::check_all(&registry.nodes, &registry.edges, &result)
                .expect("invariants hold");
        }
    }
}

#[test]
fn large_schedule_satisfies_all_invariants() {
    let (registry, result) = scheduled(&SizeTier::Large.config(42), Traversal::Iterative);
    correctness::check_all(&registry.nodes, &registry.edges, &result).expect("invariants hold");
}

#[test]
fn traversals_agree_on_large() {
    let config = SizeTier::Large.config(7);
    let (iter_registry, iterative) = scheduled(&config, Traversal::Iterative);
    let (rec_registry, recursive) = scheduled(&config, Traversal::Recursive);
    assert_eq!(iterative, recursive);
    assert_eq!(iter_registry.edges, rec_registry.edges);
}

// ---------------------------------------------------------------------------
// Checkers reject broken schedules
// ---------------------------------------------------------------------------

#[test]
fn permutation_check_rejects_duplicates() {
    assert!(correctness::check_permutation(&[0, 1, 1], 3, "edge").is_err());
    assert!(correctness::check_permutation(&[0, 1], 3, "edge").is_err());
    assert!(correctness::check_permutation(&[0, 5, 1], 3, "edge").is_err());
    assert!(correctness::check_permutation(&[2, 0, 1], 3, "edge").is_ok());
}

#[test]
fn grouping_check_rejects_reordered_edges() {
    let (registry, mut result) = scheduled(&SizeTier::Small.config(42), Traversal::Iterative);
    let last = result.edge_order.len() - 1;
    result.edge_order.swap(0, last);
    assert!(correctness::check_edge_grouping(&registry.edges, &result).is_err());
}

#[test]
fn forward_check_rejects_reversed_node_order() {
    let (registry, mut result) = scheduled(&SizeTier::Small.config(42), Traversal::Iterative);
    result.node_order.reverse();
    assert!(correctness::check_forward_edges(&registry.edges, &result).is_err());
}

#[test]
fn head_check_rejects_unclassified_self_loop() {
    let nodes = vec![NodeSpec::entry("in"), NodeSpec::new("h")];
    let mut edges = vec![EdgeSpec::new(0usize, 1usize), EdgeSpec::new(1usize, 1usize)];
    assert!(correctness::check_heads_break_cycles(&nodes, &edges).is_err());

    edges[1].recur = RecurType::CycleHead;
    assert!(correctness::check_heads_break_cycles(&nodes, &edges).is_ok());
}

#[test]
fn scc_check_rejects_recurrent_bridge() {
    let nodes = vec![NodeSpec::entry("in"), NodeSpec::new("h")];
    let mut edges = vec![EdgeSpec::new(0usize, 1usize)];
    edges[0].recur = RecurType::CycleBody;
    assert!(correctness::check_recurrent_edges_in_scc(&nodes, &edges).is_err());
}

// ---------------------------------------------------------------------------
// Random generator configurations
// ---------------------------------------------------------------------------

fn arb_config() -> impl Strategy<Value = GeneratorConfig> {
    (
        any::<u64>(),
        0usize..60,
        1usize..8,
        1usize..4,
        0.0f64..=1.0,
        0.0f64..=1.0,
        0.0f64..=1.0,
    )
        .prop_map(
            |(seed, num_layers, depth, max_fan_in, skip, feedback, self_loop)| GeneratorConfig {
                seed,
                num_layers,
                depth,
                max_fan_in,
                skip_density: skip,
                feedback_density: feedback,
                self_loop_density: self_loop,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_configs_satisfy_all_invariants(config in arb_config()) {
        let (registry, result) = scheduled(&config, Traversal::Iterative);
        prop_assert_eq!(
            correctness::check_all(&registry.nodes, &registry.edges, &result),
            Ok(())
        );
    }
}
