//! Huge-tier benchmarks (~200K layers, ~500K edges).
//!
//! Kept separate from the smaller tiers so that `cargo bench` stays fast
//! during development. The fixture is written once by the `gen-topology`
//! binary and loaded here; setup is cached in a `OnceLock`.
#![allow(clippy::expect_used)]

use std::sync::OnceLock;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nnsched_bench::huge_fixture_path;
use nnsched_core::{Registry, Topology, build_graph, schedule};

struct HugeSetup {
    text: String,
    registry: Registry,
}

static SETUP: OnceLock<HugeSetup> = OnceLock::new();

fn get_setup() -> &'static HugeSetup {
    SETUP.get_or_init(|| {
        let path = huge_fixture_path();
        eprintln!("Loading huge fixture from {}...", path.display());
        let text = std::fs::read_to_string(&path)
            .expect("Failed to read huge fixture. Run the gen-topology binary first.");
        let registry = Topology::from_text(&text)
            .expect("parse huge fixture")
            .registry()
            .expect("expand huge fixture");
        eprintln!(
            "Huge tier ready: {} nodes, {} edges, {:.1} MB text",
            registry.nodes.len(),
            registry.edges.len(),
            text.len() as f64 / (1024.0 * 1024.0)
        );
        HugeSetup { text, registry }
    })
}

fn bench_huge(c: &mut Criterion) {
    let s = get_setup();
    let mut group = c.benchmark_group("huge");
    group.sample_size(10);
    group.measurement_time(std::time::Duration::from_secs(30));

    group.throughput(Throughput::Bytes(s.text.len() as u64));
    group.bench_function(BenchmarkId::from_parameter("parse_text"), |b| {
        b.iter(|| Topology::from_text(&s.text).expect("parses"));
    });

    let elements = (s.registry.nodes.len() + s.registry.edges.len()) as u64;
    group.throughput(Throughput::Elements(elements));
    group.bench_function(BenchmarkId::from_parameter("build_graph"), |b| {
        b.iter(|| build_graph(&s.registry.nodes, &s.registry.edges).expect("builds"));
    });

    group.bench_function(BenchmarkId::from_parameter("schedule"), |b| {
        b.iter_batched(
            || s.registry.edges.clone(),
            |mut edges| schedule(&s.registry.nodes, &mut edges).expect("schedules"),
            criterion::BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_huge);
criterion_main!(benches);
