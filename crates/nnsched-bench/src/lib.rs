//! Recurrent topology generator and benchmark utilities for nnsched.
//!
//! This crate provides deterministic generation of layered network
//! topologies with skip, feedback and self-loop glues for benchmarking and
//! property-based testing of `nnsched-core`.

use std::path::PathBuf;

pub mod correctness;
pub mod generator;

pub use generator::{GeneratorConfig, SizeTier, generate_topology};

/// Returns the path where the huge-tier text fixture is stored on disk.
///
/// The file lives under `target/bench-fixtures/huge.topo` so it is
/// automatically gitignored and shared between the generator binary and
/// the benchmark harness.
pub fn huge_fixture_path() -> PathBuf {
    huge_fixtures_dir().join("huge.topo")
}

/// Returns the path where the huge-tier JSON fixture is stored on disk.
pub fn huge_json_fixture_path() -> PathBuf {
    huge_fixtures_dir().join("huge.topo.json")
}

fn huge_fixtures_dir() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .join("..")
        .join("..")
        .join("target")
        .join("bench-fixtures")
}
