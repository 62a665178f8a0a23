//! Generates the huge-tier benchmark fixtures to disk.
//!
//! Writes both the text and the JSON form to `target/bench-fixtures/`;
//! they are loaded by `benches/huge_topology.rs` at benchmark time.

use std::error::Error;
use std::fs;

use nnsched_bench::{SizeTier, generate_topology, huge_fixture_path, huge_json_fixture_path};

fn main() -> Result<(), Box<dyn Error>> {
    let text_path = huge_fixture_path();
    let json_path = huge_json_fixture_path();

    if let Some(parent) = text_path.parent() {
        fs::create_dir_all(parent)?;
    }

    eprintln!("Generating Huge tier (~200K layers)...");
    let topology = generate_topology(&SizeTier::Huge.config(42));
    let registry = topology.registry()?;
    eprintln!(
        "Generated {} layers, {} glues, {} edges",
        topology.layers.len(),
        topology.glues.len(),
        registry.edges.len()
    );

    eprintln!("Writing text to {}...", text_path.display());
    fs::write(&text_path, topology.to_string())?;

    eprintln!("Writing JSON to {}...", json_path.display());
    fs::write(&json_path, topology.to_json()?)?;

    let text_len = fs::metadata(&text_path)?.len();
    let json_len = fs::metadata(&json_path)?.len();
    eprintln!(
        "text: {:.1} MB, JSON: {:.1} MB",
        text_len as f64 / (1024.0 * 1024.0),
        json_len as f64 / (1024.0 * 1024.0)
    );

    Ok(())
}
