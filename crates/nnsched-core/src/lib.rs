#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod dot;
pub mod error;
pub mod graph;
pub mod ids;
pub mod pipeline;
pub mod structures;
pub mod topology;

pub use dot::{DotOptions, render_dot};
pub use error::ScheduleError;
pub use graph::{
    Cycle, CycleReport, EdgeWeight, Graph, NodeWeight, SharedEdge, Traversal, build_graph,
    detect_cycles, detect_cycles_with, overlapping_cycles, schedule_edges, topo_order,
};
pub use ids::{EdgeId, NodeId};
pub use pipeline::{Schedule, ScheduleConfig, schedule, schedule_with_config};
pub use structures::{EdgeSpec, NodeSpec, RecurType};
pub use topology::{
    Attrs, GlueDecl, GlueLink, INPUT_LAYER, LayerDecl, OUTPUT_LAYER, Registry, Topology,
    TopologyError,
};

/// Returns the current version of the nnsched-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn version_is_semver() {
        let v = version();
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "version should have 3 parts: {v}");
        for part in parts {
            part.parse::<u32>().expect("each part should be a number");
        }
    }
}
