/// Edges shared between detected cycles.
///
/// When several loops run through the same edge, each loop's head drives the
/// recurrent training settings of that edge. Callers use this report to make
/// sure those settings agree.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::cycles::Cycle;
use crate::ids::EdgeId;

/// An edge lying on two or more cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedEdge {
    /// The shared edge.
    pub edge: EdgeId,
    /// Indices into the cycle list, ascending.
    pub cycles: Vec<usize>,
}

/// Lists every edge that appears in more than one of `cycles`, ascending by
/// edge id.
pub fn overlapping_cycles(cycles: &[Cycle]) -> Vec<SharedEdge> {
    let mut membership: BTreeMap<EdgeId, Vec<usize>> = BTreeMap::new();
    for (index, cycle) in cycles.iter().enumerate() {
        for edge in cycle.edges() {
            let entry = membership.entry(edge).or_default();
            if entry.last() != Some(&index) {
                entry.push(index);
            }
        }
    }

    membership
        .into_iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|(edge, cycles)| SharedEdge { edge, cycles })
        .collect()
}
