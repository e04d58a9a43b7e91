use crate::topology::TopologyGraph;

use super::leveling::{LayoutSeed, initial_layout};
use super::relax::relax;
use super::{CanvasParams, PositionMap};

/// Fresh layout: ring placement followed by relaxation.
pub fn compute_layout(graph: &TopologyGraph, params: &CanvasParams, seed: LayoutSeed) -> PositionMap {
    let initial = initial_layout(graph, params, seed);
    relax(graph, &initial, params)
}

/// Returns `persisted` unchanged when its key set is exactly the graph's node set,
/// otherwise computes a fresh layout. A partial match is discarded entirely.
pub fn resolve_layout(
    graph: &TopologyGraph,
    persisted: Option<&PositionMap>,
    params: &CanvasParams,
    seed: LayoutSeed,
) -> PositionMap {
    if let Some(persisted) = persisted {
        if covers_exactly(graph, persisted) {
            log::debug!("using persisted layout for {} nodes", persisted.len());
            return persisted.clone();
        }
        log::debug!(
            "persisted layout covers {} entries for {} nodes; recomputing",
            persisted.len(),
            graph.len()
        );
    }

    compute_layout(graph, params, seed)
}

fn covers_exactly(graph: &TopologyGraph, persisted: &PositionMap) -> bool {
    persisted.len() == graph.len()
        && graph
            .nodes()
            .iter()
            .all(|node| persisted.contains_key(&node.id))
}
