use std::path::Path;

use anyhow::Context;
use cdp_topology::{JsonFileStore, PositionMap, PositionStore, TopologyGraph, load_discovery};

/// A discovery result together with whatever layout was saved for it.
pub struct LoadedDiscovery {
    pub graph: TopologyGraph,
    pub persisted: Option<PositionMap>,
}

/// Reads the discovery file and its saved layout. An unreadable layout file is not
/// fatal: the graph is laid out from scratch instead.
pub fn load_inputs(graph_path: &Path, store: &JsonFileStore) -> anyhow::Result<LoadedDiscovery> {
    let graph = load_discovery(graph_path)
        .with_context(|| format!("failed to load discovery result {}", graph_path.display()))?;

    let persisted = match store.load() {
        Ok(Some(positions)) => Some(positions),
        Ok(None) => {
            let embedded = graph.persisted_positions();
            (!embedded.is_empty()).then_some(embedded)
        }
        Err(error) => {
            log::warn!(
                "ignoring saved layout {}: {error}",
                store.path().display()
            );
            None
        }
    };

    Ok(LoadedDiscovery { graph, persisted })
}
