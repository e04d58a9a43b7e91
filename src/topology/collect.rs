use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

use super::graph::TopologyGraph;
use super::parse::parse_discovery;

/// Reads a discovery result from disk and builds the graph model from it.
pub fn load_discovery(path: &Path) -> Result<TopologyGraph> {
    let raw = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let result = parse_discovery(&raw).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let raw_links = result.links.len();
    let graph = TopologyGraph::try_new(result.nodes, result.links)?;
    log::info!(
        "loaded discovery {} ({} nodes, {} of {} links)",
        path.display(),
        graph.len(),
        graph.links().len(),
        raw_links
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_discovery(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn loads_and_drops_dangling_links() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("discovery.json");
        fs::write(
            &path,
            r#"{"nodes": [{"id": "a", "label": "A"}, {"id": "b", "label": "B"}],
                "links": [{"id": "l1", "source": "a", "target": "b"},
                          {"id": "l2", "source": "b", "target": "gone"}]}"#,
        )
        .expect("write");

        let graph = load_discovery(&path).expect("load");
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.links().len(), 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("discovery.json");
        fs::write(
            &path,
            r#"{"nodes": [{"id": "a", "label": "A"}, {"id": "a", "label": "B"}], "links": []}"#,
        )
        .expect("write");

        assert!(matches!(
            load_discovery(&path),
            Err(Error::InvalidDiscovery(_))
        ));
    }
}
