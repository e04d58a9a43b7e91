use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::PositionMap;

use super::graph::{Link, Node, TopologyGraph};

/// Snapshot of the topology and its current placement.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub positions: PositionMap,
    pub exported_at: DateTime<Utc>,
}

impl ExportBundle {
    pub fn new(graph: &TopologyGraph, positions: &PositionMap, exported_at: DateTime<Utc>) -> Self {
        Self {
            nodes: graph.with_positions(positions),
            links: graph.links().to_vec(),
            positions: positions.clone(),
            exported_at,
        }
    }

    /// `cdp-topology-YYYY-MM-DD.json`, dated by the export timestamp.
    pub fn default_file_name(&self) -> String {
        format!("cdp-topology-{}.json", self.exported_at.format("%Y-%m-%d"))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let body = serde_json::to_string_pretty(self).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, body).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "exported {} nodes and {} links to {}",
            self.nodes.len(),
            self.links.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::layout::Point;

    #[test]
    fn bundle_serializes_wire_names() {
        let graph = TopologyGraph::new(
            vec![Node::new("a", "A"), Node::new("b", "B")],
            vec![Link::new("l1", "a", "b").with_interfaces("Gi0/1", "Gi0/2")],
        );
        let positions = PositionMap::from([
            ("a".to_owned(), Point::new(100.0, 200.0)),
            ("b".to_owned(), Point::new(400.0, 200.0)),
        ]);
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();

        let bundle = ExportBundle::new(&graph, &positions, at);
        assert_eq!(bundle.default_file_name(), "cdp-topology-2024-05-17.json");

        let value = serde_json::to_value(&bundle).expect("serialize");
        assert_eq!(value["exportedAt"], "2024-05-17T08:30:00Z");
        assert_eq!(value["nodes"][0]["x"], 100.0);
        assert_eq!(value["links"][0]["srcIfName"], "Gi0/1");
        assert_eq!(value["positions"]["b"]["x"], 400.0);
    }

    #[test]
    fn write_to_creates_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = TopologyGraph::new(vec![Node::new("a", "A")], Vec::new());
        let bundle = ExportBundle::new(&graph, &PositionMap::new(), Utc::now());
        let path = dir.path().join(bundle.default_file_name());

        bundle.write_to(&path).expect("write");
        let raw = fs::read_to_string(&path).expect("read back");
        let parsed: ExportBundle = serde_json::from_str(&raw).expect("parse back");
        assert_eq!(parsed.nodes.len(), 1);
    }
}
