use serde::Deserialize;
use serde_json::Value;

use super::graph::{Link, Node};

/// Node and link lists as produced by the discovery job.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DiscoveryResult {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Parses a discovery result. Accepts the bare `{nodes, links}` document as well as
/// the `{graph: {nodes, links}}` envelope used when a layout is written back.
pub(super) fn parse_discovery(raw: &str) -> serde_json::Result<DiscoveryResult> {
    let parsed: Value = serde_json::from_str(raw)?;

    if let Some(graph) = parsed.get("graph").filter(|value| value.is_object()) {
        return DiscoveryResult::deserialize(graph);
    }

    DiscoveryResult::deserialize(&parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::NodeRole;

    #[test]
    fn parses_bare_document_with_aliases() {
        let raw = r#"{
            "nodes": [
                {"id": "n1", "label": "core-sw1", "mgmtIp": "10.0.0.1", "deviceType": "switch",
                 "role": "gateway", "chips": ["Gi0/1"],
                 "arp": [{"ip": "10.0.0.9", "mac": "aa:bb", "phys_iface": "Gi0/2"}]},
                {"id": "n2", "label": "edge-r1", "x": 120.5, "y": 80}
            ],
            "links": [
                {"id": "l1", "source": "n1", "target": "n2", "linkType": "cdp",
                 "sourceInterface": "Gi0/1", "dstIfName": "Fa0/0"}
            ]
        }"#;

        let result = parse_discovery(raw).expect("parse");
        assert_eq!(result.nodes.len(), 2);
        let core = &result.nodes[0];
        assert_eq!(core.mgmt_ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(core.device_type(), "switch");
        assert_eq!(core.role, Some(NodeRole::Gateway));
        assert_eq!(core.arp[0].interface(), Some("Gi0/2"));
        assert_eq!(result.nodes[1].x, Some(120.5));

        let link = &result.links[0];
        assert_eq!(link.source_interface.as_deref(), Some("Gi0/1"));
        assert_eq!(link.target_interface.as_deref(), Some("Fa0/0"));
        assert_eq!(link.link_type.as_deref(), Some("cdp"));
    }

    #[test]
    fn parses_graph_envelope() {
        let raw = r#"{"graph": {"nodes": [{"id": "a", "label": "A"}], "links": []}}"#;
        let result = parse_discovery(raw).expect("parse");
        assert_eq!(result.nodes.len(), 1);
        assert!(result.links.is_empty());
    }

    #[test]
    fn rejects_non_json() {
        assert!(parse_discovery("nodes: []").is_err());
    }
}
