use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::{Point, PositionMap};
use crate::util::stable_hash;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Source,
    Destination,
    Gateway,
}

impl NodeRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Destination => "destination",
            Self::Gateway => "gateway",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArpEntry {
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iface: Option<String>,
    #[serde(default, alias = "phys_iface", skip_serializing_if = "Option::is_none")]
    pub phys_iface: Option<String>,
}

impl ArpEntry {
    pub fn interface(&self) -> Option<&str> {
        self.phys_iface.as_deref().or(self.iface.as_deref())
    }
}

/// A discovered device.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mgmt_ip: Option<String>,
    #[serde(
        default,
        rename = "type",
        alias = "deviceType",
        skip_serializing_if = "Option::is_none"
    )]
    pub device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<NodeRole>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chips: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arp: Vec<ArpEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    /// Management address when known, otherwise the node id.
    pub fn display_address(&self) -> &str {
        self.mgmt_ip.as_deref().unwrap_or(&self.id)
    }

    pub fn device_type(&self) -> &str {
        self.device_type.as_deref().unwrap_or("unknown")
    }

    pub fn persisted_position(&self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

/// An observed adjacency between two devices.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    #[serde(
        default,
        rename = "srcIfName",
        alias = "sourceInterface",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_interface: Option<String>,
    #[serde(
        default,
        rename = "dstIfName",
        alias = "targetInterface",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_interface: Option<String>,
}

impl Link {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_interfaces(
        mut self,
        source_interface: impl Into<String>,
        target_interface: impl Into<String>,
    ) -> Self {
        self.source_interface = Some(source_interface.into());
        self.target_interface = Some(target_interface.into());
        self
    }
}

/// Canonical in-memory topology: nodes, links whose endpoints all exist, and the
/// undirected adjacency derived from them.
#[derive(Clone, Debug, Default)]
pub struct TopologyGraph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    index_by_id: HashMap<String, usize>,
    link_endpoints: Vec<(usize, usize)>,
    adjacency: Vec<Vec<usize>>,
}

impl TopologyGraph {
    /// Builds the graph, dropping nodes without an id, repeated node ids and links
    /// with a missing endpoint. Each drop is logged.
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        let mut kept = Vec::with_capacity(nodes.len());
        let mut seen = HashSet::with_capacity(nodes.len());
        for mut node in nodes {
            if node.id.is_empty() {
                log::warn!("dropping discovered node without an id (label {:?})", node.label);
                continue;
            }
            if !seen.insert(node.id.clone()) {
                log::warn!("dropping repeated node id {}", node.id);
                continue;
            }
            if node.label.is_empty() {
                node.label = node.id.clone();
            }
            kept.push(node);
        }

        Self::assemble(kept, links)
    }

    /// Like [`TopologyGraph::new`] but rejects missing or repeated node ids.
    pub fn try_new(nodes: Vec<Node>, links: Vec<Link>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if node.id.is_empty() {
                return Err(Error::InvalidDiscovery(format!(
                    "node {:?} has an empty id",
                    node.label
                )));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(Error::InvalidDiscovery(format!(
                    "node id {} appears more than once",
                    node.id
                )));
            }
        }

        Ok(Self::new(nodes, links))
    }

    fn assemble(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();

        let mut kept_links = Vec::with_capacity(links.len());
        let mut link_endpoints = Vec::with_capacity(links.len());
        let mut adjacency = vec![Vec::new(); nodes.len()];

        for link in links {
            let (Some(&source), Some(&target)) = (
                index_by_id.get(&link.source),
                index_by_id.get(&link.target),
            ) else {
                log::warn!(
                    "dropping link {} with missing endpoint ({} -> {})",
                    link.id,
                    link.source,
                    link.target
                );
                continue;
            };

            if source != target {
                if !adjacency[source].contains(&target) {
                    adjacency[source].push(target);
                }
                if !adjacency[target].contains(&source) {
                    adjacency[target].push(source);
                }
            }

            link_endpoints.push((source, target));
            kept_links.push(link);
        }

        Self {
            nodes,
            links: kept_links,
            index_by_id,
            link_endpoints,
            adjacency,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    /// `(source, target)` node indices, parallel to [`TopologyGraph::links`].
    pub fn link_endpoints(&self) -> &[(usize, usize)] {
        &self.link_endpoints
    }

    /// Distinct neighbours of the node at `index`, in link order.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }

    /// Links touching `id`, each paired with the interface on `id`'s side and the peer.
    pub fn links_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = LinkEnd<'a>> + 'a {
        self.links.iter().filter_map(move |link| {
            if link.source == id {
                Some(LinkEnd {
                    link,
                    local_interface: link.source_interface.as_deref(),
                    peer: link.target.as_str(),
                    peer_interface: link.target_interface.as_deref(),
                })
            } else if link.target == id {
                Some(LinkEnd {
                    link,
                    local_interface: link.target_interface.as_deref(),
                    peer: link.source.as_str(),
                    peer_interface: link.source_interface.as_deref(),
                })
            } else {
                None
            }
        })
    }

    /// Coordinates embedded in the discovery result, for the nodes that carry both.
    pub fn persisted_positions(&self) -> PositionMap {
        self.nodes
            .iter()
            .filter_map(|node| {
                node.persisted_position()
                    .map(|point| (node.id.clone(), point))
            })
            .collect()
    }

    /// Identity of the node and link sets; changes whenever a different discovery
    /// result is loaded.
    pub fn fingerprint(&self) -> u64 {
        let node_parts = self.nodes.iter().map(|node| node.id.as_str());
        let link_parts = self.links.iter().flat_map(|link| {
            [
                link.id.as_str(),
                link.source.as_str(),
                link.target.as_str(),
            ]
        });
        stable_hash(node_parts.chain(std::iter::once("\u{0}")).chain(link_parts))
    }

    /// Copies `positions` back into the nodes' `x`/`y` fields.
    pub fn with_positions(&self, positions: &PositionMap) -> Vec<Node> {
        self.nodes
            .iter()
            .map(|node| {
                let mut node = node.clone();
                if let Some(point) = positions.get(&node.id) {
                    node.x = Some(point.x);
                    node.y = Some(point.y);
                }
                node
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LinkEnd<'a> {
    pub link: &'a Link,
    pub local_interface: Option<&'a str>,
    pub peer: &'a str,
    pub peer_interface: Option<&'a str>,
}
