mod collect;
mod export;
mod graph;
mod parse;
mod store;

pub use collect::load_discovery;
pub use export::ExportBundle;
pub use graph::{ArpEntry, Link, LinkEnd, Node, NodeRole, TopologyGraph};
pub use parse::DiscoveryResult;
pub use store::{JsonFileStore, PositionStore};
