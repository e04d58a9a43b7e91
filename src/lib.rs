//! Layout core for discovered network topologies: device placement, viewport math and
//! the interactive layout session that the `cdp-topology` viewer drives.
#![forbid(unsafe_code)]

pub mod error;
pub mod layout;
pub mod session;
pub mod topology;
pub mod util;
pub mod viewport;

pub use error::{Error, Result};
pub use layout::{CanvasParams, LayoutSeed, Point, PositionMap, compute_layout, resolve_layout};
pub use session::{Gesture, GestureStart, LayoutSession, PositionCommit};
pub use topology::{ExportBundle, JsonFileStore, PositionStore, TopologyGraph, load_discovery};
pub use viewport::Viewport;
