//! The mutable side of the layout core: one position store, the viewport, the
//! active pointer gesture and the user commands that act on them.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::layout::{CanvasParams, LayoutSeed, Point, PositionMap, compute_layout, resolve_layout};
use crate::topology::{ExportBundle, PositionStore, TopologyGraph};
use crate::viewport::{DragGesture, PanGesture, Viewport};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Drag(DragGesture),
    Pan(PanGesture),
}

/// What a pointer press started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureStart {
    Drag(String),
    Pan,
}

/// A single node position written into the store when a drag ends.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionCommit {
    pub node_id: String,
    pub position: Point,
}

pub struct LayoutSession {
    graph: TopologyGraph,
    params: CanvasParams,
    seed: LayoutSeed,
    positions: PositionMap,
    viewport: Viewport,
    gesture: Gesture,
    fingerprint: Option<u64>,
    connections_visible: bool,
    unsaved: bool,
}

impl LayoutSession {
    pub fn new(params: CanvasParams, seed: LayoutSeed) -> Self {
        params.validate();
        Self {
            graph: TopologyGraph::default(),
            params,
            seed,
            positions: PositionMap::new(),
            viewport: Viewport::default(),
            gesture: Gesture::Idle,
            fingerprint: None,
            connections_visible: true,
            unsaved: false,
        }
    }

    /// Replaces the graph. The layout is reconciled only when the node/link identity
    /// differs from the graph already loaded; returns whether that happened.
    pub fn load(&mut self, graph: TopologyGraph, persisted: Option<&PositionMap>) -> bool {
        let fingerprint = graph.fingerprint();
        self.graph = graph;

        if self.fingerprint == Some(fingerprint) {
            log::debug!("graph identity unchanged; keeping current layout");
            return false;
        }

        self.positions = resolve_layout(&self.graph, persisted, &self.params, self.seed);
        self.fingerprint = Some(fingerprint);
        self.gesture = Gesture::Idle;
        self.unsaved = false;
        true
    }

    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    pub fn params(&self) -> &CanvasParams {
        &self.params
    }

    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn connections_visible(&self) -> bool {
        self.connections_visible
    }

    /// Positions differ from what was last loaded or saved.
    pub fn is_unsaved(&self) -> bool {
        self.unsaved
    }

    /// Where `id` is drawn right now, including an uncommitted drag.
    pub fn position(&self, id: &str) -> Option<Point> {
        if let Gesture::Drag(drag) = &self.gesture
            && drag.node_id == id
        {
            return Some(drag.current);
        }
        self.positions.get(id).copied()
    }

    /// Topmost card under a model-space point. Later nodes are drawn over earlier ones.
    pub fn node_at(&self, model: Point) -> Option<&str> {
        let half_width = self.params.card_width / 2.0;
        let half_height = self.params.card_height / 2.0;
        self.graph.nodes().iter().rev().find_map(|node| {
            let position = self.position(&node.id)?;
            let hit = (model.x - position.x).abs() <= half_width
                && (model.y - position.y).abs() <= half_height;
            hit.then_some(node.id.as_str())
        })
    }

    /// Starts a drag when the press lands on a card, a pan otherwise.
    pub fn pointer_down(&mut self, client: Point, view_origin: Point) -> GestureStart {
        let model = self.viewport.to_model(client, view_origin);
        let hit = self
            .node_at(model)
            .map(|id| (id.to_owned(), self.position(id)));

        match hit {
            Some((node_id, Some(node_position))) => {
                self.gesture =
                    Gesture::Drag(DragGesture::begin(node_id.clone(), model, node_position));
                GestureStart::Drag(node_id)
            }
            _ => {
                self.gesture = Gesture::Pan(PanGesture::begin(client, &self.viewport));
                GestureStart::Pan
            }
        }
    }

    pub fn pointer_move(&mut self, client: Point, view_origin: Point) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Drag(drag) => {
                let model = self.viewport.to_model(client, view_origin);
                drag.update(model, &self.params);
            }
            Gesture::Pan(pan) => {
                let scroll = pan.scroll_for(client);
                self.viewport.scroll_to(scroll, &self.params);
            }
        }
    }

    /// Ends the active gesture. A drag writes its node's position into the store.
    pub fn pointer_up(&mut self) -> Option<PositionCommit> {
        let Gesture::Drag(drag) = std::mem::take(&mut self.gesture) else {
            return None;
        };

        let moved = self.positions.get(&drag.node_id) != Some(&drag.current);
        self.positions.insert(drag.node_id.clone(), drag.current);
        if moved {
            self.unsaved = true;
            log::debug!(
                "moved {} to ({:.1}, {:.1})",
                drag.node_id,
                drag.current.x,
                drag.current.y
            );
        }

        Some(PositionCommit {
            node_id: drag.node_id,
            position: drag.current,
        })
    }

    /// Recomputes every position from scratch and resets zoom and scroll.
    pub fn reset_view(&mut self) {
        if self.graph.is_empty() {
            return;
        }
        self.recompute();
        self.viewport.reset();
    }

    /// Recomputes every position from scratch, keeping the current framing.
    pub fn spread_devices(&mut self) {
        if self.graph.is_empty() {
            return;
        }
        self.recompute();
    }

    pub fn toggle_connections(&mut self) {
        if self.graph.is_empty() {
            return;
        }
        self.connections_visible = !self.connections_visible;
    }

    pub fn zoom_in(&mut self) {
        if self.graph.is_empty() {
            return;
        }
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        if self.graph.is_empty() {
            return;
        }
        self.viewport.zoom_out();
    }

    /// Snapshot for the export serializer; `None` for an empty graph.
    pub fn export(&self, exported_at: DateTime<Utc>) -> Option<ExportBundle> {
        if self.graph.is_empty() {
            return None;
        }
        Some(ExportBundle::new(&self.graph, &self.positions, exported_at))
    }

    /// Writes the full PositionMap to `store`. The in-memory layout is kept either way.
    pub fn save(&mut self, store: &dyn PositionStore) -> Result<()> {
        store.save(&self.positions)?;
        self.unsaved = false;
        Ok(())
    }

    fn recompute(&mut self) {
        self.gesture = Gesture::Idle;
        self.positions = compute_layout(&self.graph, &self.params, self.seed);
        self.unsaved = true;
        log::info!("recomputed layout for {} nodes", self.graph.len());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::Error;
    use crate::topology::{Link, Node};

    fn session() -> LayoutSession {
        LayoutSession::new(CanvasParams::default(), LayoutSeed::Fixed(9))
    }

    fn path_graph() -> TopologyGraph {
        TopologyGraph::new(
            vec![Node::new("a", "A"), Node::new("b", "B"), Node::new("c", "C")],
            vec![Link::new("l1", "a", "b"), Link::new("l2", "b", "c")],
        )
    }

    #[derive(Default)]
    struct MemoryStore {
        saved: RefCell<Option<PositionMap>>,
        fail: bool,
    }

    impl PositionStore for MemoryStore {
        fn load(&self) -> Result<Option<PositionMap>> {
            Ok(self.saved.borrow().clone())
        }

        fn save(&self, positions: &PositionMap) -> Result<()> {
            if self.fail {
                return Err(Error::InvalidDiscovery("store offline".to_owned()));
            }
            *self.saved.borrow_mut() = Some(positions.clone());
            Ok(())
        }
    }

    #[test]
    fn load_reconciles_once_per_graph_identity() {
        let mut session = session();
        assert!(session.load(path_graph(), None));
        let first = session.positions().clone();

        session.zoom_in();
        assert!(!session.load(path_graph(), None));
        assert_eq!(session.positions(), &first);
    }

    #[test]
    fn drag_commits_position_on_release() {
        let mut session = session();
        session.load(path_graph(), None);
        let start = session.positions()["b"];
        let view_origin = Point::ZERO;
        let params = *session.params();
        session.viewport_mut().scroll_to(Point::new(40.0, 25.0), &params);
        let scroll = session.viewport().scroll();

        let press = session.viewport().to_client(start + Point::new(5.0, 5.0), view_origin);
        assert_eq!(
            session.pointer_down(press, view_origin),
            GestureStart::Drag("b".to_owned())
        );

        session.pointer_move(press + Point::new(60.0, -40.0), view_origin);
        let expected = start + Point::new(60.0, -40.0);
        let preview = session.position("b").expect("preview");
        assert!(preview.distance(expected) < 1e-9, "{preview:?}");
        assert_eq!(session.positions()["b"], start);
        assert_eq!(session.viewport().scroll(), scroll);

        let commit = session.pointer_up().expect("commit");
        assert_eq!(commit.node_id, "b");
        assert_eq!(session.positions()["b"], preview);
        assert_eq!(session.viewport().scroll(), scroll);
        assert!(session.is_unsaved());
        assert_eq!(session.gesture(), &Gesture::Idle);
    }

    #[test]
    fn drag_is_zoom_compensated() {
        let mut session = session();
        session.load(path_graph(), None);
        session.zoom_in();
        session.zoom_in();
        let start = session.positions()["a"];
        let view_origin = Point::new(40.0, 60.0);

        let press = session.viewport().to_client(start, view_origin);
        session.pointer_down(press, view_origin);
        session.pointer_move(press + Point::new(70.0, 14.0), view_origin);
        session.pointer_up();

        let moved = session.positions()["a"];
        assert!((moved.x - (start.x + 50.0)).abs() < 1e-9);
        assert!((moved.y - (start.y + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn background_press_pans_without_moving_nodes() {
        let mut session = session();
        session.load(path_graph(), None);
        let before = session.positions().clone();

        assert_eq!(session.pointer_down(Point::new(2.0, 2.0), Point::ZERO), GestureStart::Pan);
        session.pointer_move(Point::new(-98.0, -48.0), Point::ZERO);
        assert_eq!(session.viewport().scroll(), Point::new(100.0, 50.0));
        assert!(session.pointer_up().is_none());
        assert_eq!(session.positions(), &before);
        assert!(!session.is_unsaved());
    }

    #[test]
    fn reset_view_restores_framing_and_spread_keeps_it() {
        let mut session = session();
        session.load(path_graph(), None);
        session.zoom_in();
        session.viewport_mut().scroll_to(Point::new(30.0, 30.0), &CanvasParams::default());

        session.spread_devices();
        assert_eq!(session.viewport().zoom(), 1.2);
        assert_eq!(session.viewport().scroll(), Point::new(30.0, 30.0));
        assert!(session.is_unsaved());

        session.reset_view();
        assert_eq!(session.viewport().zoom(), 1.0);
        assert_eq!(session.viewport().scroll(), Point::ZERO);
        assert_eq!(session.positions().len(), 3);
    }

    #[test]
    fn commands_are_noops_on_empty_graph() {
        let mut session = session();
        session.load(TopologyGraph::default(), None);

        session.zoom_in();
        session.toggle_connections();
        session.reset_view();
        session.spread_devices();
        assert_eq!(session.viewport().zoom(), 1.0);
        assert!(session.connections_visible());
        assert!(session.positions().is_empty());
        assert!(session.export(Utc::now()).is_none());
    }

    #[test]
    fn toggle_connections_leaves_positions_alone() {
        let mut session = session();
        session.load(path_graph(), None);
        let before = session.positions().clone();

        session.toggle_connections();
        assert!(!session.connections_visible());
        assert_eq!(session.positions(), &before);
    }

    #[test]
    fn failed_save_keeps_layout_and_unsaved_flag() {
        let mut session = session();
        session.load(path_graph(), None);
        session.spread_devices();
        let before = session.positions().clone();

        let broken = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };
        assert!(session.save(&broken).is_err());
        assert!(session.is_unsaved());
        assert_eq!(session.positions(), &before);

        let store = MemoryStore::default();
        session.save(&store).expect("save");
        assert!(!session.is_unsaved());
        assert_eq!(store.load().expect("load"), Some(before));
    }
}
