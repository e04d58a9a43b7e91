use std::fs;
use std::path::{Path, PathBuf};

use cdp_topology::{
    CanvasParams, ExportBundle, GestureStart, JsonFileStore, LayoutSeed, LayoutSession, Point,
    PositionStore, TopologyGraph, load_discovery,
};
use chrono::{TimeZone, Utc};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("discovery")
        .join(name)
}

fn campus() -> TopologyGraph {
    load_discovery(&fixture("campus.json")).expect("load campus fixture")
}

fn loaded_session() -> LayoutSession {
    let mut session = LayoutSession::new(CanvasParams::default(), LayoutSeed::Fixed(12));
    assert!(session.load(campus(), None));
    session
}

fn assert_close(actual: Point, expected: Point) {
    assert!(
        actual.distance(expected) < 1e-9,
        "{actual:?} differs from {expected:?}"
    );
}

fn drag(session: &mut LayoutSession, id: &str, by: Point) -> Point {
    let view_origin = Point::new(300.0, 60.0);
    let start = session.positions()[id];
    let press = session.viewport().to_client(start, view_origin);

    assert_eq!(
        session.pointer_down(press, view_origin),
        GestureStart::Drag(id.to_owned())
    );
    session.pointer_move(press + by, view_origin);
    session.pointer_up().expect("drag commit").position
}

#[test]
fn saved_drag_survives_a_fresh_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("campus.layout.json"));

    let mut session = loaded_session();
    let moved = drag(&mut session, "wan-edge", Point::new(-40.0, 25.0));
    assert!(session.is_unsaved());
    session.save(&store).expect("save layout");
    assert!(!session.is_unsaved());

    let persisted = store.load().expect("load layout").expect("layout present");
    let mut reopened = LayoutSession::new(CanvasParams::default(), LayoutSeed::Random);
    reopened.load(campus(), Some(&persisted));

    assert_eq!(reopened.positions().len(), session.positions().len());
    for (id, point) in session.positions() {
        assert_close(reopened.positions()[id], *point);
    }
    assert_close(reopened.positions()["wan-edge"], moved);
}

#[test]
fn reloading_same_topology_keeps_dragged_positions() {
    let mut session = loaded_session();
    let moved = drag(&mut session, "dist-a", Point::new(30.0, 30.0));

    assert!(!session.load(campus(), None));
    assert_eq!(session.positions()["dist-a"], moved);
}

#[test]
fn changed_topology_is_laid_out_again() {
    let mut session = loaded_session();

    let raw = fs::read_to_string(fixture("campus.json")).expect("read fixture");
    let dir = tempfile::tempdir().expect("tempdir");
    let smaller = dir.path().join("smaller.json");
    fs::write(&smaller, raw.replace(r#""id": "lab-ap""#, r#""id": "lab-ap-2""#))
        .expect("write variant");

    assert!(session.load(load_discovery(&smaller).expect("load variant"), None));
    assert!(session.positions().contains_key("lab-ap-2"));
    assert!(!session.positions().contains_key("lab-ap"));
}

#[test]
fn failed_save_leaves_layout_in_memory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("missing").join("layout.json"));

    let mut session = loaded_session();
    drag(&mut session, "dist-b", Point::new(10.0, 0.0));
    let before = session.positions().clone();

    let error = session.save(&store).expect_err("parent directory is missing");
    let report = error.report();
    assert!(report.starts_with("failed to access"), "{report}");
    assert!(report.len() > error.to_string().len(), "cause missing: {report}");
    assert!(session.is_unsaved());
    assert_eq!(session.positions(), &before);
}

#[test]
fn export_bundle_carries_positions_into_nodes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = loaded_session();
    let at = Utc.with_ymd_and_hms(2025, 3, 9, 14, 0, 0).unwrap();

    let bundle = session.export(at).expect("non-empty graph");
    assert_eq!(bundle.default_file_name(), "cdp-topology-2025-03-09.json");

    let target = dir.path().join(bundle.default_file_name());
    bundle.write_to(&target).expect("write export");

    let raw = fs::read_to_string(&target).expect("read export");
    let read_back: ExportBundle = serde_json::from_str(&raw).expect("parse export");
    for (id, point) in session.positions() {
        assert_close(read_back.positions[id], *point);
    }
    assert_eq!(read_back.links.len(), 5);
    let core = read_back
        .nodes
        .iter()
        .find(|node| node.id == "core-1")
        .expect("core node");
    let embedded = core.persisted_position().expect("embedded coordinates");
    assert_close(embedded, session.positions()["core-1"]);
}

#[test]
fn empty_discovery_has_nothing_to_export() {
    let mut session = LayoutSession::new(CanvasParams::default(), LayoutSeed::Random);
    session.load(load_discovery(&fixture("empty.json")).expect("load empty"), None);

    session.spread_devices();
    assert!(session.positions().is_empty());
    assert!(session.export(Utc::now()).is_none());
}
