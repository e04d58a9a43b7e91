//! Zoom and scroll state of the canvas view, and the coordinate math of drag and pan
//! gestures.
//!
//! Client coordinates are raw pointer positions on screen. Model coordinates are the
//! canvas space that [`PositionMap`](crate::layout::PositionMap) lives in. The canvas is
//! drawn scaled by `zoom` and shifted by the scroll offset, so its on-screen origin is
//! `view_origin - scroll`.

use crate::layout::{CanvasParams, Point};

pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    zoom: f64,
    scroll: Point,
    visible_size: Option<Point>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            scroll: Point::ZERO,
            visible_size: None,
        }
    }
}

impl Viewport {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    /// Sets zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`. Scroll offset and node positions
    /// are not touched.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            return;
        }
        // Round to hundredths so repeated steps do not drift.
        let zoom = (zoom * 100.0).round() / 100.0;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.scroll = Point::ZERO;
    }

    /// Size of the on-screen region showing the canvas; bounds how far it can scroll.
    pub fn set_visible_size(&mut self, size: Point) {
        self.visible_size = Some(size);
    }

    /// Largest scroll offset that still keeps canvas under the visible region.
    pub fn max_scroll(&self, params: &CanvasParams) -> Option<Point> {
        self.visible_size.map(|visible| {
            Point::new(
                (params.width * self.zoom - visible.x).max(0.0),
                (params.height * self.zoom - visible.y).max(0.0),
            )
        })
    }

    /// Moves the scroll offset, keeping it within the scrollable range.
    pub fn scroll_to(&mut self, offset: Point, params: &CanvasParams) {
        let mut x = offset.x.max(0.0);
        let mut y = offset.y.max(0.0);
        if let Some(max) = self.max_scroll(params) {
            x = x.min(max.x);
            y = y.min(max.y);
        }
        self.scroll = Point::new(x, y);
    }

    /// On-screen position of the canvas's model origin.
    pub fn canvas_origin(&self, view_origin: Point) -> Point {
        view_origin - self.scroll
    }

    pub fn to_model(&self, client: Point, view_origin: Point) -> Point {
        (client - self.canvas_origin(view_origin)) * (1.0 / self.zoom)
    }

    pub fn to_client(&self, model: Point, view_origin: Point) -> Point {
        self.canvas_origin(view_origin) + model * self.zoom
    }
}

/// Node drag in model space. The grab offset keeps the card from jumping so its
/// centre sits under the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct DragGesture {
    pub node_id: String,
    pub grab_offset: Point,
    pub current: Point,
}

impl DragGesture {
    pub fn begin(node_id: impl Into<String>, pointer_model: Point, node_position: Point) -> Self {
        Self {
            node_id: node_id.into(),
            grab_offset: pointer_model - node_position,
            current: node_position,
        }
    }

    pub fn update(&mut self, pointer_model: Point, params: &CanvasParams) -> Point {
        self.current = params.clamp(pointer_model - self.grab_offset);
        self.current
    }
}

/// Background pan in raw client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanGesture {
    pub start_client: Point,
    pub start_scroll: Point,
}

impl PanGesture {
    pub fn begin(client: Point, viewport: &Viewport) -> Self {
        Self {
            start_client: client,
            start_scroll: viewport.scroll(),
        }
    }

    pub fn scroll_for(&self, client: Point) -> Point {
        self.start_scroll - (client - self.start_client)
    }
}
