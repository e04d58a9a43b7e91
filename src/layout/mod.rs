//! Node placement for discovered topologies.
//!
//! A layout run is a ring-based initial placement around the best connected device
//! ([`initial_layout`]) followed by a fixed number of force relaxation passes
//! ([`relax`]). [`resolve_layout`] decides whether a persisted layout can be used
//! as-is instead.

mod leveling;
mod reconcile;
mod relax;

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

pub use leveling::{LayoutSeed, initial_layout, ring_levels, select_hub};
pub use reconcile::{compute_layout, resolve_layout};
pub use relax::{ATTRACTION_FORCE, ITERATIONS, relax};

/// Authoritative node-id to model-space coordinate mapping.
pub type PositionMap = BTreeMap<String, Point>;

/// Model-space coordinate (card centre).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Canvas and card geometry shared by every producer of positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasParams {
    pub width: f64,
    pub height: f64,
    pub card_width: f64,
    pub card_height: f64,
    pub margin: f64,
}

impl Default for CanvasParams {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1000.0,
            card_width: 180.0,
            card_height: 130.0,
            margin: 40.0,
        }
    }
}

impl CanvasParams {
    /// Two card footprints plus both interface labels of a link fit in this distance.
    pub fn min_spacing(&self) -> f64 {
        self.card_width.max(self.card_height) + 120.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn x_bounds(&self) -> (f64, f64) {
        let inset = self.margin + self.card_width / 2.0;
        (inset, self.width - inset)
    }

    pub fn y_bounds(&self) -> (f64, f64) {
        let inset = self.margin + self.card_height / 2.0;
        (inset, self.height - inset)
    }

    /// Clamps a card centre into the canvas minus margin and half the card.
    ///
    /// On an axis too small to hold a card the coordinate collapses onto the
    /// axis midpoint.
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            clamp_axis(point.x, self.x_bounds()),
            clamp_axis(point.y, self.y_bounds()),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        let (min_x, max_x) = self.x_bounds();
        let (min_y, max_y) = self.y_bounds();
        point.x >= min_x && point.x <= max_x && point.y >= min_y && point.y <= max_y
    }

    /// Returns `false` when an axis cannot hold a single card inside the margins.
    pub fn validate(&self) -> bool {
        let (min_x, max_x) = self.x_bounds();
        let (min_y, max_y) = self.y_bounds();
        let valid = min_x <= max_x && min_y <= max_y;
        if !valid {
            log::warn!(
                "canvas {}x{} is too small for {}x{} cards with margin {}; positions collapse to the centre line",
                self.width,
                self.height,
                self.card_width,
                self.card_height,
                self.margin
            );
        }
        valid
    }
}

const LABEL_NORMAL_OFFSET: f64 = 14.0;

/// Anchors for the source and target interface labels of a link, set off to opposite
/// sides of the line so neither sits under a card.
pub fn interface_label_anchors(source: Point, target: Point) -> (Point, Point) {
    let delta = target - source;
    let length = delta.length().max(1.0);
    let normal = Point::new(-delta.y / length, delta.x / length) * LABEL_NORMAL_OFFSET;

    (
        source + delta * 0.35 + normal,
        source + delta * 0.65 - normal,
    )
}

fn clamp_axis(value: f64, (min, max): (f64, f64)) -> f64 {
    if min > max {
        return (min + max) / 2.0;
    }
    if value.is_nan() {
        return (min + max) / 2.0;
    }
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_spacing_uses_larger_card_side() {
        let params = CanvasParams::default();
        assert_eq!(params.min_spacing(), 300.0);

        let tall = CanvasParams {
            card_height: 240.0,
            ..params
        };
        assert_eq!(tall.min_spacing(), 360.0);
    }

    #[test]
    fn clamp_keeps_cards_inside_margins() {
        let params = CanvasParams::default();
        let clamped = params.clamp(Point::new(-500.0, 5000.0));
        assert_eq!(clamped, Point::new(130.0, 1000.0 - 40.0 - 65.0));
        assert!(params.contains(clamped));
    }

    #[test]
    fn label_anchors_sit_on_opposite_sides() {
        let (source_label, target_label) =
            interface_label_anchors(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert_eq!(source_label, Point::new(35.0, 14.0));
        assert_eq!(target_label, Point::new(65.0, -14.0));

        let (same, _) = interface_label_anchors(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert_eq!(same, Point::new(5.0, 5.0));
    }

    #[test]
    fn clamp_collapses_degenerate_axis() {
        let params = CanvasParams {
            width: 100.0,
            ..CanvasParams::default()
        };
        assert!(!params.validate());
        assert_eq!(params.clamp(Point::new(3.0, 500.0)).x, 50.0);
    }
}
