use std::f64::consts::TAU;

use crate::topology::TopologyGraph;

use super::{CanvasParams, Point, PositionMap};

/// Fixed pass count; the loop never checks for convergence.
pub const ITERATIONS: usize = 50;
pub const ATTRACTION_FORCE: f64 = 0.1;

/// Unit vector for a pair sitting on the same spot, distinct per pair.
fn coincident_direction(first: usize, second: usize) -> Point {
    let angle = ((first as f64) * 0.618_034 + (second as f64) * 0.414_214 + 0.11) * TAU;
    Point::new(angle.cos(), angle.sin())
}

/// Runs [`ITERATIONS`] passes of pairwise repulsion and link attraction over a copy
/// of `positions`.
///
/// Only nodes of `graph` that already have a position take part; other entries of
/// `positions` are carried over untouched. Every pass ends by clamping each node
/// back into the canvas.
pub fn relax(graph: &TopologyGraph, positions: &PositionMap, params: &CanvasParams) -> PositionMap {
    let mut relaxed = positions.clone();

    let mut slot_of = vec![None; graph.len()];
    let mut ids = Vec::with_capacity(graph.len());
    let mut points = Vec::with_capacity(graph.len());
    for (index, node) in graph.nodes().iter().enumerate() {
        if let Some(point) = positions.get(&node.id) {
            slot_of[index] = Some(points.len());
            ids.push(node.id.as_str());
            points.push(*point);
        }
    }

    let n = points.len();
    if n == 0 {
        return relaxed;
    }

    let min_spacing = params.min_spacing();
    let repulsion_force = min_spacing * 2.0;
    let attraction_threshold = min_spacing * 1.5;
    let iterations = ITERATIONS as f64;
    let mut forces = vec![Point::ZERO; n];

    for _ in 0..ITERATIONS {
        forces.fill(Point::ZERO);

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = points[i] - points[j];
                let raw_distance = delta.length();
                if raw_distance >= min_spacing {
                    continue;
                }

                let distance = raw_distance.max(1.0);
                let direction = if raw_distance > 1e-9 {
                    delta * (1.0 / raw_distance)
                } else {
                    coincident_direction(i, j)
                };
                let push = repulsion_force * (min_spacing - distance) / distance / iterations;

                forces[i] += direction * push;
                forces[j] -= direction * push;
            }
        }

        for &(source, target) in graph.link_endpoints() {
            let (Some(from), Some(to)) = (slot_of[source], slot_of[target]) else {
                continue;
            };
            if from == to {
                continue;
            }

            let delta = points[to] - points[from];
            let distance = delta.length();
            if distance <= attraction_threshold {
                continue;
            }

            let direction = delta * (1.0 / distance);
            let pull = ATTRACTION_FORCE * (distance - min_spacing) / iterations;

            forces[from] += direction * pull;
            forces[to] -= direction * pull;
        }

        for (point, force) in points.iter_mut().zip(&forces) {
            *point = params.clamp(*point + *force);
        }
    }

    for (id, point) in ids.into_iter().zip(points) {
        relaxed.insert(id.to_owned(), point);
    }
    relaxed
}
