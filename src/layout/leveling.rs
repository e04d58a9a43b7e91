use std::f64::consts::{FRAC_PI_2, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::topology::TopologyGraph;

use super::{CanvasParams, Point, PositionMap};

const RING_SPACING_FACTOR: f64 = 1.2;

/// Source of the per-ring angular offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutSeed {
    /// Fresh entropy on every run; repeated layouts of one graph differ slightly.
    #[default]
    Random,
    Fixed(u64),
}

impl LayoutSeed {
    pub fn from_option(seed: Option<u64>) -> Self {
        seed.map_or(Self::Random, Self::Fixed)
    }

    fn rng(self) -> StdRng {
        match self {
            Self::Random => StdRng::from_entropy(),
            Self::Fixed(seed) => StdRng::seed_from_u64(seed),
        }
    }
}

/// The first node with the largest number of distinct neighbours.
pub fn select_hub(graph: &TopologyGraph) -> Option<usize> {
    let mut hub = None;
    let mut best_degree = 0;
    for index in 0..graph.len() {
        let degree = graph.degree(index);
        if hub.is_none() || degree > best_degree {
            hub = Some(index);
            best_degree = degree;
        }
    }
    hub
}

/// Groups every node by breadth-first hop distance from `hub`.
///
/// When a ring comes up empty while nodes remain, every node the hub cannot reach joins
/// it in input order, so isolated devices share one ring instead of stacking outward.
pub fn ring_levels(graph: &TopologyGraph, hub: usize) -> Vec<Vec<usize>> {
    let node_count = graph.len();
    if hub >= node_count {
        return Vec::new();
    }

    let mut visited = vec![false; node_count];
    visited[hub] = true;
    let mut placed = 1;
    let mut levels = vec![vec![hub]];

    while placed < node_count {
        let mut next = Vec::new();
        for &index in &levels[levels.len() - 1] {
            for &neighbor in graph.neighbors(index) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    next.push(neighbor);
                }
            }
        }

        if next.is_empty() {
            for (index, seen) in visited.iter_mut().enumerate() {
                if !*seen {
                    *seen = true;
                    next.push(index);
                }
            }
            if next.is_empty() {
                break;
            }
        }

        placed += next.len();
        levels.push(next);
    }

    levels
}

/// Places the hub at the canvas centre and every further ring on a circle around it.
pub fn initial_layout(
    graph: &TopologyGraph,
    params: &CanvasParams,
    seed: LayoutSeed,
) -> PositionMap {
    let mut positions = PositionMap::new();
    let Some(hub) = select_hub(graph) else {
        return positions;
    };

    let levels = ring_levels(graph, hub);
    let center = params.center();
    let min_spacing = params.min_spacing();
    let mut rng = seed.rng();

    log::debug!(
        "ring layout around hub {} (degree {}): {} rings for {} nodes",
        graph.nodes()[hub].id,
        graph.degree(hub),
        levels.len(),
        graph.len()
    );

    for (ring, members) in levels.iter().enumerate() {
        if ring == 0 {
            for &index in members {
                positions.insert(graph.nodes()[index].id.clone(), params.clamp(center));
            }
            continue;
        }

        let radius = min_spacing * ring as f64 * RING_SPACING_FACTOR;
        let step = TAU / members.len() as f64;
        let offset = rng.gen_range(0.0..FRAC_PI_2);
        for (slot, &index) in members.iter().enumerate() {
            let angle = offset + slot as f64 * step;
            let point = center + Point::new(angle.cos(), angle.sin()) * radius;
            positions.insert(graph.nodes()[index].id.clone(), params.clamp(point));
        }
    }

    positions
}
