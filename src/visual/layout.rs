//! Seeded force-directed node placement.
//!
//! Fruchterman–Reingold with repulsion only: the flow graph changes every
//! frame, so nodes are placed once from the node set alone and stay put.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

// ---

const ITERATIONS: usize = 50;

/// Position in layout space, within `[-1, 1]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Stable position of every node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    positions: BTreeMap<String, Point>,
}

impl Layout {
    // ---
    pub fn position(&self, node: &str) -> Option<Point> {
        self.positions.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.positions.iter().map(|(k, p)| (k.as_str(), *p))
    }
}

/// Place `nodes` with a deterministic spring layout seeded by `seed`.
pub fn spring_layout(nodes: &[String], seed: u64) -> Layout {
    // ---
    let n = nodes.len();
    if n == 0 {
        return Layout::default();
    }
    if n == 1 {
        let positions = BTreeMap::from([(nodes[0].clone(), Point { x: 0.0, y: 0.0 })]);
        return Layout { positions };
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect();

    // Optimal distance between nodes
    let k = (1.0 / n as f64).sqrt();
    let mut temperature = span(&pos) * 0.1;
    let cooling = temperature / (ITERATIONS as f64 + 1.0);

    for _ in 0..ITERATIONS {
        let mut displacement = vec![[0.0_f64; 2]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let distance_sq = (dx * dx + dy * dy).max(1e-4);
                let force = k * k / distance_sq;
                displacement[i][0] += dx * force;
                displacement[i][1] += dy * force;
            }
        }

        for (p, d) in pos.iter_mut().zip(&displacement) {
            let length = (d[0] * d[0] + d[1] * d[1]).sqrt().max(0.01);
            p[0] += d[0] * temperature / length;
            p[1] += d[1] * temperature / length;
        }
        temperature -= cooling;
    }

    rescale(&mut pos);

    let positions = nodes
        .iter()
        .cloned()
        .zip(pos.into_iter().map(|[x, y]| Point { x, y }))
        .collect();
    Layout { positions }
}

fn span(pos: &[[f64; 2]]) -> f64 {
    // ---
    let mut widest: f64 = 0.0;
    for axis in 0..2 {
        let (lo, hi) = pos.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
            (lo.min(p[axis]), hi.max(p[axis]))
        });
        widest = widest.max(hi - lo);
    }
    widest
}

/// Centre on the mean and scale so the largest coordinate is 1.
fn rescale(pos: &mut [[f64; 2]]) {
    // ---
    let n = pos.len() as f64;
    for axis in 0..2 {
        let mean = pos.iter().map(|p| p[axis]).sum::<f64>() / n;
        for p in pos.iter_mut() {
            p[axis] -= mean;
        }
    }

    let extent = pos
        .iter()
        .flat_map(|p| [p[0].abs(), p[1].abs()])
        .fold(0.0_f64, f64::max);
    if extent > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= extent;
            p[1] /= extent;
        }
    }
}
