//! Coordinate assignment
//!
//! Works in "layer space": `breadth` runs along a rank, `depth` across ranks.
//! [`orient`] maps the result onto x/y for the requested [`Direction`].

use crate::graph::{Direction, EdgeRoute, Layout, LayoutConfig, LayoutGraph, NodePosition, Point};
use crate::rank::LayeredGraph;

/// Alternating placement sweeps; odd so the last one runs upward
const PLACEMENT_SWEEPS: usize = 9;

/// Centre of every layered node as (breadth, depth)
pub(crate) fn assign(
    graph: &LayeredGraph,
    layers: &[Vec<usize>],
    config: &LayoutConfig,
) -> Vec<(f64, f64)> {
    let depth = rank_depths(graph, layers, config.rank_sep);
    let mut breadth = vec![0.0; graph.len()];

    for layer in layers {
        let seps = separations(graph, layer, config);
        let mut x = 0.0;
        for (i, &v) in layer.iter().enumerate() {
            if i > 0 {
                x += seps[i];
            }
            breadth[v] = x;
        }
        // Centre each rank on the axis
        let shift = x / 2.0;
        for &v in layer {
            breadth[v] -= shift;
        }
    }

    for sweep in 0..PLACEMENT_SWEEPS {
        if sweep % 2 == 0 {
            for rank in 1..layers.len() {
                align_rank(graph, &layers[rank], &graph.pred, &mut breadth, config);
            }
        } else {
            for rank in (0..layers.len().saturating_sub(1)).rev() {
                align_rank(graph, &layers[rank], &graph.succ, &mut breadth, config);
            }
        }
    }

    (0..graph.len())
        .map(|v| (breadth[v], depth[graph.nodes[v].rank]))
        .collect()
}

/// Depth of each rank's centre line. A rank is as thick as its thickest node.
fn rank_depths(graph: &LayeredGraph, layers: &[Vec<usize>], rank_sep: f64) -> Vec<f64> {
    let mut centres = Vec::with_capacity(layers.len());
    let mut offset = 0.0;
    for layer in layers {
        let thickness = layer
            .iter()
            .map(|&v| graph.nodes[v].depth)
            .fold(0.0, f64::max);
        centres.push(offset + thickness / 2.0);
        offset += thickness + rank_sep;
    }
    centres
}

/// Minimum centre distance between each node and its left neighbour (0 for the first)
fn separations(graph: &LayeredGraph, layer: &[usize], config: &LayoutConfig) -> Vec<f64> {
    let half_gap = |v: usize| {
        if graph.nodes[v].is_virtual {
            config.edge_sep / 2.0
        } else {
            config.node_sep / 2.0
        }
    };

    let mut seps = vec![0.0; layer.len()];
    for i in 1..layer.len() {
        let (a, b) = (layer[i - 1], layer[i]);
        seps[i] = (graph.nodes[a].breadth + graph.nodes[b].breadth) / 2.0 + half_gap(a) + half_gap(b);
    }
    seps
}

/// Moves each node of `layer` toward the mean of its neighbours, keeping the
/// rank's order and separations.
fn align_rank(
    graph: &LayeredGraph,
    layer: &[usize],
    neighbours: &[Vec<usize>],
    breadth: &mut [f64],
    config: &LayoutConfig,
) {
    if layer.is_empty() {
        return;
    }

    let desired: Vec<f64> = layer
        .iter()
        .map(|&v| {
            let adjacent = &neighbours[v];
            if adjacent.is_empty() {
                breadth[v]
            } else {
                adjacent.iter().map(|&u| breadth[u]).sum::<f64>() / adjacent.len() as f64
            }
        })
        .collect();

    let placed = place_in_order(&desired, &separations(graph, layer, config));
    for (&v, x) in layer.iter().zip(placed) {
        breadth[v] = x;
    }
}

/// Least-squares placement of ordered boxes.
///
/// Minimizes `Σ (x[i] - desired[i])²` subject to `x[i] - x[i-1] >= seps[i]`.
/// Substituting `y[i] = x[i] - S[i]` (S the running sum of separations) turns
/// the constraints into `y` being non-decreasing, which pool-adjacent-violators
/// solves exactly.
pub(crate) fn place_in_order(desired: &[f64], seps: &[f64]) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(desired.len());
    let mut running = 0.0;
    for (i, _) in desired.iter().enumerate() {
        if i > 0 {
            running += seps[i];
        }
        offsets.push(running);
    }

    // Blocks of (sum of targets, count)
    let mut blocks: Vec<(f64, usize)> = Vec::with_capacity(desired.len());
    for (d, s) in desired.iter().zip(&offsets) {
        blocks.push((d - s, 1));
        while blocks.len() > 1 {
            let (sum_b, n_b) = blocks[blocks.len() - 1];
            let (sum_a, n_a) = blocks[blocks.len() - 2];
            if sum_a / n_a as f64 <= sum_b / n_b as f64 {
                break;
            }
            blocks.pop();
            let last = blocks.len() - 1;
            blocks[last] = (sum_a + sum_b, n_a + n_b);
        }
    }

    let mut placed = Vec::with_capacity(desired.len());
    for (sum, count) in blocks {
        let level = sum / count as f64;
        for _ in 0..count {
            let s = offsets[placed.len()];
            placed.push(level + s);
        }
    }
    placed
}

/// Maps layer-space centres onto the final drawing.
///
/// Horizontal directions swap axes, mirrored directions flip the rank axis,
/// and the drawing is translated so its bounding box starts at the origin.
pub(crate) fn orient(
    input: &LayoutGraph,
    graph: &LayeredGraph,
    centres: &[(f64, f64)],
    direction: Direction,
) -> Layout {
    let to_xy = |(b, d): (f64, f64)| {
        let d = if direction.is_mirrored() { -d } else { d };
        if direction.is_horizontal() {
            Point::new(d, b)
        } else {
            Point::new(b, d)
        }
    };

    let real = input.node_count();
    let points: Vec<Point> = centres.iter().map(|&c| to_xy(c)).collect();

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    for (v, p) in points.iter().enumerate() {
        let (w, h) = if v < real {
            let size = input.size(v);
            (size.width, size.height)
        } else {
            (0.0, 0.0)
        };
        min_x = min_x.min(p.x - w / 2.0);
        min_y = min_y.min(p.y - h / 2.0);
    }
    if !min_x.is_finite() || !min_y.is_finite() {
        return Layout::default();
    }
    let shift = |p: Point| Point::new(p.x - min_x, p.y - min_y);

    let nodes: Vec<NodePosition> = (0..real)
        .map(|v| {
            let size = input.size(v);
            NodePosition::from_center(input.id(v), shift(points[v]), size.width, size.height)
        })
        .collect();

    let edges = graph
        .chains
        .iter()
        .map(|chain| {
            let (from, to) = input.edges()[chain.edge];
            let inner = &chain.path[1..chain.path.len() - 1];
            let mut bends: Vec<Point> = inner.iter().map(|&v| shift(points[v])).collect();
            if chain.reversed {
                bends.reverse();
            }
            EdgeRoute {
                from: input.id(from).to_string(),
                to: input.id(to).to_string(),
                points: bends,
            }
        })
        .collect();

    let width = nodes
        .iter()
        .map(|n| n.position.x + n.width)
        .fold(0.0, f64::max);
    let height = nodes
        .iter()
        .map(|n| n.position.y + n.height)
        .fold(0.0, f64::max);

    Layout {
        nodes,
        edges,
        width,
        height,
    }
}
