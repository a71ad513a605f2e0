//! In-rank ordering (crossing reduction)
//!
//! Starts from a depth-first discovery order and improves it with alternating
//! barycenter sweeps, keeping the best order seen.

use crate::rank::LayeredGraph;

/// Sweeps without improvement after which ordering stops
const PATIENCE: usize = 4;

/// Returns the nodes of every rank, left to right
pub(crate) fn order(graph: &LayeredGraph, sweeps: usize) -> Vec<Vec<usize>> {
    let mut layers = initial_order(graph);
    let mut best = layers.clone();
    let mut best_crossings = crossings(graph, &layers);
    let mut last_improvement = 0;

    for sweep in 0..sweeps {
        if best_crossings == 0 || sweep - last_improvement > PATIENCE {
            break;
        }

        if sweep % 2 == 0 {
            for rank in 1..layers.len() {
                reorder_rank(&mut layers, rank, rank - 1, &graph.pred);
            }
        } else {
            for rank in (0..layers.len().saturating_sub(1)).rev() {
                reorder_rank(&mut layers, rank, rank + 1, &graph.succ);
            }
        }

        let count = crossings(graph, &layers);
        if count < best_crossings {
            best_crossings = count;
            best = layers.clone();
            last_improvement = sweep;
        }
    }

    tracing::debug!(crossings = best_crossings, "ordered layout ranks");
    best
}

/// Places nodes in the order a depth-first search discovers them, starting
/// from the nodes of the first rank.
pub(crate) fn initial_order(graph: &LayeredGraph) -> Vec<Vec<usize>> {
    let mut layers = vec![Vec::new(); graph.rank_count];
    let mut visited = vec![false; graph.len()];

    let mut starts: Vec<usize> = (0..graph.len()).collect();
    starts.sort_by_key(|&v| graph.nodes[v].rank);

    for start in starts {
        if visited[start] {
            continue;
        }
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            layers[graph.nodes[v].rank].push(v);
            // Reverse so the first successor is discovered first
            for &w in graph.succ[v].iter().rev() {
                if !visited[w] {
                    stack.push(w);
                }
            }
        }
    }

    layers
}

/// Sorts one rank by the barycenter of its neighbours in `reference`.
///
/// Nodes with no neighbour there keep their slot.
fn reorder_rank(
    layers: &mut [Vec<usize>],
    rank: usize,
    reference: usize,
    neighbours: &[Vec<usize>],
) {
    let slot = slots(&layers[reference]);

    let mut sortable: Vec<(f64, usize, usize)> = Vec::new();
    let mut fixed: Vec<bool> = Vec::with_capacity(layers[rank].len());
    for (i, &v) in layers[rank].iter().enumerate() {
        let adjacent = &neighbours[v];
        if adjacent.is_empty() {
            fixed.push(true);
            continue;
        }
        let sum: usize = adjacent.iter().filter_map(|&u| slot.get(&u)).sum();
        let barycenter = sum as f64 / adjacent.len() as f64;
        sortable.push((barycenter, i, v));
        fixed.push(false);
    }

    sortable.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut sorted = sortable.into_iter().map(|(_, _, v)| v);
    let current = std::mem::take(&mut layers[rank]);
    layers[rank] = current
        .into_iter()
        .zip(fixed)
        .map(|(v, keep)| if keep { v } else { sorted.next().unwrap_or(v) })
        .collect();
}

fn slots(layer: &[usize]) -> std::collections::HashMap<usize, usize> {
    layer.iter().enumerate().map(|(i, &v)| (v, i)).collect()
}

/// Counts edge crossings between every pair of adjacent ranks
pub(crate) fn crossings(graph: &LayeredGraph, layers: &[Vec<usize>]) -> usize {
    layers
        .windows(2)
        .map(|pair| {
            let lower = slots(&pair[1]);
            let mut segments: Vec<(usize, usize)> = Vec::new();
            for (i, &u) in pair[0].iter().enumerate() {
                for w in &graph.succ[u] {
                    if let Some(&j) = lower.get(w) {
                        segments.push((i, j));
                    }
                }
            }

            let mut count = 0;
            for (k, &(a1, b1)) in segments.iter().enumerate() {
                for &(a2, b2) in &segments[k + 1..] {
                    if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                        count += 1;
                    }
                }
            }
            count
        })
        .sum()
}
