//! Cycle removal, rank assignment and long-edge normalization
//!
//! Produces a [`LayeredGraph`] in which every edge joins two adjacent ranks.
//! Real nodes keep their [`LayoutGraph`] index; virtual nodes are appended
//! after them.

use crate::graph::{Direction, LayoutGraph};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A node of the layered graph
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LayerNode {
    pub rank: usize,
    /// Extent along the rank (x for vertical layouts)
    pub breadth: f64,
    /// Extent across ranks (y for vertical layouts)
    pub depth: f64,
    pub is_virtual: bool,
}

/// Path taken by one input edge through the layered graph
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EdgeChain {
    /// Index of the edge in the input graph
    pub edge: usize,
    /// Nodes from the upper rank to the lower rank, endpoints included
    pub path: Vec<usize>,
    /// True if the edge was turned around to break a cycle
    pub reversed: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LayeredGraph {
    pub nodes: Vec<LayerNode>,
    pub succ: Vec<Vec<usize>>,
    pub pred: Vec<Vec<usize>>,
    pub chains: Vec<EdgeChain>,
    pub rank_count: usize,
}

impl LayeredGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn push_node(&mut self, node: LayerNode) -> usize {
        self.nodes.push(node);
        self.succ.push(Vec::new());
        self.pred.push(Vec::new());
        self.nodes.len() - 1
    }

    fn link(&mut self, upper: usize, lower: usize) {
        self.succ[upper].push(lower);
        self.pred[lower].push(upper);
    }
}

/// Builds the layered graph for `graph`
pub(crate) fn build(graph: &LayoutGraph, direction: Direction) -> LayeredGraph {
    let n = graph.node_count();
    let reversed = feedback_edges(n, graph.edges());

    let oriented: Vec<(usize, usize)> = graph
        .edges()
        .iter()
        .zip(&reversed)
        .map(|(&(a, b), &rev)| if rev { (b, a) } else { (a, b) })
        .collect();

    let ranks = longest_path_ranks(n, &oriented);

    let mut layered = LayeredGraph::default();
    for (index, &rank) in ranks.iter().enumerate() {
        let size = graph.size(index);
        let (breadth, depth) = if direction.is_horizontal() {
            (size.height, size.width)
        } else {
            (size.width, size.height)
        };
        layered.push_node(LayerNode {
            rank,
            breadth,
            depth,
            is_virtual: false,
        });
    }
    layered.rank_count = ranks.iter().max().map_or(0, |r| r + 1);

    for (edge, (&(upper, lower), &rev)) in oriented.iter().zip(&reversed).enumerate() {
        let mut path = vec![upper];
        let mut prev = upper;
        for rank in ranks[upper] + 1..ranks[lower] {
            let dummy = layered.push_node(LayerNode {
                rank,
                breadth: 0.0,
                depth: 0.0,
                is_virtual: true,
            });
            layered.link(prev, dummy);
            path.push(dummy);
            prev = dummy;
        }
        layered.link(prev, lower);
        path.push(lower);
        layered.chains.push(EdgeChain {
            edge,
            path,
            reversed: rev,
        });
    }

    tracing::debug!(
        nodes = n,
        virtual_nodes = layered.len() - n,
        ranks = layered.rank_count,
        "ranked layout graph"
    );

    layered
}

/// Marks the edges that close a cycle during a depth-first search.
///
/// The search starts from nodes in index order and follows edges in input
/// order, so the chosen feedback set is stable for a given graph.
pub(crate) fn feedback_edges(node_count: usize, edges: &[(usize, usize)]) -> Vec<bool> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnStack,
        Done,
    }

    let mut out: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for (i, &(a, _)) in edges.iter().enumerate() {
        out[a].push(i);
    }

    let mut reversed = vec![false; edges.len()];
    let mut marks = vec![Mark::Unvisited; node_count];

    for start in 0..node_count {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        // (node, position of the next outgoing edge to explore)
        let mut stack = vec![(start, 0usize)];
        marks[start] = Mark::OnStack;

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let Some(&edge) = out[node].get(next) else {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            let target = edges[edge].1;
            match marks[target] {
                Mark::OnStack => reversed[edge] = true,
                Mark::Unvisited => {
                    marks[target] = Mark::OnStack;
                    stack.push((target, 0));
                }
                Mark::Done => {}
            }
        }
    }

    reversed
}

/// Assigns each node the length of the longest path reaching it from a root.
///
/// `edges` must be acyclic. Ready nodes are taken in index order.
pub(crate) fn longest_path_ranks(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut in_degree = vec![0usize; node_count];
    for &(a, b) in edges {
        out[a].push(b);
        in_degree[b] += 1;
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..node_count)
        .filter(|&v| in_degree[v] == 0)
        .map(Reverse)
        .collect();
    let mut ranks = vec![0usize; node_count];

    while let Some(Reverse(v)) = ready.pop() {
        for &w in &out[v] {
            ranks[w] = ranks[w].max(ranks[v] + 1);
            in_degree[w] -= 1;
            if in_degree[w] == 0 {
                ready.push(Reverse(w));
            }
        }
    }

    ranks
}
