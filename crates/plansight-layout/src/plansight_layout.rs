//! Plansight Layout - layered graph drawing
//!
//! A deterministic Sugiyama-style layout for small directed graphs:
//! - Cycle removal by depth-first search
//! - Longest-path rank assignment with virtual nodes on long edges
//! - Barycenter crossing reduction
//! - Order-preserving least-squares coordinate assignment
//!
//! # Example
//!
//! ```
//! use plansight_layout::{layout, Direction, LayoutConfig, LayoutGraph};
//!
//! let mut graph = LayoutGraph::new();
//! graph.add_node("limit", 220.0, 100.0);
//! graph.add_node("scan", 220.0, 100.0);
//! graph.add_edge("limit", "scan");
//!
//! let result = layout(&graph, &LayoutConfig::default().with_direction(Direction::TopBottom));
//! let scan = result.node("scan").unwrap();
//! assert!(scan.position.y > result.node("limit").unwrap().position.y);
//! ```

pub mod graph;
mod order;
mod position;
mod rank;

pub use graph::{
    Direction, EdgeRoute, Layout, LayoutConfig, LayoutGraph, NodePosition, Point, Size,
};

/// Computes positions for every node of `graph`.
///
/// Never fails: an empty graph yields an empty layout, and the same input
/// always yields the same coordinates.
pub fn layout(graph: &LayoutGraph, config: &LayoutConfig) -> Layout {
    if graph.is_empty() {
        return Layout::default();
    }

    let config = &config.sanitized();
    let layered = rank::build(graph, config.direction);
    let layers = order::order(&layered, config.sweeps);
    let centres = position::assign(&layered, &layers, config);
    let result = position::orient(graph, &layered, &centres, config.direction);

    tracing::debug!(
        nodes = result.nodes.len(),
        edges = result.edges.len(),
        width = result.width,
        height = result.height,
        direction = config.direction.as_str(),
        "graph layout complete"
    );

    result
}

#[cfg(test)]
mod tests;
