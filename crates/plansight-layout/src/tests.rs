//! End-to-end layout tests

use super::*;
use pretty_assertions::assert_eq;

fn plan_tree() -> LayoutGraph {
    //        limit
    //          |
    //      hash join
    //      /       \
    //  seq scan    hash
    //                |
    //            index scan
    let mut graph = LayoutGraph::new();
    for id in ["limit", "join", "seq", "hash", "index"] {
        graph.add_node(id, 220.0, 100.0);
    }
    graph.add_edge("limit", "join");
    graph.add_edge("join", "seq");
    graph.add_edge("join", "hash");
    graph.add_edge("hash", "index");
    graph
}

fn overlaps(a: &NodePosition, b: &NodePosition) -> bool {
    a.position.x < b.position.x + b.width
        && b.position.x < a.position.x + a.width
        && a.position.y < b.position.y + b.height
        && b.position.y < a.position.y + a.height
}

#[test]
fn test_empty_graph() {
    let result = layout(&LayoutGraph::new(), &LayoutConfig::default());
    assert!(result.is_empty());
    assert_eq!((result.width, result.height), (0.0, 0.0));
}

#[test]
fn test_single_node_at_origin() {
    let mut graph = LayoutGraph::new();
    graph.add_node("only", 220.0, 100.0);
    let result = layout(&graph, &LayoutConfig::default());

    let only = result.node("only").unwrap();
    assert_eq!(only.position, Point::new(0.0, 0.0));
    assert_eq!(only.center, Point::new(110.0, 50.0));
}

#[test]
fn test_root_with_two_children() {
    let mut graph = LayoutGraph::new();
    graph.add_node("root", 220.0, 100.0);
    graph.add_node("left", 220.0, 100.0);
    graph.add_node("right", 220.0, 100.0);
    graph.add_edge("root", "left");
    graph.add_edge("root", "right");

    let result = layout(&graph, &LayoutConfig::default());

    assert_eq!(result.node("root").unwrap().position, Point::new(135.0, 0.0));
    assert_eq!(result.node("left").unwrap().position, Point::new(0.0, 150.0));
    assert_eq!(result.node("right").unwrap().position, Point::new(270.0, 150.0));
    assert_eq!((result.width, result.height), (490.0, 250.0));
}

#[test]
fn test_plan_tree_has_no_overlaps_and_ranks_descend() {
    let result = layout(&plan_tree(), &LayoutConfig::default());

    for (i, a) in result.nodes.iter().enumerate() {
        for b in &result.nodes[i + 1..] {
            assert!(!overlaps(a, b), "{} overlaps {}", a.id, b.id);
        }
    }

    let y = |id: &str| result.node(id).unwrap().position.y;
    assert!(y("limit") < y("join"));
    assert!(y("join") < y("seq"));
    assert_eq!(y("seq"), y("hash"));
    assert!(y("hash") < y("index"));
}

#[test]
fn test_anchor_is_center_minus_half_extent() {
    let result = layout(&plan_tree(), &LayoutConfig::default());
    for node in &result.nodes {
        assert_eq!(node.position.x, node.center.x - node.width / 2.0);
        assert_eq!(node.position.y, node.center.y - node.height / 2.0);
    }
}

#[test]
fn test_layout_is_deterministic() {
    let config = LayoutConfig::default();
    let first = layout(&plan_tree(), &config);
    for _ in 0..10 {
        assert_eq!(layout(&plan_tree(), &config), first);
    }
}

#[test]
fn test_long_edge_route_has_bends() {
    let mut graph = LayoutGraph::new();
    for id in ["a", "b", "c"] {
        graph.add_node(id, 100.0, 50.0);
    }
    graph.add_edge("a", "b");
    graph.add_edge("b", "c");
    graph.add_edge("a", "c");

    let result = layout(&graph, &LayoutConfig::default());
    let long = &result.edges[2];
    assert_eq!((long.from.as_str(), long.to.as_str()), ("a", "c"));
    assert_eq!(long.points.len(), 1);
    assert!(result.edges[0].points.is_empty());
}

#[test]
fn test_deadlock_cycle_still_lays_out() {
    let mut graph = LayoutGraph::new();
    for id in ["pid 10", "pid 11", "pid 12"] {
        graph.add_node(id, 240.0, 150.0);
    }
    graph.add_edge("pid 10", "pid 11");
    graph.add_edge("pid 11", "pid 12");
    graph.add_edge("pid 12", "pid 10");

    let result = layout(&graph, &LayoutConfig::default());
    assert_eq!(result.nodes.len(), 3);
    assert_eq!(result.edges.len(), 3);
    let back = &result.edges[2];
    assert_eq!((back.from.as_str(), back.to.as_str()), ("pid 12", "pid 10"));
    assert_eq!(back.points.len(), 1);
}

#[test]
fn test_left_right_er_diagram() {
    let mut graph = LayoutGraph::new();
    for id in ["users", "orders", "items"] {
        graph.add_node(id, 220.0, 200.0);
    }
    graph.add_edge("users", "orders");
    graph.add_edge("orders", "items");

    let config = LayoutConfig::default().with_direction(Direction::LeftRight);
    let result = layout(&graph, &config);

    let x = |id: &str| result.node(id).unwrap().position.x;
    assert_eq!(x("users"), 0.0);
    assert_eq!(x("orders"), 270.0);
    assert_eq!(x("items"), 540.0);
    assert_eq!(result.height, 200.0);
}

#[test]
fn test_negative_gaps_never_overlap_or_invert() {
    let mut graph = LayoutGraph::new();
    graph.add_node("root", 220.0, 100.0);
    graph.add_node("a", 220.0, 100.0);
    graph.add_node("b", 220.0, 100.0);
    graph.add_edge("root", "a");
    graph.add_edge("root", "b");

    let config = LayoutConfig {
        node_sep: -400.0,
        rank_sep: -300.0,
        ..LayoutConfig::default()
    };
    let result = layout(&graph, &config);

    let (root, a, b) = (
        result.node("root").unwrap(),
        result.node("a").unwrap(),
        result.node("b").unwrap(),
    );
    assert!(!overlaps(a, b), "siblings overlap");
    assert!(!overlaps(root, a) && !overlaps(root, b));
    assert!(root.position.y + root.height <= a.position.y);
    assert_eq!(a.position.y, b.position.y);
}
