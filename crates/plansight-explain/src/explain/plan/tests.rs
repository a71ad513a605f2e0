//! Tests for the plan graph model

use super::*;
use pretty_assertions::assert_eq;

fn sample_graph() -> PlanGraph {
    let mut builder = GraphBuilder::default();

    let root = builder.allocate_id();
    builder.emit(PlanNode::new(&root, "Hash Join").with_cost(120.0), None);

    let scan = builder.allocate_id();
    let mut seq = PlanNode::new(&scan, "Seq Scan").with_label("orders").with_cost(80.0);
    seq.is_full_scan = true;
    builder.emit(seq, Some(&root));

    let hash = builder.allocate_id();
    builder.emit(PlanNode::new(&hash, "Hash").with_cost(20.0), Some(&root));

    builder.finish()
}

#[test]
fn test_builder_assigns_sequential_ids() {
    let graph = sample_graph();
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["node-0", "node-1", "node-2"]);
}

#[test]
fn test_edges_point_from_child_to_parent() {
    let graph = sample_graph();
    assert_eq!(
        graph.edges[0],
        PlanEdge {
            id: "e-node-0-node-1".to_string(),
            source_node_id: "node-1".to_string(),
            target_node_id: "node-0".to_string(),
        }
    );
    let children: Vec<&str> = graph
        .children_of("node-0")
        .map(|n| n.operation_type.as_str())
        .collect();
    assert_eq!(children, vec!["Seq Scan", "Hash"]);
}

#[test]
fn test_root_and_max_cost() {
    let graph = sample_graph();
    assert_eq!(graph.root().map(|n| n.id.as_str()), Some("node-0"));
    assert_eq!(graph.max_cost(), 120.0);
    assert_eq!(PlanGraph::default().max_cost(), 0.0);
    assert!(PlanGraph::default().root().is_none());
}

#[test]
fn test_summary_counts() {
    let summary = sample_graph().summary();
    assert_eq!(summary.node_count, 3);
    assert_eq!(summary.edge_count, 2);
    assert_eq!(summary.full_scans, 1);
    assert_eq!(summary.index_scans, 0);
    assert_eq!(summary.root_id.as_deref(), Some("node-0"));
}

#[test]
fn test_categories() {
    let category = |op: &str| PlanNode::new("n", op).category();
    assert_eq!(category("Seq Scan"), OperationCategory::Scan);
    assert_eq!(category("Access: ALL"), OperationCategory::Scan);
    assert_eq!(category("Hash Join"), OperationCategory::Join);
    assert_eq!(category("Nested Loop"), OperationCategory::Join);
    assert_eq!(category("Incremental Sort"), OperationCategory::Sort);
    assert_eq!(category("Order By"), OperationCategory::Sort);
    assert_eq!(category("Limit"), OperationCategory::Other);
}

#[test]
fn test_severity_order() {
    assert!(Severity::Low < Severity::Medium);
    assert!(Severity::Medium < Severity::High);
}

#[test]
fn test_node_serializes_in_camel_case() {
    let node = PlanNode::new("node-0", "Seq Scan").with_label("users").with_rows(10);
    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json["operationType"], "Seq Scan");
    assert_eq!(json["estimatedRows"], 10);
    assert_eq!(json["isFullScan"], false);
    assert!(json.get("actualRows").is_none());
    assert!(json.get("details").is_none());
}
