//! Tests for the MySQL EXPLAIN parser

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// Table access
// ============================================================================

mod table_access {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_block_produces_no_node() {
        let plan = json!({
            "query_block": {
                "select_id": 1,
                "cost_info": {"query_cost": "1.00"},
                "table": {
                    "table_name": "users",
                    "access_type": "ALL",
                    "rows_examined_per_scan": 100,
                    "cost_info": {"read_cost": "0.5", "eval_cost": "0.1"}
                }
            }
        });

        let graph = parse_mysql_plan(&plan);

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        let node = &graph.nodes[0];
        assert_eq!(node.label, "users");
        assert!(node.is_full_scan);
        assert!(!node.is_index_scan);
        assert_eq!(node.operation_type, "Access: ALL");
        assert_eq!(node.estimated_rows, 100);
        assert!((node.estimated_cost - 0.6).abs() < 1e-9);
        assert_eq!(graph.reported_cost, Some(1.0));
    }

    #[test]
    fn test_index_access_types() {
        let flags = |access: &str| {
            let graph = parse_mysql_plan(&json!({
                "query_block": {"table": {"table_name": "t", "access_type": access}}
            }));
            (graph.nodes[0].is_full_scan, graph.nodes[0].is_index_scan)
        };

        for access in ["ref", "eq_ref", "const", "range", "index"] {
            assert_eq!(flags(access), (false, true), "access type {access}");
        }
        assert_eq!(flags("ALL"), (true, false));
        assert_eq!(flags("system"), (false, false));
        assert_eq!(flags("fulltext"), (false, false));
    }

    #[test]
    fn test_access_type_is_upper_cased() {
        let graph = parse_mysql_plan(&json!({
            "query_block": {"table": {"table_name": "orders", "access_type": "eq_ref", "key": "PRIMARY"}}
        }));
        assert_eq!(graph.nodes[0].operation_type, "Access: EQ_REF");
        assert_eq!(graph.nodes[0].details["key"], json!("PRIMARY"));
    }

    #[test]
    fn test_missing_fields_default() {
        let graph = parse_mysql_plan(&json!({"query_block": {"table": {}}}));
        let node = &graph.nodes[0];
        assert_eq!(node.operation_type, "Table Access");
        assert_eq!(node.label, "");
        assert_eq!(node.estimated_cost, 0.0);
        assert_eq!(node.estimated_rows, 0);
        assert!(!node.is_full_scan);
        assert_eq!(graph.reported_cost, None);
    }

    #[test]
    fn test_unparseable_costs_default_to_zero() {
        let graph = parse_mysql_plan(&json!({
            "query_block": {"table": {
                "table_name": "t",
                "cost_info": {"read_cost": "fast", "eval_cost": "2.50"}
            }}
        }));
        assert_eq!(graph.nodes[0].estimated_cost, 2.5);
    }
}

// ============================================================================
// Composite operators
// ============================================================================

mod composites {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_loop_join() {
        let plan = json!({
            "query_block": {
                "select_id": 1,
                "nested_loop": [
                    {"table": {"table_name": "o", "access_type": "ALL", "rows_examined_per_scan": 1000}},
                    {"table": {"table_name": "c", "access_type": "eq_ref", "key": "PRIMARY", "rows_examined_per_scan": 1}}
                ]
            }
        });

        let graph = parse_mysql_plan(&plan);

        let ops: Vec<&str> = graph.nodes.iter().map(|n| n.operation_type.as_str()).collect();
        assert_eq!(ops, vec!["Nested Loop Join", "Access: ALL", "Access: EQ_REF"]);
        assert_eq!(graph.nodes[0].estimated_cost, 0.0);
        assert_eq!(graph.edges.len(), 2);
        assert!(graph.edges.iter().all(|e| e.target_node_id == "node-0"));
        assert_eq!(graph.edges[1].source_node_id, "node-2");
    }

    #[test]
    fn test_ordering_over_grouping_over_join() {
        let plan = json!({
            "query_block": {
                "select_id": 1,
                "ordering_operation": {
                    "using_filesort": true,
                    "grouping_operation": {
                        "using_temporary_table": true,
                        "using_filesort": false,
                        "nested_loop": [
                            {"table": {"table_name": "a", "access_type": "index"}},
                            {"table": {"table_name": "b", "access_type": "ref"}}
                        ]
                    }
                }
            }
        });

        let graph = parse_mysql_plan(&plan);

        let ops: Vec<&str> = graph.nodes.iter().map(|n| n.operation_type.as_str()).collect();
        assert_eq!(
            ops,
            vec!["Order By", "Group By", "Nested Loop Join", "Access: INDEX", "Access: REF"]
        );
        assert_eq!(graph.nodes[0].label, "Using filesort");
        assert_eq!(graph.nodes[1].label, "Using temporary");

        let pairs: Vec<(&str, &str)> = graph
            .edges
            .iter()
            .map(|e| (e.source_node_id.as_str(), e.target_node_id.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("node-1", "node-0"),
                ("node-2", "node-1"),
                ("node-3", "node-2"),
                ("node-4", "node-2"),
            ]
        );
    }

    #[test]
    fn test_duplicates_removal() {
        let graph = parse_mysql_plan(&json!({
            "query_block": {
                "duplicates_removal": {
                    "using_temporary_table": true,
                    "table": {"table_name": "t", "access_type": "ALL"}
                }
            }
        }));
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].operation_type, "Distinct");
        assert_eq!(graph.edges[0].target_node_id, "node-0");
    }

    #[test]
    fn test_union_result() {
        let plan = json!({
            "query_block": {
                "union_result": {
                    "using_temporary_table": false,
                    "table_name": "<union1,2>",
                    "access_type": "ALL",
                    "query_specifications": [
                        {"dependent": false, "query_block": {"select_id": 1, "table": {"table_name": "a", "access_type": "ALL"}}},
                        {"dependent": false, "query_block": {"select_id": 2, "table": {"table_name": "b", "access_type": "ALL"}}}
                    ]
                }
            }
        });

        let graph = parse_mysql_plan(&plan);

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.nodes[0].operation_type, "Union");
        assert_eq!(graph.nodes[0].label, "<union1,2>");
        assert!(!graph.nodes[0].details.contains_key("query_specifications"));
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn test_derived_table_feeds_its_access() {
        let plan = json!({
            "query_block": {
                "table": {
                    "table_name": "recent",
                    "access_type": "ALL",
                    "materialized_from_subquery": {
                        "using_temporary_table": true,
                        "query_block": {"table": {"table_name": "orders", "access_type": "range"}}
                    }
                }
            }
        });

        let graph = parse_mysql_plan(&plan);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[1].label, "orders");
        assert_eq!(graph.edges[0].source_node_id, "node-1");
        assert_eq!(graph.edges[0].target_node_id, "node-0");
        assert!(!graph.nodes[0].details.contains_key("materialized_from_subquery"));
    }
}

// ============================================================================
// Degraded input
// ============================================================================

mod degraded {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unrecognized_top_level_is_empty() {
        assert!(parse_mysql_plan(&json!({"plan": {"table": "x"}})).is_empty());
        assert!(parse_mysql_plan(&json!({"query_block": {"select_id": 1}})).is_empty());
        assert!(parse_mysql_plan(&json!([1, 2, 3])).is_empty());
        assert!(parse_mysql_plan(&json!("EXPLAIN")).is_empty());
    }

    #[test]
    fn test_grouping_sets_list_keeps_operator_only() {
        let graph = parse_mysql_plan(&json!({
            "query_block": {
                "grouping_operation": [
                    {"table": {"table_name": "a"}},
                    {"table": {"table_name": "b"}}
                ]
            }
        }));
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].operation_type, "Group By");
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_several_operators_on_one_level_keep_first() {
        let graph = parse_mysql_plan(&json!({
            "query_block": {
                "nested_loop": [{"table": {"table_name": "a"}}],
                "table": {"table_name": "ignored"}
            }
        }));
        let labels: Vec<&str> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["", "a"]);
    }

    #[test]
    fn test_nested_loop_with_wrong_type_is_skipped() {
        let graph = parse_mysql_plan(&json!({"query_block": {"nested_loop": {"table": {}}}}));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_unknown_operand_inside_join_is_skipped() {
        let graph = parse_mysql_plan(&json!({
            "query_block": {
                "nested_loop": [
                    {"table": {"table_name": "a"}},
                    {"windowing": {}},
                    {"table": {"table_name": "b"}}
                ]
            }
        }));
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.nodes[2].id, "node-2");
        assert_eq!(graph.nodes[2].label, "b");
    }
}
