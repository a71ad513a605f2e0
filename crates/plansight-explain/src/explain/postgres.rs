//! PostgreSQL EXPLAIN Parser
//!
//! Converts `EXPLAIN (FORMAT JSON)` output into a [`PlanGraph`]. The input is
//! either one object with a `Plan` key or an array of them (one per
//! statement); children nest under `Plans`.
//!
//! # Examples
//!
//! ```
//! use plansight_explain::explain::postgres::parse_postgres_plan;
//! use serde_json::json;
//!
//! let plan = json!([{
//!     "Plan": {
//!         "Node Type": "Seq Scan",
//!         "Relation Name": "users",
//!         "Total Cost": 10.0,
//!         "Plan Rows": 100
//!     }
//! }]);
//!
//! let graph = parse_postgres_plan(&plan);
//! assert_eq!(graph.nodes.len(), 1);
//! assert!(graph.nodes[0].is_full_scan);
//! ```

use crate::explain::coerce::{
    cost_or_default, details_from, optional_millis, optional_rows, rows_or_default, text,
};
use crate::explain::plan::{GraphBuilder, PlanGraph, PlanNode};
use serde_json::Value;

/// Label used for nodes that produce output without reading a relation
pub const COMPUTED_LABEL: &str = "Computed / Temp";

/// Attributes surfaced as node fields rather than kept in `details`
const CONSUMED_KEYS: [&str; 6] = [
    "Node Type",
    "Total Cost",
    "Plan Rows",
    "Actual Rows",
    "Actual Total Time",
    "Plans",
];

/// Parses PostgreSQL JSON EXPLAIN output.
///
/// Never fails: missing fields take defaults and an unusable top level
/// (string, number, null) yields an empty graph.
pub fn parse_postgres_plan(plan: &Value) -> PlanGraph {
    let mut builder = GraphBuilder::default();

    match plan {
        Value::Array(entries) => {
            for entry in entries {
                if !entry.is_object() {
                    tracing::warn!("skipping non-object entry in PostgreSQL plan array");
                    continue;
                }
                traverse(&mut builder, entry.get("Plan").unwrap_or(entry), None);
            }
            if let Some(first) = entries.first() {
                read_timing(&mut builder, first);
            }
        }
        Value::Object(_) => {
            traverse(&mut builder, plan.get("Plan").unwrap_or(plan), None);
            read_timing(&mut builder, plan);
        }
        _ => {
            tracing::warn!("PostgreSQL plan is neither an object nor an array");
        }
    }

    let graph = builder.finish();
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "parsed PostgreSQL plan"
    );
    graph
}

/// Top-level ANALYZE timings, present next to the `Plan` key
fn read_timing(builder: &mut GraphBuilder, top: &Value) {
    let graph = builder.graph_mut();
    graph.planning_time_ms = optional_millis(top.get("Planning Time"));
    graph.execution_time_ms = optional_millis(top.get("Execution Time"));
}

/// Pre-order walk: the node is emitted before its children
fn traverse(builder: &mut GraphBuilder, value: &Value, parent: Option<&str>) {
    let Some(obj) = value.as_object() else {
        tracing::warn!("skipping non-object PostgreSQL plan node");
        return;
    };

    let id = builder.allocate_id();
    let operation_type = text(obj.get("Node Type")).unwrap_or("Unknown");

    let label = text(obj.get("Relation Name"))
        .or_else(|| text(obj.get("Index Name")))
        .or_else(|| obj.get("Output").and_then(Value::as_array).map(|_| COMPUTED_LABEL))
        .unwrap_or_default();

    let mut node = PlanNode::new(&id, operation_type)
        .with_label(label)
        .with_cost(cost_or_default(obj.get("Total Cost")))
        .with_rows(rows_or_default(obj.get("Plan Rows")));
    node.actual_rows = optional_rows(obj.get("Actual Rows"));
    node.actual_time_ms = optional_millis(obj.get("Actual Total Time"));
    node.is_full_scan = operation_type == "Seq Scan";
    node.is_index_scan =
        operation_type.contains("Index Scan") || operation_type.contains("Bitmap Heap Scan");
    node.details = details_from(obj, &CONSUMED_KEYS);

    builder.emit(node, parent);

    if let Some(children) = obj.get("Plans").and_then(Value::as_array) {
        for child in children {
            traverse(builder, child, Some(id.as_str()));
        }
    }
}
