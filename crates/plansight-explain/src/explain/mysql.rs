//! MySQL EXPLAIN Parser
//!
//! Converts `EXPLAIN FORMAT=JSON` output into a [`PlanGraph`].
//!
//! MySQL's JSON has no uniform node-type tag: which operator a level stands
//! for is given by which key it carries (`table`, `nested_loop`,
//! `grouping_operation`, ...). Each level is therefore matched against
//! [`Shape`] before anything is emitted. `query_block` wrappers are walked
//! through without producing a node of their own.
//!
//! # Examples
//!
//! ```
//! use plansight_explain::explain::mysql::parse_mysql_plan;
//! use serde_json::json;
//!
//! let plan = json!({
//!     "query_block": {
//!         "select_id": 1,
//!         "table": {"table_name": "users", "access_type": "ALL", "rows_examined_per_scan": 100}
//!     }
//! });
//!
//! let graph = parse_mysql_plan(&plan);
//! assert_eq!(graph.nodes.len(), 1);
//! assert_eq!(graph.nodes[0].operation_type, "Access: ALL");
//! ```

use crate::explain::coerce::{cost_or_default, details_from, rows_or_default, text};
use crate::explain::plan::{GraphBuilder, PlanGraph, PlanNode};
use serde_json::{Map, Value};

/// Operator keys, in the precedence used when a level carries several
static OPERATOR_KEYS: [&str; 7] = [
    "query_block",
    "union_result",
    "ordering_operation",
    "grouping_operation",
    "duplicates_removal",
    "nested_loop",
    "table",
];

/// Keys of a table access that hold nested query blocks
const SUBQUERY_KEYS: [&str; 2] = ["materialized_from_subquery", "attached_subqueries"];

/// Access types that read through an index
const INDEX_ACCESS_TYPES: [&str; 5] = ["ref", "eq_ref", "const", "range", "index"];

/// One recognized level of a MySQL JSON plan
#[derive(Debug, Clone, Copy)]
enum Shape<'a> {
    /// `query_block`: transparent container
    QueryBlock(&'a Value),
    /// `union_result`: UNION of several query specifications
    UnionResult(&'a Map<String, Value>),
    /// `ordering_operation`: ORDER BY wrapping one input
    Ordering(&'a Value),
    /// `grouping_operation`: GROUP BY wrapping one input
    Grouping(&'a Value),
    /// `duplicates_removal`: DISTINCT wrapping one input
    DuplicatesRemoval(&'a Value),
    /// `nested_loop`: join operands, in join order
    NestedLoop(&'a [Value]),
    /// `table`: a table access
    Table(&'a Map<String, Value>),
}

impl<'a> Shape<'a> {
    /// Finds the operator carried by one level of the plan.
    ///
    /// When several operator keys are present the first in [`OPERATOR_KEYS`]
    /// wins and the others are reported.
    fn detect(obj: &'a Map<String, Value>) -> Option<Self> {
        let mut present = OPERATOR_KEYS
            .iter()
            .filter_map(|key| obj.get(*key).map(|value| (*key, value)));

        let (key, value) = present.next()?;
        let ignored: Vec<&str> = present.map(|(key, _)| key).collect();
        if !ignored.is_empty() {
            tracing::warn!(kept = key, ?ignored, "MySQL plan level has several operators");
        }

        let shape = match key {
            "query_block" => Some(Self::QueryBlock(value)),
            "union_result" => value.as_object().map(Self::UnionResult),
            "ordering_operation" => Some(Self::Ordering(value)),
            "grouping_operation" => Some(Self::Grouping(value)),
            "duplicates_removal" => Some(Self::DuplicatesRemoval(value)),
            "nested_loop" => value.as_array().map(|items| Self::NestedLoop(items.as_slice())),
            "table" => value.as_object().map(Self::Table),
            _ => None,
        };
        if shape.is_none() {
            tracing::warn!(key, "MySQL operator has an unexpected JSON type");
        }
        shape
    }
}

/// Parses MySQL JSON EXPLAIN output.
///
/// Best effort: unrecognized levels are skipped with a warning, so an
/// unknown top-level shape produces an empty graph rather than an error.
pub fn parse_mysql_plan(plan: &Value) -> PlanGraph {
    let mut builder = GraphBuilder::default();

    if plan.is_object() {
        visit(&mut builder, plan, None);
        builder.graph_mut().reported_cost = plan
            .get("query_block")
            .and_then(|block| block.get("cost_info"))
            .and_then(|cost| cost.get("query_cost"))
            .map(|cost| cost_or_default(Some(cost)));
    } else {
        tracing::warn!("MySQL plan is not a JSON object");
    }

    let graph = builder.finish();
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "parsed MySQL plan"
    );
    graph
}

fn visit(builder: &mut GraphBuilder, value: &Value, parent: Option<&str>) {
    let Some(obj) = value.as_object() else {
        tracing::warn!("skipping non-object MySQL plan level");
        return;
    };
    let Some(shape) = Shape::detect(obj) else {
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        tracing::warn!(?keys, "unrecognized MySQL plan shape");
        return;
    };

    match shape {
        Shape::QueryBlock(block) => visit(builder, block, parent),
        Shape::Table(table) => visit_table(builder, table, parent),
        Shape::NestedLoop(operands) => {
            let id = emit_operator(builder, "Nested Loop Join", obj, None, parent);
            for operand in operands {
                visit(builder, operand, Some(id.as_str()));
            }
        }
        Shape::Ordering(inner) => {
            let id = emit_operator(builder, "Order By", obj, inner.as_object(), parent);
            visit_wrapped(builder, "ordering_operation", inner, &id);
        }
        Shape::Grouping(inner) => {
            let id = emit_operator(builder, "Group By", obj, inner.as_object(), parent);
            visit_wrapped(builder, "grouping_operation", inner, &id);
        }
        Shape::DuplicatesRemoval(inner) => {
            let id = emit_operator(builder, "Distinct", obj, inner.as_object(), parent);
            visit_wrapped(builder, "duplicates_removal", inner, &id);
        }
        Shape::UnionResult(union) => {
            let id = emit_operator(builder, "Union", obj, Some(union), parent);
            if let Some(specs) = union.get("query_specifications").and_then(Value::as_array) {
                for spec in specs {
                    visit(builder, spec, Some(id.as_str()));
                }
            }
        }
    }
}

/// Descends into the single input of a grouping, ordering or distinct operator.
///
/// Anything other than one object (e.g. a list of grouping sets) is left
/// unexpanded: the operator node stays, without children.
fn visit_wrapped(builder: &mut GraphBuilder, key: &str, inner: &Value, id: &str) {
    if inner.is_object() {
        visit(builder, inner, Some(id));
    } else {
        tracing::warn!(key, "MySQL operator does not wrap a single input; children skipped");
    }
}

/// Emits a composite operator node: a label but no metrics of its own
fn emit_operator(
    builder: &mut GraphBuilder,
    operation_type: &str,
    level: &Map<String, Value>,
    body: Option<&Map<String, Value>>,
    parent: Option<&str>,
) -> String {
    let id = builder.allocate_id();
    let mut node = PlanNode::new(&id, operation_type);

    if let Some(body) = body {
        node.label = operator_hints(body);
        node.details = details_from(body, &OPERATOR_KEYS);
        node.details.shift_remove("query_specifications");
    } else {
        node.details = details_from(level, &OPERATOR_KEYS);
    }

    builder.emit(node, parent);
    id
}

/// MySQL's own "Extra" hints for an operator, e.g. `Using temporary, Using filesort`
fn operator_hints(body: &Map<String, Value>) -> String {
    let flag = |key: &str| body.get(key).and_then(Value::as_bool).unwrap_or(false);

    let mut hints = Vec::new();
    if flag("using_temporary_table") {
        hints.push("Using temporary");
    }
    if flag("using_filesort") {
        hints.push("Using filesort");
    }
    if hints.is_empty() {
        // UNION results name their temporary table, e.g. <union1,2>
        return text(body.get("table_name")).unwrap_or_default().to_string();
    }
    hints.join(", ")
}

fn visit_table(builder: &mut GraphBuilder, table: &Map<String, Value>, parent: Option<&str>) {
    let id = builder.allocate_id();
    let access_type = text(table.get("access_type"));

    let operation_type = match access_type {
        Some(access) => format!("Access: {}", access.to_uppercase()),
        None => "Table Access".to_string(),
    };

    let cost_info = table.get("cost_info");
    let cost = cost_or_default(cost_info.and_then(|c| c.get("eval_cost")))
        + cost_or_default(cost_info.and_then(|c| c.get("read_cost")));

    let mut node = PlanNode::new(&id, operation_type)
        .with_label(text(table.get("table_name")).unwrap_or_default())
        .with_cost(cost)
        .with_rows(rows_or_default(table.get("rows_examined_per_scan")));
    node.is_full_scan = access_type == Some("ALL");
    node.is_index_scan = access_type.is_some_and(|a| INDEX_ACCESS_TYPES.contains(&a));

    let mut skip = vec!["table_name", "access_type", "rows_examined_per_scan"];
    skip.extend(SUBQUERY_KEYS);
    node.details = details_from(table, &skip);

    builder.emit(node, parent);

    // Derived tables and attached subqueries feed the table access
    if let Some(derived) = table.get("materialized_from_subquery") {
        visit(builder, derived, Some(id.as_str()));
    }
    if let Some(subqueries) = table.get("attached_subqueries").and_then(Value::as_array) {
        for subquery in subqueries {
            visit(builder, subquery, Some(id.as_str()));
        }
    }
}

#[cfg(test)]
mod tests;
