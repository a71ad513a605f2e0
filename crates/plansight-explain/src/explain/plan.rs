//! Plan Graph Model - normalized nodes and edges for plan visualization
//!
//! Every dialect parser produces a [`PlanGraph`]: a flat list of
//! [`PlanNode`]s in pre-order plus the [`PlanEdge`]s that connect them.
//! Operation names are kept in each engine's own vocabulary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Relative cost classification of a node within its plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Coarse kind of operation, used to pick an icon when rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationCategory {
    Scan,
    Join,
    Sort,
    Other,
}

/// One operation in a query's execution plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanNode {
    /// Sequential id assigned during traversal (`node-0`, `node-1`, ...)
    pub id: String,
    /// Physical operator in the engine's vocabulary
    pub operation_type: String,
    /// Table or index the operation works on; empty when not applicable
    pub label: String,
    /// Optimizer cost, never negative or NaN
    pub estimated_cost: f64,
    pub estimated_rows: u64,
    /// Rows actually produced (ANALYZE plans only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_rows: Option<u64>,
    /// Wall-clock time spent in this node (ANALYZE plans only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_time_ms: Option<f64>,
    pub is_full_scan: bool,
    pub is_index_scan: bool,
    /// Set by [`crate::classify::classify`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Set by [`crate::classify::classify`]
    #[serde(default)]
    pub misestimated: bool,
    /// Remaining attributes of the source node, for tooltips
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub details: IndexMap<String, Value>,
}

impl PlanNode {
    /// Creates a node with zeroed metrics
    pub fn new(id: impl Into<String>, operation_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            operation_type: operation_type.into(),
            label: String::new(),
            estimated_cost: 0.0,
            estimated_rows: 0,
            actual_rows: None,
            actual_time_ms: None,
            is_full_scan: false,
            is_index_scan: false,
            severity: None,
            misestimated: false,
            details: IndexMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.estimated_cost = cost;
        self
    }

    pub fn with_rows(mut self, rows: u64) -> Self {
        self.estimated_rows = rows;
        self
    }

    pub fn with_actual_rows(mut self, rows: u64) -> Self {
        self.actual_rows = Some(rows);
        self
    }

    /// Returns the operation's category, derived from its name
    pub fn category(&self) -> OperationCategory {
        let op = self.operation_type.as_str();
        if op.contains("Scan") || op.starts_with("Access") || op == "Table Access" {
            OperationCategory::Scan
        } else if op.contains("Join") || op.contains("Nested Loop") {
            OperationCategory::Join
        } else if op.contains("Sort") || op.contains("Order") {
            OperationCategory::Sort
        } else {
            OperationCategory::Other
        }
    }
}

/// Data-flow edge: the source (child) feeds rows into the target (parent)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEdge {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
}

impl PlanEdge {
    /// Creates the edge for `child` feeding `parent`
    pub fn feeding(parent: &str, child: &str) -> Self {
        Self {
            id: format!("e-{parent}-{child}"),
            source_node_id: child.to_string(),
            target_node_id: parent.to_string(),
        }
    }
}

/// Parsed plan: nodes in traversal order and the edges between them
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanGraph {
    pub nodes: Vec<PlanNode>,
    pub edges: Vec<PlanEdge>,
    /// Postgres `Planning Time` (ANALYZE plans)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planning_time_ms: Option<f64>,
    /// Postgres `Execution Time` (ANALYZE plans)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<f64>,
    /// Whole-query cost reported by the engine (MySQL `query_cost`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_cost: Option<f64>,
}

impl PlanGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The first emitted node, i.e. the plan root
    pub fn root(&self) -> Option<&PlanNode> {
        self.nodes.first()
    }

    pub fn node(&self, id: &str) -> Option<&PlanNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes feeding directly into `id`, in traversal order
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a PlanNode> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.target_node_id == id)
            .filter_map(move |e| self.node(&e.source_node_id))
    }

    /// Highest estimated cost in the plan (0 for an empty plan)
    pub fn max_cost(&self) -> f64 {
        self.nodes
            .iter()
            .map(|n| n.estimated_cost)
            .fold(0.0, f64::max)
    }

    /// Aggregated counters for a plan overview
    pub fn summary(&self) -> PlanSummary {
        let count = |pred: fn(&PlanNode) -> bool| self.nodes.iter().filter(|n| pred(n)).count();
        PlanSummary {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            root_id: self.root().map(|n| n.id.clone()),
            max_cost: self.max_cost(),
            full_scans: count(|n| n.is_full_scan),
            index_scans: count(|n| n.is_index_scan),
            misestimated: count(|n| n.misestimated),
            high_severity: count(|n| n.severity == Some(Severity::High)),
            planning_time_ms: self.planning_time_ms,
            execution_time_ms: self.execution_time_ms,
        }
    }
}

/// Overview of one plan, shown next to the graph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub root_id: Option<String>,
    pub max_cost: f64,
    pub full_scans: usize,
    pub index_scans: usize,
    pub misestimated: usize,
    pub high_severity: usize,
    pub planning_time_ms: Option<f64>,
    pub execution_time_ms: Option<f64>,
}

/// Traversal state shared by the dialect parsers.
///
/// Owns the id counter, so ids are unique within one parse and restart at
/// zero for the next.
#[derive(Debug, Default)]
pub(crate) struct GraphBuilder {
    graph: PlanGraph,
    next_id: usize,
}

impl GraphBuilder {
    /// Allocates the next sequential node id
    pub fn allocate_id(&mut self) -> String {
        let id = format!("node-{}", self.next_id);
        self.next_id += 1;
        id
    }

    /// Emits `node`, wiring it to `parent` when it has one
    pub fn emit(&mut self, node: PlanNode, parent: Option<&str>) {
        if let Some(parent) = parent {
            self.graph.edges.push(PlanEdge::feeding(parent, &node.id));
        }
        self.graph.nodes.push(node);
    }

    pub fn graph_mut(&mut self) -> &mut PlanGraph {
        &mut self.graph
    }

    pub fn finish(self) -> PlanGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests;
