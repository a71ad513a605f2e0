//! Plan visualization pipeline
//!
//! raw EXPLAIN JSON → dialect parser → cost classifier → layout.
//! Each call works on its own freshly parsed graph; nothing is cached.

use crate::classify::classify;
use crate::error::{ExplainError, Result};
use crate::explain::mysql::parse_mysql_plan;
use crate::explain::plan::{PlanEdge, PlanGraph, PlanNode, PlanSummary};
use crate::explain::postgres::parse_postgres_plan;
use plansight_layout::{LayoutConfig, LayoutGraph, Point, layout};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default plan card width
pub const DEFAULT_NODE_WIDTH: f64 = 220.0;
/// Default plan card height
pub const DEFAULT_NODE_HEIGHT: f64 = 100.0;

/// Database engines whose EXPLAIN output can be visualized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[serde(rename = "postgresql")]
    Postgres,
    Mysql,
}

impl Dialect {
    /// Resolves a dialect name (`postgresql`, `mysql`), ignoring case and
    /// surrounding whitespace
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "postgresql" => Some(Self::Postgres),
            "mysql" => Some(Self::Mysql),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgresql",
            Self::Mysql => "mysql",
        }
    }

    /// Runs this dialect's parser
    pub fn parse(&self, plan: &Value) -> PlanGraph {
        match self {
            Self::Postgres => parse_postgres_plan(plan),
            Self::Mysql => parse_mysql_plan(plan),
        }
    }
}

/// Layout parameters for plan graphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanLayoutOptions {
    #[serde(flatten)]
    pub layout: LayoutConfig,
    pub node_width: f64,
    pub node_height: f64,
}

impl Default for PlanLayoutOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
        }
    }
}

/// A plan node with its placement on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    #[serde(flatten)]
    pub node: PlanNode,
    /// Top-left corner of the card
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

/// Everything a renderer needs to draw one plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualPlan {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<PlanEdge>,
    pub summary: PlanSummary,
    pub width: f64,
    pub height: f64,
}

impl VisualPlan {
    /// True when the plan could not be visualized
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.node.id == id)
    }
}

/// Parses, classifies and lays out one plan.
///
/// An unsupported dialect is not an error: it yields an empty plan and a
/// warning, and the caller shows its "not supported" state.
///
/// # Examples
///
/// ```
/// use plansight_explain::{visualize, PlanLayoutOptions};
/// use serde_json::json;
///
/// let plan = json!([{"Plan": {"Node Type": "Seq Scan", "Relation Name": "users"}}]);
/// let visual = visualize(&plan, "postgresql", &PlanLayoutOptions::default());
/// assert_eq!(visual.nodes.len(), 1);
///
/// assert!(visualize(&plan, "oracle", &PlanLayoutOptions::default()).is_empty());
/// ```
pub fn visualize(plan: &Value, dialect: &str, options: &PlanLayoutOptions) -> VisualPlan {
    let Some(parsed) = Dialect::from_name(dialect) else {
        tracing::warn!(dialect, "visual explain is not supported for this dialect");
        return VisualPlan::default();
    };

    let graph = parsed.parse(plan);
    if graph.is_empty() {
        tracing::warn!(dialect = parsed.as_str(), "plan produced no nodes");
    }
    layout_plan(graph, options)
}

/// Same as [`visualize`], starting from raw EXPLAIN text
pub fn visualize_str(text: &str, dialect: &str, options: &PlanLayoutOptions) -> Result<VisualPlan> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExplainError::EmptyOutput);
    }
    let plan: Value = serde_json::from_str(trimmed)?;
    Ok(visualize(&plan, dialect, options))
}

/// Classifies and lays out an already parsed plan
pub fn layout_plan(mut graph: PlanGraph, options: &PlanLayoutOptions) -> VisualPlan {
    classify(&mut graph.nodes);

    let mut input = LayoutGraph::new();
    for node in &graph.nodes {
        input.add_node(node.id.as_str(), options.node_width, options.node_height);
    }
    // Rows flow child -> parent; the layout ranks parent -> child so the
    // root lands in the first rank.
    for edge in &graph.edges {
        input.add_edge(&edge.target_node_id, &edge.source_node_id);
    }

    let placed = layout(&input, &options.layout);
    let summary = graph.summary();

    let nodes = graph
        .nodes
        .into_iter()
        .map(|node| {
            // Ids the layout rejected as duplicates share the first box
            let (position, width, height) = match placed.node(&node.id) {
                Some(placed) => (placed.position, placed.width, placed.height),
                None => (Point::default(), options.node_width, options.node_height),
            };
            LayoutNode {
                node,
                position,
                width,
                height,
            }
        })
        .collect();

    VisualPlan {
        nodes,
        edges: graph.edges,
        summary,
        width: placed.width,
        height: placed.height,
    }
}
