//! Layout input and output types
//!
//! A [`LayoutGraph`] is a plain list of sized boxes and directed edges. It knows
//! nothing about what the boxes represent, so execution plans, lock-wait graphs
//! and ER diagrams all go through the same engine.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Flow direction of the drawing, named after dagre's `rankdir` values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Ranks stacked from top to bottom
    #[default]
    #[serde(rename = "TB", alias = "tb")]
    TopBottom,
    /// Ranks stacked from bottom to top
    #[serde(rename = "BT", alias = "bt")]
    BottomTop,
    /// Ranks laid out from left to right
    #[serde(rename = "LR", alias = "lr")]
    LeftRight,
    /// Ranks laid out from right to left
    #[serde(rename = "RL", alias = "rl")]
    RightLeft,
}

impl Direction {
    /// Parses a direction from its short name (`TB`, `BT`, `LR`, `RL`), ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" => Some(Self::TopBottom),
            "BT" => Some(Self::BottomTop),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }

    /// Returns true if ranks advance along the x axis
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }

    /// Returns true if ranks advance toward negative coordinates before translation
    pub fn is_mirrored(&self) -> bool {
        matches!(self, Self::BottomTop | Self::RightLeft)
    }
}

/// Spacing and direction parameters for [`crate::layout`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub direction: Direction,
    /// Gap between two neighbouring nodes in the same rank
    pub node_sep: f64,
    /// Gap kept around the virtual points of long edges
    pub edge_sep: f64,
    /// Gap between two consecutive ranks
    pub rank_sep: f64,
    /// Number of crossing-reduction sweeps
    pub sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::TopBottom,
            node_sep: 50.0,
            edge_sep: 10.0,
            rank_sep: 50.0,
            sweeps: 24,
        }
    }
}

impl LayoutConfig {
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Copy with every gap clamped to a finite, non-negative value
    pub fn sanitized(&self) -> Self {
        Self {
            node_sep: clamp_extent(self.node_sep),
            edge_sep: clamp_extent(self.edge_sep),
            rank_sep: clamp_extent(self.rank_sep),
            ..self.clone()
        }
    }
}

/// Width and height of a node's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Creates a size, clamping negative and non-finite values to zero
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: clamp_extent(width),
            height: clamp_extent(height),
        }
    }
}

fn clamp_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Input graph for the layout engine
///
/// Nodes keep their insertion order; every tie in the layout is broken by it.
/// An edge `from -> to` places `from` in an earlier rank than `to`.
#[derive(Debug, Clone, Default)]
pub struct LayoutGraph {
    nodes: IndexMap<String, Size>,
    edges: Vec<(usize, usize)>,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. Returns false (and keeps the first box) if the id already exists.
    pub fn add_node(&mut self, id: impl Into<String>, width: f64, height: f64) -> bool {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            tracing::warn!(node = %id, "duplicate layout node ignored");
            return false;
        }
        self.nodes.insert(id, Size::new(width, height));
        true
    }

    /// Adds an edge between two known nodes.
    ///
    /// Self-loops and edges with an unknown endpoint are dropped and reported.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(a), Some(b)) = (self.nodes.get_index_of(from), self.nodes.get_index_of(to))
        else {
            tracing::warn!(from, to, "layout edge references an unknown node");
            return false;
        };
        if a == b {
            tracing::debug!(node = from, "self-loop ignored by layout");
            return false;
        }
        self.edges.push((a, b));
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn id(&self, index: usize) -> &str {
        self.nodes
            .get_index(index)
            .map(|(id, _)| id.as_str())
            .unwrap_or_default()
    }

    pub(crate) fn size(&self, index: usize) -> Size {
        self.nodes
            .get_index(index)
            .map(|(_, size)| *size)
            .unwrap_or_default()
    }

    pub(crate) fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }
}

/// A point in drawing coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Final placement of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePosition {
    pub id: String,
    /// Centre of the box, the layering algorithm's native anchor
    pub center: Point,
    /// Top-left corner of the box
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

impl NodePosition {
    /// Builds a placement from a centre point, deriving the top-left anchor
    pub fn from_center(id: impl Into<String>, center: Point, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            center,
            position: Point::new(center.x - width / 2.0, center.y - height / 2.0),
            width,
            height,
        }
    }
}

/// Route of one input edge. `points` holds the bends of edges that span
/// several ranks and is empty for edges between adjacent ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRoute {
    pub from: String,
    pub to: String,
    pub points: Vec<Point>,
}

/// Result of [`crate::layout`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<NodePosition>,
    pub edges: Vec<EdgeRoute>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&NodePosition> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
