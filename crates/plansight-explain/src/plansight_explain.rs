//! Plansight Explain - query plan visualization pipeline
//!
//! This crate provides functionality for:
//! - Parsing EXPLAIN JSON from PostgreSQL and MySQL into a normalized graph
//! - Classifying node cost relative to the plan's most expensive node
//! - Flagging row estimates that ANALYZE proved wrong
//! - Positioning the graph for rendering (via `plansight-layout`)

pub mod classify;
pub mod error;
pub mod explain;
pub mod pipeline;

pub use classify::{classify, is_misestimated, severity_for};
pub use error::{ExplainError, Result};
pub use explain::*;
pub use pipeline::{
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, Dialect, LayoutNode, PlanLayoutOptions, VisualPlan,
    layout_plan, visualize, visualize_str,
};
pub use plansight_layout::{Direction, LayoutConfig, Point};
