//! Query EXPLAIN Parser Module
//!
//! Dialect parsers that turn EXPLAIN JSON into a normalized [`PlanGraph`]:
//! - PostgreSQL (`EXPLAIN (FORMAT JSON)`, with or without ANALYZE)
//! - MySQL (`EXPLAIN FORMAT=JSON`)
//!
//! # Example
//!
//! ```
//! use plansight_explain::explain::{parse_mysql_plan, parse_postgres_plan};
//! use serde_json::json;
//!
//! let pg = json!([{"Plan": {"Node Type": "Seq Scan", "Relation Name": "users"}}]);
//! assert!(parse_postgres_plan(&pg).nodes[0].is_full_scan);
//!
//! let my = json!({"query_block": {"table": {"table_name": "users", "access_type": "ALL"}}});
//! assert!(parse_mysql_plan(&my).nodes[0].is_full_scan);
//! ```

pub mod coerce;
pub mod mysql;
pub mod plan;
pub mod postgres;

pub use mysql::parse_mysql_plan;
pub use plan::{OperationCategory, PlanEdge, PlanGraph, PlanNode, PlanSummary, Severity};
pub use postgres::{COMPUTED_LABEL, parse_postgres_plan};
