//! Cost Classifier
//!
//! Annotates parsed plan nodes with a severity relative to the most
//! expensive node of the same plan, and flags row estimates that diverge
//! sharply from what ANALYZE measured.

use crate::explain::plan::{PlanNode, Severity};

/// Cost ratio above which a node is [`Severity::High`]
pub const HIGH_COST_RATIO: f64 = 0.8;
/// Cost ratio above which a node is [`Severity::Medium`]
pub const MEDIUM_COST_RATIO: f64 = 0.4;
/// Absolute row difference that always counts as a misestimate
pub const MISESTIMATE_ROW_DELTA: u64 = 1000;
/// Factor between estimated and actual rows that counts as a misestimate
pub const MISESTIMATE_FACTOR: f64 = 10.0;

/// Sets `severity` and `misestimated` on every node.
///
/// Purely additive: nodes are neither reordered nor removed.
pub fn classify(nodes: &mut [PlanNode]) {
    let max_cost = nodes
        .iter()
        .map(|n| n.estimated_cost)
        .fold(0.0, f64::max);

    for node in nodes.iter_mut() {
        node.severity = Some(severity_for(node.estimated_cost, max_cost));
        node.misestimated = is_misestimated(node.estimated_rows, node.actual_rows);
    }
}

/// Severity of a node costing `cost` in a plan whose costliest node is `max_cost`
pub fn severity_for(cost: f64, max_cost: f64) -> Severity {
    let ratio = if max_cost > 0.0 { cost / max_cost } else { 0.0 };

    if ratio > HIGH_COST_RATIO {
        Severity::High
    } else if ratio > MEDIUM_COST_RATIO {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// True when ANALYZE rows are known and far from the estimate.
///
/// The ratio checks only apply when both counts are non-zero; a zero
/// estimate is judged by the absolute difference alone.
pub fn is_misestimated(estimated: u64, actual: Option<u64>) -> bool {
    let Some(actual) = actual else {
        return false;
    };

    if estimated.abs_diff(actual) > MISESTIMATE_ROW_DELTA {
        return true;
    }
    if estimated == 0 || actual == 0 {
        return false;
    }

    let (estimated, actual) = (estimated as f64, actual as f64);
    actual / estimated > MISESTIMATE_FACTOR || estimated / actual > MISESTIMATE_FACTOR
}
