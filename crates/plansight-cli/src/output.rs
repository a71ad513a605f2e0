//! Terminal rendering of a visualized plan

use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use plansight_explain::{LayoutNode, PlanSummary, Severity, VisualPlan};

/// Message printed when a plan yields no nodes
pub const EMPTY_PLAN: &str = "cannot visualize this plan";

pub fn render_json(plan: &VisualPlan, compact: bool) -> anyhow::Result<String> {
    let json = if compact {
        serde_json::to_string(plan)?
    } else {
        serde_json::to_string_pretty(plan)?
    };
    Ok(json)
}

/// Node table followed by the summary counts
pub fn render_summary(plan: &VisualPlan) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Id",
            "Operation",
            "Label",
            "Cost",
            "Rows",
            "Actual Rows",
            "Severity",
            "Flags",
        ]);

    for node in &plan.nodes {
        table.add_row(node_row(node));
    }

    format!("{table}\n{}", summary_lines(&plan.summary))
}

fn node_row(layout_node: &LayoutNode) -> Vec<Cell> {
    let node = &layout_node.node;
    let severity = node.severity.unwrap_or(Severity::Low);
    let severity_cell = Cell::new(severity.as_str()).fg(match severity {
        Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Green,
    });

    vec![
        Cell::new(&node.id),
        Cell::new(&node.operation_type),
        Cell::new(&node.label),
        Cell::new(format!("{:.2}", node.estimated_cost)),
        Cell::new(node.estimated_rows),
        Cell::new(
            node.actual_rows
                .map(|rows| rows.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        severity_cell,
        Cell::new(flags(layout_node).join(", ")),
    ]
}

fn flags(layout_node: &LayoutNode) -> Vec<&'static str> {
    let node = &layout_node.node;
    let mut flags = Vec::new();
    if node.is_full_scan {
        flags.push("full scan");
    }
    if node.is_index_scan {
        flags.push("index");
    }
    if node.misestimated {
        flags.push("misestimate");
    }
    flags
}

fn summary_lines(summary: &PlanSummary) -> String {
    let mut lines = vec![
        format!("nodes: {}  edges: {}", summary.node_count, summary.edge_count),
        format!("max cost: {:.2}", summary.max_cost),
        format!(
            "full scans: {}  index scans: {}  misestimates: {}  high severity: {}",
            summary.full_scans, summary.index_scans, summary.misestimated, summary.high_severity
        ),
    ];
    if let Some(ms) = summary.planning_time_ms {
        lines.push(format!("planning time: {ms:.3} ms"));
    }
    if let Some(ms) = summary.execution_time_ms {
        lines.push(format!("execution time: {ms:.3} ms"));
    }
    lines.join("\n")
}
