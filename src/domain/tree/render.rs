//! Text rendering and export of decision trees.

use std::fmt::Write;

use super::{Cost, DecisionNode, TreeError};
use crate::domain::foundation::truncate_with_ellipsis;

const SUMMARY_LABEL_CHARS: usize = 30;
const SUMMARY_BAR_WIDTH: usize = 40;
const BENEFIT_ICON: &str = "✅";

/// Renders the tree as indented text.
pub fn render_tree(root: &DecisionNode) -> String {
    let mut out = String::new();
    render_node(root, 0, &mut out);
    out
}

fn render_node(node: &DecisionNode, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    let marker = if indent == 0 { "" } else { "└─ " };
    let _ = writeln!(
        out,
        "{}{}[{:.1}%] {}",
        pad, marker, node.probability, node.description
    );

    let detail = "  ".repeat(indent + 2);
    if let Some(reasoning) = &node.reasoning {
        let _ = writeln!(out, "{}Reasoning: {}", detail, reasoning);
    }
    if !node.costs.is_empty() {
        let _ = writeln!(out, "{}Costs:", detail);
        for cost in &node.costs {
            let _ = writeln!(out, "{}  {}", detail, cost_line(cost.resource_type.icon(), cost));
        }
    }
    if !node.benefits.is_empty() {
        let _ = writeln!(out, "{}Benefits:", detail);
        for benefit in &node.benefits {
            let _ = writeln!(out, "{}  {}", detail, cost_line(BENEFIT_ICON, benefit));
        }
    }

    for child in &node.children {
        render_node(child, indent + 1, out);
    }
}

fn cost_line(icon: &str, cost: &Cost) -> String {
    let amount = format!("{} {}", cost.amount, cost.unit);
    format!("{} {} - {}", icon, amount.trim_end(), cost.label())
}

/// Bar chart of the first-level scenarios, or of the root when it has none.
pub fn render_summary(root: &DecisionNode) -> String {
    let scenarios: Vec<&DecisionNode> = if root.children.is_empty() {
        vec![root]
    } else {
        root.children.iter().collect()
    };

    let mut out = String::from("Main scenario probabilities\n");
    for scenario in scenarios {
        let label = truncate_with_ellipsis(&scenario.description, SUMMARY_LABEL_CHARS);
        let filled = ((scenario.probability.clamp(0.0, 100.0) / 100.0)
            * SUMMARY_BAR_WIDTH as f64)
            .round() as usize;
        let _ = writeln!(
            out,
            "{:<width$} {}{} {:.1}%",
            label,
            "█".repeat(filled),
            "░".repeat(SUMMARY_BAR_WIDTH - filled),
            scenario.probability,
            width = SUMMARY_LABEL_CHARS,
        );
    }
    out
}

pub fn to_json(root: &DecisionNode) -> Result<String, TreeError> {
    serde_json::to_string_pretty(root).map_err(|e| TreeError::Export(e.to_string()))
}

pub fn to_yaml(root: &DecisionNode) -> Result<String, TreeError> {
    serde_yaml::to_string(root).map_err(|e| TreeError::Export(e.to_string()))
}
