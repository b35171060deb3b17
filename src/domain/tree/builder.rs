//! Building a [`DecisionNode`] tree from loosely structured JSON.
//!
//! Model replies routinely omit fields, use strings for numbers or invent
//! resource names, so every field has a default. Probabilities are the one
//! hard constraint: a node outside 0..=100 is rejected.

use serde_json::Value;

use super::{Cost, DecisionNode, ResourceType, TreeError};
use crate::domain::profile::{coerce_f64, coerce_string};

/// Default probability for nodes that do not state one.
pub const DEFAULT_PROBABILITY: f64 = 50.0;

/// Allowed deviation of children totals from 100 before rescaling.
pub const NORMALIZATION_TOLERANCE: f64 = 5.0;

/// Parses repaired tree JSON and builds the tree.
pub fn parse_tree(json: &str, max_depth: u32) -> Result<DecisionNode, TreeError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| TreeError::InvalidJson(e.to_string()))?;
    build_tree(&value, max_depth)
}

/// Builds the tree rooted at `value`.
///
/// Children deeper than `max_depth` are pruned; invalid children are
/// skipped. An invalid root is an error.
pub fn build_tree(value: &Value, max_depth: u32) -> Result<DecisionNode, TreeError> {
    build_node(value, 0, max_depth)
}

fn build_node(value: &Value, level: u32, max_depth: u32) -> Result<DecisionNode, TreeError> {
    let object = value.as_object().ok_or(TreeError::NotAnObject)?;

    let id = object
        .get("id")
        .and_then(coerce_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let probability = object
        .get("probability")
        .and_then(coerce_f64)
        .unwrap_or(DEFAULT_PROBABILITY);
    if !(0.0..=100.0).contains(&probability) {
        return Err(TreeError::ProbabilityOutOfRange { id, probability });
    }

    let description = object
        .get("description")
        .and_then(coerce_string)
        .unwrap_or_else(|| "Decision".to_string());

    let reasoning = object.get("reasoning").and_then(coerce_string);

    let mut children = Vec::new();
    if let Some(Value::Array(items)) = object.get("children") {
        if level < max_depth {
            for item in items {
                match build_node(item, level + 1, max_depth) {
                    Ok(child) => children.push(child),
                    Err(e) => {
                        tracing::warn!(parent = %id, error = %e, "Skipping invalid tree node");
                    }
                }
            }
        } else if !items.is_empty() {
            tracing::debug!(node = %id, level, max_depth, "Pruning children beyond max depth");
        }
    }
    normalize_probabilities(&mut children);

    Ok(DecisionNode {
        id,
        description,
        probability,
        costs: parse_costs(object.get("costs")),
        benefits: parse_costs(object.get("benefits")),
        children,
        level,
        reasoning,
    })
}

fn parse_costs(value: Option<&Value>) -> Vec<Cost> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| Cost {
            resource_type: item
                .get("resource_type")
                .and_then(Value::as_str)
                .map(ResourceType::parse_lenient)
                .unwrap_or(ResourceType::Other),
            amount: item.get("amount").and_then(coerce_f64).unwrap_or(0.0),
            unit: item
                .get("unit")
                .and_then(coerce_string)
                .unwrap_or_default(),
            description: item.get("description").and_then(coerce_string),
        })
        .collect()
}

/// Rescales sibling probabilities to sum to 100.
///
/// Applied only when the total is positive and off by more than
/// [`NORMALIZATION_TOLERANCE`].
pub fn normalize_probabilities(children: &mut [DecisionNode]) {
    let total: f64 = children.iter().map(|c| c.probability).sum();
    if total > 0.0 && (total - 100.0).abs() > NORMALIZATION_TOLERANCE {
        for child in children.iter_mut() {
            child.probability = child.probability / total * 100.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample_tree() -> Value {
        json!({
            "id": "root",
            "description": "Accept the data lead offer",
            "probability": 100,
            "costs": [
                {"resource_type": "dinero", "amount": 10000, "unit": "PEN", "description": "relocation"}
            ],
            "benefits": [
                {"resource_type": "money", "amount": "2000", "unit": "PEN/month"}
            ],
            "level": 7,
            "reasoning": "Higher salary",
            "children": [
                {"id": "opt1", "description": "Succeed", "probability": 40, "children": []},
                {"id": "opt2", "description": "Struggle", "probability": 35},
                {"id": "opt3", "description": "Leave", "probability": 25}
            ]
        })
    }

    #[test]
    fn builds_nodes_costs_and_benefits() {
        let root = build_tree(&sample_tree(), 4).unwrap();

        assert_eq!(root.id, "root");
        assert_eq!(root.level, 0);
        assert_eq!(root.reasoning.as_deref(), Some("Higher salary"));
        assert_eq!(root.costs[0].resource_type, ResourceType::Money);
        assert_eq!(root.costs[0].amount, 10000.0);
        assert_eq!(root.benefits[0].amount, 2000.0);
        assert_eq!(root.benefits[0].description, None);
        assert_eq!(root.children.len(), 3);
        assert!(root.children.iter().all(|c| c.level == 1));
        assert_eq!(root.children[0].probability, 40.0);
    }

    #[test]
    fn missing_fields_get_defaults() {
        let root = build_tree(&json!({"children": [{}]}), 4).unwrap();

        assert_eq!(root.description, "Decision");
        assert_eq!(root.probability, DEFAULT_PROBABILITY);
        assert!(uuid::Uuid::parse_str(&root.id).is_ok());
        // single child at 50 is rescaled to 100
        assert_eq!(root.children[0].probability, 100.0);
    }

    #[test]
    fn unknown_resource_type_becomes_other() {
        let root = build_tree(
            &json!({"costs": [{"resource_type": "karma", "amount": 1}, {"amount": 2}]}),
            4,
        )
        .unwrap();
        assert_eq!(root.costs[0].resource_type, ResourceType::Other);
        assert_eq!(root.costs[1].resource_type, ResourceType::Other);
    }

    #[test]
    fn out_of_range_child_is_skipped() {
        let root = build_tree(
            &json!({
                "id": "root",
                "children": [
                    {"id": "ok", "probability": 60},
                    {"id": "bad", "probability": 140},
                    {"id": "ok2", "probability": 40}
                ]
            }),
            4,
        )
        .unwrap();

        let ids: Vec<_> = root.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "ok2"]);
    }

    #[test]
    fn out_of_range_root_is_an_error() {
        let err = build_tree(&json!({"id": "root", "probability": -5}), 4).unwrap_err();
        assert_eq!(
            err,
            TreeError::ProbabilityOutOfRange {
                id: "root".to_string(),
                probability: -5.0
            }
        );
    }

    #[test]
    fn non_object_root_is_an_error() {
        assert_eq!(build_tree(&json!([1, 2]), 4), Err(TreeError::NotAnObject));
    }

    #[test]
    fn prunes_beyond_max_depth() {
        let value = json!({
            "id": "root",
            "children": [{
                "id": "a", "probability": 100,
                "children": [{
                    "id": "a1", "probability": 100,
                    "children": [{"id": "a1x", "probability": 100}]
                }]
            }]
        });

        let root = build_tree(&value, 2).unwrap();
        assert_eq!(root.depth(), 2);
        assert!(root.children[0].children[0].is_leaf());

        let root = build_tree(&value, 0).unwrap();
        assert!(root.is_leaf());
    }

    #[test]
    fn totals_within_tolerance_are_left_alone() {
        let root = build_tree(
            &json!({"children": [{"probability": 52}, {"probability": 51}]}),
            4,
        )
        .unwrap();
        assert_eq!(root.children[0].probability, 52.0);
        assert_eq!(root.children[1].probability, 51.0);
    }

    #[test]
    fn totals_outside_tolerance_are_rescaled() {
        let root = build_tree(
            &json!({"children": [{"probability": 30}, {"probability": 30}]}),
            4,
        )
        .unwrap();
        assert_eq!(root.children[0].probability, 50.0);
        assert_eq!(root.children[1].probability, 50.0);
    }

    #[test]
    fn parse_tree_reports_invalid_json() {
        assert!(matches!(
            parse_tree("{\"id\": ", 4),
            Err(TreeError::InvalidJson(_))
        ));
    }

    fn children_with(probabilities: &[f64]) -> Vec<DecisionNode> {
        probabilities
            .iter()
            .enumerate()
            .map(|(i, p)| DecisionNode::leaf(format!("c{}", i), "child", *p, 1))
            .collect()
    }

    proptest! {
        #[test]
        fn normalized_children_sum_to_100_when_outside_tolerance(
            probabilities in prop::collection::vec(0.0f64..=100.0, 1..8)
        ) {
            let mut children = children_with(&probabilities);
            let total: f64 = probabilities.iter().sum();

            normalize_probabilities(&mut children);
            let new_total: f64 = children.iter().map(|c| c.probability).sum();

            if total > 0.0 && (total - 100.0).abs() > NORMALIZATION_TOLERANCE {
                prop_assert!((new_total - 100.0).abs() < 1e-6);
            } else {
                prop_assert_eq!(new_total, total);
            }
        }

        #[test]
        fn normalized_probabilities_stay_in_range(
            probabilities in prop::collection::vec(0.0f64..=100.0, 1..8)
        ) {
            let mut children = children_with(&probabilities);
            normalize_probabilities(&mut children);
            for child in &children {
                prop_assert!((0.0..=100.0 + 1e-9).contains(&child.probability));
            }
        }

        #[test]
        fn normalization_preserves_relative_order(
            probabilities in prop::collection::vec(0.0f64..=100.0, 2..8)
        ) {
            let mut children = children_with(&probabilities);
            normalize_probabilities(&mut children);
            for i in 0..probabilities.len() {
                for j in 0..probabilities.len() {
                    if probabilities[i] < probabilities[j] {
                        prop_assert!(children[i].probability <= children[j].probability);
                    }
                }
            }
        }
    }
}
