//! Minimal tree used when the model cannot produce one.

use super::{Cost, DecisionNode, ResourceType};
use crate::domain::agent::DecisionType;
use crate::domain::foundation::{truncate_chars, Locale};

const QUESTION_LIMIT: usize = 100;

/// Builds a two-option placeholder tree for `question`.
pub fn fallback_tree(question: &str, decision_type: DecisionType, locale: &Locale) -> DecisionNode {
    let mut shown = truncate_chars(question, QUESTION_LIMIT).to_string();
    if question.chars().count() > QUESTION_LIMIT {
        shown.push_str("...");
    }

    let mut root = DecisionNode::leaf("root", format!("Decision: {}", shown), 100.0, 0)
        .with_reasoning(format!("Analysis of a {} decision", decision_type));
    root.costs = vec![
        Cost::new(ResourceType::Time, 0.0, "", "To be determined"),
        Cost::new(ResourceType::Money, 0.0, locale.currency.clone(), "To be calculated"),
    ];
    root.benefits = vec![Cost::new(
        ResourceType::Opportunity,
        0.0,
        "%",
        "Potential to be evaluated",
    )];
    root.children = vec![
        DecisionNode::leaf("opt1", "Proceed with the decision", 50.0, 1)
            .with_reasoning("Main option"),
        DecisionNode::leaf("opt2", "Do not proceed or look for alternatives", 50.0, 1)
            .with_reasoning("Alternative option"),
    ];
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_root_and_two_even_options() {
        let tree = fallback_tree("Should I buy a car?", DecisionType::Financial, &Locale::default());

        assert_eq!(tree.description, "Decision: Should I buy a car?");
        assert_eq!(tree.probability, 100.0);
        assert_eq!(tree.costs.len(), 2);
        assert_eq!(tree.costs[1].unit, "PEN");
        assert_eq!(tree.benefits[0].resource_type, ResourceType::Opportunity);
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children_probability_total(), 100.0);
        assert_eq!(tree.children[1].description, "Do not proceed or look for alternatives");
        assert_eq!(tree.reasoning.as_deref(), Some("Analysis of a financial decision"));
    }

    #[test]
    fn long_question_is_truncated_to_100_chars_plus_ellipsis() {
        let question = "q".repeat(150);
        let tree = fallback_tree(&question, DecisionType::General, &Locale::default());
        assert_eq!(tree.description, format!("Decision: {}...", "q".repeat(100)));
    }
}
