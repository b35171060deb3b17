//! Local analysis built from recorded observations.
//!
//! Used when the model's final answer is too short to be useful: whatever
//! the tools returned during the run is assembled into a structured summary.

use once_cell::sync::Lazy;
use regex::Regex;

use super::decision_type::DecisionType;
use super::scratchpad::IntermediateStep;
use crate::domain::foundation::{truncate_chars, truncate_with_ellipsis};

static NUMERIC_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+(?:\.\d+)?(?:%|k|mil|millones|million)?").expect("valid numeric regex")
});

const SEARCH_TOOL: &str = "web_search";
const CALCULATOR_TOOL: &str = "calculator";

const OPPORTUNITY_WORDS: &[&str] = &[
    "benefit", "gain", "improve", "opportunit", "beneficio", "ganancia", "mejora", "oportunidad",
];
const RISK_WORDS: &[&str] = &[
    "risk", "cost", "loss", "problem", "riesgo", "costo", "pérdida", "problema",
];

/// Builds an analysis from the steps of an agent run.
pub fn summarize_observations(
    question: &str,
    steps: &[IntermediateStep],
    decision_type: DecisionType,
) -> String {
    let mut search_results = Vec::new();
    let mut calculations = Vec::new();
    let mut observations = Vec::new();

    for step in steps.iter().filter(|s| s.has_tool_output()) {
        observations.push(step.observation.as_str());
        match step.action.tool.as_str() {
            SEARCH_TOOL if step.observation.chars().count() > 50 => {
                search_results.push(truncate_chars(&step.observation, 500));
            }
            CALCULATOR_TOOL => calculations.push(step.observation.as_str()),
            _ => {}
        }
    }

    let mut parts = vec![format!("**Decision Analysis: {}**\n", question)];

    if !search_results.is_empty() {
        parts.push("**Information Found:**".to_string());
        for (i, result) in search_results.iter().take(3).enumerate() {
            let flattened = result.replace('\n', " ");
            parts.push(format!(
                "{}. {}",
                i + 1,
                truncate_with_ellipsis(flattened.trim(), 203)
            ));
        }
        parts.push(String::new());
    }

    if !calculations.is_empty() {
        parts.push("**Quantitative Analysis:**".to_string());
        for calc in calculations.iter().take(3) {
            parts.push(format!("- {}", calc));
        }
        parts.push(String::new());
    }

    parts.push(format!(
        "**Evaluation for {} Decision:**",
        capitalize(decision_type.as_str())
    ));

    if !observations.is_empty() {
        let combined = observations.join(" ").to_lowercase();

        if OPPORTUNITY_WORDS.iter().any(|w| combined.contains(w)) {
            parts.push("- Potential opportunities were identified in the analyzed data".to_string());
        }
        if RISK_WORDS.iter().any(|w| combined.contains(w)) {
            parts.push("- Risk factors that need consideration were detected".to_string());
        }

        let numbers: Vec<&str> = NUMERIC_VALUE
            .find_iter(&combined)
            .map(|m| m.as_str())
            .take(5)
            .collect();
        if !numbers.is_empty() {
            parts.push(format!(
                "- Relevant numeric values found: {}",
                numbers.join(", ")
            ));
        }
    }

    parts.push("\n**Recommendation:**".to_string());
    if search_results.is_empty() && calculations.is_empty() {
        parts.push(
            "More specific information is needed to give a detailed recommendation. \
             Consider gathering concrete data on costs, benefits and similar experiences."
                .to_string(),
        );
    } else {
        parts.push(
            "Based on the information gathered, this decision requires carefully weighing \
             the specific data found. Consider both the quantitative and qualitative aspects \
             before proceeding."
                .to_string(),
        );
    }

    parts.join("\n")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::react::AgentAction;
    use crate::domain::agent::scratchpad::Scratchpad;

    fn step(tool: &str, observation: &str) -> IntermediateStep {
        IntermediateStep::new(AgentAction::new(tool, "input", "log"), observation)
    }

    #[test]
    fn includes_search_results_and_calculations() {
        let long_result = format!(
            "SUMMARY: Data leads in Lima earn 15% more.\n{}",
            "Salary surveys show a clear benefit for senior roles. ".repeat(3)
        );
        let steps = vec![
            step("web_search", &long_result),
            step("calculator", "Result: 15.38"),
            step("web_search", "too short"),
        ];

        let analysis = summarize_observations("Change jobs?", &steps, DecisionType::Career);

        assert!(analysis.starts_with("**Decision Analysis: Change jobs?**"));
        assert!(analysis.contains("**Information Found:**\n1. SUMMARY: Data leads"));
        assert!(!analysis.contains("2. too short"));
        assert!(analysis.contains("**Quantitative Analysis:**\n- Result: 15.38"));
        assert!(analysis.contains("**Evaluation for Career Decision:**"));
        assert!(analysis.contains("Potential opportunities were identified"));
        assert!(analysis.contains("Relevant numeric values found: 15%"));
        assert!(analysis.contains("Based on the information gathered"));
    }

    #[test]
    fn search_snippets_are_flattened_and_truncated() {
        let long_result = format!("line one\nline two {}", "x".repeat(400));
        let steps = vec![step("web_search", &long_result)];

        let analysis = summarize_observations("Q", &steps, DecisionType::General);
        let line = analysis
            .lines()
            .find(|l| l.starts_with("1. "))
            .unwrap();

        assert!(line.contains("line one line two"));
        assert!(line.ends_with("..."));
        assert_eq!(line.chars().count(), 3 + 203);
    }

    #[test]
    fn without_data_recommends_gathering_more() {
        let analysis = summarize_observations("Q", &[], DecisionType::General);
        assert!(analysis.contains("More specific information is needed"));
        assert!(!analysis.contains("Information Found"));
    }

    #[test]
    fn rejected_steps_are_not_reported_as_data() {
        let search = "SUMMARY: Rent in Lima averages 2000 PEN per month for a \
                      two-bedroom apartment in a central district.";
        let mut pad = Scratchpad::new();
        pad.record_execution(AgentAction::new("web_search", "rent Lima", "log"), search);
        pad.record_rejection(
            AgentAction::new("web_search", "rent  lima", "log"),
            "LOOP DETECTED: You are repeating the same action.\n1. Change your search\n2. Use 3 tools",
        );
        pad.record_rejection(
            AgentAction::new("calculator_pro", "1 + 1", "log"),
            "calculator_pro is not a valid tool, try one of [calculator].",
        );

        let analysis = summarize_observations("Move?", pad.steps(), DecisionType::Personal);

        assert!(analysis.contains("1. SUMMARY: Rent in Lima"));
        assert!(!analysis.contains("LOOP DETECTED"));
        assert!(!analysis.contains("2. "));
        assert!(!analysis.contains("not a valid tool"));
        assert!(analysis.contains("Relevant numeric values found: 2000"));
        assert!(!analysis.contains("2000, 1"));
    }

    #[test]
    fn only_rejected_steps_means_no_data() {
        let mut pad = Scratchpad::new();
        pad.record_rejection(
            AgentAction::new("web_search", "x", "log"),
            "LOOP DETECTED: 1. Change your search 2. risk",
        );

        let analysis = summarize_observations("Q", pad.steps(), DecisionType::General);

        assert!(!analysis.contains("Information Found"));
        assert!(!analysis.contains("Risk factors"));
        assert!(analysis.contains("More specific information is needed"));
    }

    #[test]
    fn exception_steps_are_ignored() {
        let exception = step("_Exception", "risk 99");
        let analysis = summarize_observations("Q", &[exception], DecisionType::General);
        assert!(!analysis.contains("99"));
    }
}
