//! AnswerSet - everything collected during one questionnaire run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::profile::{display_value, UserProfile};

/// Keys an extraction reply may use for free-form context.
const CONTEXT_KEYS: &[&str] = &["additional_context", "contexto_adicional"];

/// A question and the user's verbatim answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

impl QuestionAnswer {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Accumulated questionnaire state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerSet {
    /// Structured fields extracted so far.
    pub fields: BTreeMap<String, Value>,
    /// Free-form context, stored under numbered `context_N` slots.
    pub additional_context: BTreeMap<String, String>,
    /// Original question/answer pairs, in order.
    pub responses: Vec<QuestionAnswer>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True before the first answer has been recorded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.additional_context.is_empty() && self.responses.is_empty()
    }

    /// Number of questions answered so far.
    pub fn answered_count(&self) -> usize {
        self.responses.len()
    }

    /// Merges an extracted object.
    ///
    /// A free-form context entry goes into the next numbered slot; every
    /// other key overwrites the field of the same name.
    pub fn merge_extracted(&mut self, mut extracted: Map<String, Value>) {
        for key in CONTEXT_KEYS {
            if let Some(context) = extracted.remove(*key) {
                if context.is_null() {
                    continue;
                }
                let slot = format!("context_{}", self.additional_context.len());
                self.additional_context.insert(slot, display_value(&context));
            }
        }

        for (key, value) in extracted {
            if value.is_null() {
                continue;
            }
            self.fields.insert(key, value);
        }
    }

    /// Records the verbatim question and answer.
    pub fn record_response(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.responses.push(QuestionAnswer::new(question, answer));
    }

    /// Renders the collected information for the question prompt.
    pub fn summary_for_prompt(&self) -> String {
        if self.is_empty() {
            return "None (first question)".to_string();
        }

        let mut parts: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| format!("- {}: {}", key, display_value(value)))
            .collect();

        if !self.additional_context.is_empty() {
            parts.push("\nADDITIONAL CONTEXT:".to_string());
            for value in self.additional_context.values() {
                parts.push(format!("- {}", value));
            }
        }

        if !self.responses.is_empty() {
            parts.push("\nORIGINAL ANSWERS:".to_string());
            for (i, qa) in self.responses.iter().enumerate() {
                parts.push(format!("{}. Q: {}", i + 1, qa.question));
                parts.push(format!("   A: {}", qa.answer));
            }
        }

        parts.join("\n")
    }

    /// Builds the profile to persist.
    ///
    /// Fields are applied onto a fresh profile that keeps the creation time
    /// of `existing`. Context slots land in `additional_context`.
    pub fn to_profile(&self, existing: &UserProfile) -> UserProfile {
        let mut profile = UserProfile::new();
        profile.created_at = existing.created_at;

        for (key, value) in &self.fields {
            profile.apply_field(key, value.clone());
        }
        for (key, value) in &self.additional_context {
            profile
                .additional_context
                .insert(key.clone(), Value::String(value.clone()));
        }

        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn merge_moves_context_into_numbered_slots() {
        let mut answers = AnswerSet::new();
        answers.merge_extracted(object(json!({
            "age": 41,
            "additional_context": "works in IT"
        })));
        answers.merge_extracted(object(json!({
            "marital_status": "married",
            "contexto_adicional": "married for 10 years"
        })));

        assert_eq!(answers.fields.get("age"), Some(&json!(41)));
        assert_eq!(answers.fields.get("marital_status"), Some(&json!("married")));
        assert!(!answers.fields.contains_key("additional_context"));
        assert_eq!(
            answers.additional_context.get("context_0").map(String::as_str),
            Some("works in IT")
        );
        assert_eq!(
            answers.additional_context.get("context_1").map(String::as_str),
            Some("married for 10 years")
        );
    }

    #[test]
    fn later_values_overwrite_earlier_ones() {
        let mut answers = AnswerSet::new();
        answers.merge_extracted(object(json!({"occupation": "analyst"})));
        answers.merge_extracted(object(json!({"occupation": "data lead", "sex": null})));

        assert_eq!(answers.fields.get("occupation"), Some(&json!("data lead")));
        assert!(!answers.fields.contains_key("sex"));
    }

    #[test]
    fn summary_for_empty_set_marks_first_question() {
        assert_eq!(AnswerSet::new().summary_for_prompt(), "None (first question)");
    }

    #[test]
    fn summary_lists_fields_context_and_transcript() {
        let mut answers = AnswerSet::new();
        answers.merge_extracted(object(json!({"age": 35, "additional_context": "lives in Lima"})));
        answers.record_response("How old are you?", "35, I live in Lima");

        let summary = answers.summary_for_prompt();

        assert!(summary.contains("- age: 35"));
        assert!(summary.contains("ADDITIONAL CONTEXT:\n- lives in Lima"));
        assert!(summary.contains("1. Q: How old are you?"));
        assert!(summary.contains("   A: 35, I live in Lima"));
    }

    #[test]
    fn to_profile_maps_known_fields_and_keeps_created_at() {
        let existing = UserProfile::new();
        let mut answers = AnswerSet::new();
        answers.merge_extracted(object(json!({
            "age": "35",
            "illnesses": "asthma",
            "housing": "rented",
            "additional_context": "plans to move abroad"
        })));

        let profile = answers.to_profile(&existing);

        assert_eq!(profile.created_at, existing.created_at);
        assert_eq!(profile.age, Some(35));
        assert_eq!(profile.illnesses, vec!["asthma".to_string()]);
        assert_eq!(profile.additional_context.get("housing"), Some(&json!("rented")));
        assert_eq!(
            profile.additional_context.get("context_0"),
            Some(&json!("plans to move abroad"))
        );
    }
}
