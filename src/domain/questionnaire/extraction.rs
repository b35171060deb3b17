//! Turning free-text answers into structured fields.
//!
//! The primary path parses the extraction model's JSON reply. When that
//! fails, [`manual_extract`] applies keyword heuristics to the question and
//! answer text directly.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use thiserror::Error;

static FLAT_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]+\}").expect("valid object regex"));

static SHORT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,3})\b").expect("valid age regex"));

static WHOLE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+)\b").expect("valid count regex"));

static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("valid amount regex"));

/// Errors reading an extraction reply.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("invalid JSON in extraction reply: {0}")]
    InvalidJson(String),

    #[error("extraction reply is not a JSON object")]
    NotAnObject,
}

/// Strips code fences and isolates the first flat `{...}` object.
pub fn clean_extraction_reply(reply: &str) -> String {
    let trimmed = reply.trim();
    let unfenced = if trimmed.starts_with("```") {
        trimmed
            .trim_start_matches("```json")
            .replace("```", "")
            .trim()
            .to_string()
    } else {
        trimmed.to_string()
    };

    match FLAT_OBJECT.find(&unfenced) {
        Some(m) => m.as_str().to_string(),
        None => unfenced,
    }
}

/// Parses an extraction reply into a field map.
pub fn parse_extraction(reply: &str) -> Result<Map<String, Value>, ExtractionError> {
    let cleaned = clean_extraction_reply(reply);
    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ExtractionError::NotAnObject),
    }
}

/// Keyword heuristics used when the extraction reply is unusable.
///
/// The question decides which fields are looked for; the answer supplies
/// the values. English and Spanish keywords are both recognized.
pub fn manual_extract(question: &str, answer: &str) -> Map<String, Value> {
    let question = question.to_lowercase();
    let answer_lower = answer.to_lowercase();
    let mut result = Map::new();

    if has_any_word(&question, &["age", "old", "edad"]) {
        if let Some(age) = first_capture(&SHORT_NUMBER, answer).and_then(|s| s.parse::<u32>().ok()) {
            result.insert("age".to_string(), json!(age));
        }
    }

    if has_any_word(&question, &["sex", "gender", "sexo", "género", "genero"]) {
        let words: Vec<&str> = answer_lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
            .collect();
        if contains_any(&words, &["male", "man", "masculine", "masculino", "hombre", "m"]) {
            result.insert("sex".to_string(), json!("male"));
        } else if contains_any(&words, &["female", "woman", "feminine", "femenino", "mujer", "f"]) {
            result.insert("sex".to_string(), json!("female"));
        }
    }

    if question.contains("marital status")
        || question.contains("estado civil")
        || has_any_word(&question, &["married", "single", "casado", "casada"])
    {
        let status = if has_any_word(&answer_lower, &["married", "casado", "casada"]) {
            Some("married")
        } else if has_any_word(&answer_lower, &["single", "soltero", "soltera"]) {
            Some("single")
        } else if has_any_word(&answer_lower, &["divorced", "divorciado", "divorciada"]) {
            Some("divorced")
        } else if has_any_word(&answer_lower, &["widowed", "viudo", "viuda"]) {
            Some("widowed")
        } else {
            None
        };
        if let Some(status) = status {
            result.insert("marital_status".to_string(), json!(status));
        }
    }

    if has_any_word(&question, &["children", "kids", "child", "hijos", "niños"]) {
        if let Some(count) = first_capture(&WHOLE_NUMBER, answer).and_then(|s| s.parse::<u32>().ok()) {
            result.insert("number_of_children".to_string(), json!(count));
        } else if has_any_word(&answer_lower, &["no", "none", "ninguno", "ninguna"]) {
            result.insert("number_of_children".to_string(), json!(0));
        }
    }

    if has_any_word(
        &question,
        &["income", "salary", "earn", "ingreso", "ingresos", "salario", "sueldo"],
    ) {
        let without_separators = answer.replace(',', "");
        if let Some(amount) =
            first_capture(&AMOUNT, &without_separators).and_then(|s| s.parse::<f64>().ok())
        {
            result.insert("monthly_income".to_string(), json!(amount));
        }
    }

    result
}

fn has_any_word(text: &str, words: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| words.contains(&token))
}

fn contains_any(words: &[&str], list: &[&str]) -> bool {
    words.iter().any(|w| list.contains(w))
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
