//! Light repair of model-produced JSON.

use once_cell::sync::Lazy;
use regex::Regex;

use super::TreeError;

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```json\s*").expect("valid json fence regex"));

static BARE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```\s*").expect("valid fence regex"));

/// Strips code fences and returns the outermost `{ ... }` span.
pub fn repair_json(text: &str) -> Result<String, TreeError> {
    let without_json_fence = JSON_FENCE.replace_all(text.trim(), "");
    let unfenced = BARE_FENCE.replace_all(&without_json_fence, "");

    let start = unfenced.find('{').ok_or(TreeError::NoJsonObject)?;
    let end = unfenced.rfind('}').ok_or(TreeError::NoJsonObject)?;
    if end < start {
        return Err(TreeError::NoJsonObject);
    }

    Ok(unfenced[start..=end].to_string())
}
