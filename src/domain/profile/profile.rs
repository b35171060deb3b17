//! UserProfile - flat record of user attributes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::coercion::{coerce_bool, coerce_f64, coerce_string, coerce_string_list, coerce_u32};
use crate::domain::foundation::{Locale, Timestamp};

/// Names of the attributes with a dedicated field on [`UserProfile`].
///
/// Anything else collected about the user lives in `additional_context`.
pub const KNOWN_FIELDS: &[&str] = &[
    "age",
    "sex",
    "marital_status",
    "number_of_children",
    "occupation",
    "monthly_income",
    "years_of_experience",
    "weight_kg",
    "height_cm",
    "illnesses",
    "parents_alive",
    "dietary_preferences",
];

/// The stored record of user attributes.
///
/// Persisted as a single JSON document; every attribute is optional so a
/// partially completed questionnaire still yields a valid profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,

    // Basic information
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub number_of_children: Option<u32>,

    // Professional information
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub years_of_experience: Option<u32>,

    // Health
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub illnesses: Vec<String>,

    // Family
    #[serde(default)]
    pub parents_alive: Option<bool>,

    // Preferences
    #[serde(default)]
    pub dietary_preferences: Vec<String>,

    /// Free-form facts that have no dedicated field.
    #[serde(default)]
    pub additional_context: BTreeMap<String, Value>,
}

/// Outcome of applying a single named value to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Stored in the dedicated attribute.
    Known,
    /// Stored under `additional_context`.
    Additional,
}

impl Default for UserProfile {
    fn default() -> Self {
        let now = Timestamp::now();
        Self {
            created_at: now,
            updated_at: now,
            age: None,
            sex: None,
            marital_status: None,
            number_of_children: None,
            occupation: None,
            monthly_income: None,
            years_of_experience: None,
            weight_kg: None,
            height_cm: None,
            illnesses: Vec::new(),
            parents_alive: None,
            dietary_preferences: Vec::new(),
            additional_context: BTreeMap::new(),
        }
    }
}

impl UserProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when enough has been collected to skip the questionnaire.
    pub fn has_data(&self) -> bool {
        self.age.is_some()
            || self.occupation.is_some()
            || self.marital_status.is_some()
            || !self.additional_context.is_empty()
    }

    /// Marks the profile as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    /// Applies a named value, coercing it to the attribute's type.
    ///
    /// Unknown names, and known names whose value cannot be coerced, are
    /// kept verbatim in `additional_context`.
    pub fn apply_field(&mut self, name: &str, value: Value) -> FieldUpdate {
        let applied = match name {
            "age" => coerce_u32(&value).map(|v| self.age = Some(v)),
            "sex" => coerce_string(&value).map(|v| self.sex = Some(v)),
            "marital_status" => coerce_string(&value).map(|v| self.marital_status = Some(v)),
            "number_of_children" => {
                coerce_u32(&value).map(|v| self.number_of_children = Some(v))
            }
            "occupation" => coerce_string(&value).map(|v| self.occupation = Some(v)),
            "monthly_income" => coerce_f64(&value).map(|v| self.monthly_income = Some(v)),
            "years_of_experience" => {
                coerce_u32(&value).map(|v| self.years_of_experience = Some(v))
            }
            "weight_kg" => coerce_f64(&value).map(|v| self.weight_kg = Some(v)),
            "height_cm" => coerce_f64(&value).map(|v| self.height_cm = Some(v)),
            "illnesses" => coerce_string_list(&value).map(|v| self.illnesses = v),
            "parents_alive" => coerce_bool(&value).map(|v| self.parents_alive = Some(v)),
            "dietary_preferences" => {
                coerce_string_list(&value).map(|v| self.dietary_preferences = v)
            }
            _ => None,
        };

        match applied {
            Some(()) => FieldUpdate::Known,
            None => {
                if KNOWN_FIELDS.contains(&name) {
                    tracing::debug!(field = name, %value, "Could not coerce profile value, keeping as context");
                }
                self.additional_context.insert(name.to_string(), value);
                FieldUpdate::Additional
            }
        }
    }

    /// Renders the profile as background context for prompts.
    pub fn to_context_string(&self, locale: &Locale) -> String {
        let mut parts = vec![
            format!("LOCATION: {}", locale.country),
            format!("CURRENCY: {}", locale.currency),
            String::new(),
        ];

        if let Some(age) = self.age.filter(|a| *a > 0) {
            parts.push(format!("Age: {} years", age));
        }
        if let Some(ref sex) = self.sex {
            parts.push(format!("Sex: {}", sex));
        }
        if let Some(ref status) = self.marital_status {
            parts.push(format!("Marital status: {}", status));
        }
        if let Some(children) = self.number_of_children.filter(|c| *c > 0) {
            parts.push(format!("Children: {}", children));
        }
        if let Some(ref occupation) = self.occupation {
            parts.push(format!("Occupation: {}", occupation));
        }
        if let Some(income) = self.monthly_income.filter(|i| *i > 0.0) {
            parts.push(format!("Monthly income: {} {}", income, locale.currency));
        }
        if let Some(years) = self.years_of_experience.filter(|y| *y > 0) {
            parts.push(format!("Years of experience: {}", years));
        }
        if let Some(weight) = self.weight_kg.filter(|w| *w > 0.0) {
            parts.push(format!("Weight: {} kg", weight));
        }
        if let Some(height) = self.height_cm.filter(|h| *h > 0.0) {
            parts.push(format!("Height: {} cm", height));
        }
        if !self.illnesses.is_empty() {
            parts.push(format!("Illnesses: {}", self.illnesses.join(", ")));
        }
        if let Some(alive) = self.parents_alive {
            parts.push(format!("Parents alive: {}", if alive { "Yes" } else { "No" }));
        }
        if !self.dietary_preferences.is_empty() {
            parts.push(format!(
                "Dietary preferences: {}",
                self.dietary_preferences.join(", ")
            ));
        }

        for (key, value) in &self.additional_context {
            parts.push(format!("{}: {}", key, display_value(value)));
        }

        parts.join("\n")
    }
}

/// Strings render bare; everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
