//! Locale the analyses are grounded in (country and currency).

use serde::{Deserialize, Serialize};

/// Country and currency used to ground prompts and monetary values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locale {
    /// Country the user lives in (e.g., "Peru").
    pub country: String,
    /// ISO currency code for monetary amounts (e.g., "PEN").
    pub currency: String,
}

impl Locale {
    /// Creates a new locale.
    pub fn new(country: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            currency: currency.into(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("Peru", "PEN")
    }
}
