//! Simple favorable/total probability.

use serde_json::Value;
use thiserror::Error;

use crate::domain::profile::coerce_f64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbabilityError {
    #[error("expected favorable and total outcomes as JSON, \"a, b\" or \"a/b\", got '{0}'")]
    InvalidInput(String),

    #[error("total outcomes must be greater than 0")]
    NonPositiveTotal,
}

/// Favorable and total outcome counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeCounts {
    pub favorable: f64,
    pub total: f64,
}

impl OutcomeCounts {
    /// Parses `{"favorable_outcomes": a, "total_outcomes": b}`, `a, b` or `a/b`.
    pub fn parse(input: &str) -> Result<Self, ProbabilityError> {
        let trimmed = input.trim();
        let invalid = || ProbabilityError::InvalidInput(trimmed.to_string());

        if trimmed.starts_with('{') {
            let value: Value = serde_json::from_str(trimmed).map_err(|_| invalid())?;
            let favorable = value.get("favorable_outcomes").and_then(coerce_f64);
            let total = value.get("total_outcomes").and_then(coerce_f64);
            return match (favorable, total) {
                (Some(favorable), Some(total)) => Ok(Self { favorable, total }),
                _ => Err(invalid()),
            };
        }

        let (a, b) = trimmed
            .split_once(',')
            .or_else(|| trimmed.split_once('/'))
            .ok_or_else(invalid)?;
        let favorable = a.trim().parse::<f64>().map_err(|_| invalid())?;
        let total = b.trim().parse::<f64>().map_err(|_| invalid())?;
        Ok(Self { favorable, total })
    }

    /// Probability in percent.
    pub fn percent(&self) -> Result<f64, ProbabilityError> {
        if self.total <= 0.0 {
            return Err(ProbabilityError::NonPositiveTotal);
        }
        Ok(self.favorable / self.total * 100.0)
    }
}
