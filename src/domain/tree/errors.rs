//! Errors building a decision tree from model output.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TreeError {
    #[error("no JSON object found in tree response")]
    NoJsonObject,

    #[error("invalid tree JSON: {0}")]
    InvalidJson(String),

    #[error("tree node must be a JSON object")]
    NotAnObject,

    #[error("node '{id}' has probability {probability}, expected 0..=100")]
    ProbabilityOutOfRange { id: String, probability: f64 },

    #[error("failed to export tree: {0}")]
    Export(String),
}
