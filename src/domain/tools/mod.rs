//! Pure evaluation behind the calculator and probability tools.

mod expression;
mod probability;

pub use expression::{evaluate, format_number, ExpressionError, MAX_NESTING};
pub use probability::{OutcomeCounts, ProbabilityError};
