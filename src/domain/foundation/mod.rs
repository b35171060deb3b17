//! Foundation module - Shared domain primitives.
//!
//! Contains value objects and text helpers used across the profile,
//! questionnaire, agent and tree modules.

mod locale;
mod text;
mod timestamp;

pub use locale::Locale;
pub use text::{truncate_chars, truncate_with_ellipsis};
pub use timestamp::Timestamp;
