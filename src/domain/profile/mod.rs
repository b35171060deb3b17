//! Profile module - the stored record of user attributes.
//!
//! The profile is background context for every analysis. Values arrive
//! loosely typed from the questionnaire and are coerced on the way in.

mod coercion;
mod profile;

pub use coercion::{coerce_bool, coerce_f64, coerce_string, coerce_string_list, coerce_u32};
pub use profile::{display_value, FieldUpdate, UserProfile, KNOWN_FIELDS};
