//! Probability trees: building from model JSON, fallback, layout and rendering.

mod builder;
mod errors;
mod fallback;
mod json_repair;
mod layout;
mod node;
pub mod prompt;
mod render;

pub use builder::{
    build_tree, normalize_probabilities, parse_tree, DEFAULT_PROBABILITY, NORMALIZATION_TOLERANCE,
};
pub use errors::TreeError;
pub use fallback::fallback_tree;
pub use json_repair::repair_json;
pub use layout::{NodePosition, TreeLayout};
pub use node::{Cost, DecisionNode, ResourceType};
pub use render::{render_summary, render_tree, to_json, to_yaml};
