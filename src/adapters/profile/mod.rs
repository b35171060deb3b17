//! Profile storage adapters

mod gcs;
mod in_memory;
mod local_file;

pub use gcs::{GcsConfig, GcsProfileStorage};
pub use in_memory::InMemoryProfileStorage;
pub use local_file::LocalProfileStorage;
