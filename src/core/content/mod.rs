//! Content data model, response schema registry, and payload normalization.

pub mod normalize;
pub mod schema;
pub mod types;

pub use types::*;
