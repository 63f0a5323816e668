//! Identification and category fetchers.

pub mod categories;
pub mod identify;
pub mod itinerary;

pub use identify::{Acceptance, ConfidenceGate};
