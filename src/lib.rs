//! Tripsight - AI travel discovery engine.
//!
//! Core library providing landmark identification (from a photo or a text
//! query) and concurrent assembly of a travel dashboard: history, nearby
//! places, culture, live events, logistics, itineraries, and on-demand deep
//! dives, all backed by the Gemini `generateContent` API.
//!
//! Rendering, file handling, and export formats live in host applications;
//! this crate owns the data-acquisition orchestration layer only.

pub mod config;
pub mod core;

pub use crate::core::gemini::{GeminiClient, GeminiError, GenerativeBackend};
pub use crate::core::session::{SessionEvent, SessionPhase, TravelSession};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
