pub mod content;
pub mod fetch;
pub mod gemini;
pub mod logging;
pub mod session;
