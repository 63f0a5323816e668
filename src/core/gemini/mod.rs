//! Gemini endpoint access: client, error taxonomy, retry wrapper, and the
//! backend seam the fetchers call through.

pub mod client;
pub mod error;
pub mod json;
pub mod retry;

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;

pub use client::{Citation, GeminiClient, GenerateReply, GenerateRequest, InlineImage};
pub use error::{GeminiError, Result};
pub use json::extract_json;
pub use retry::{with_retry, RetryPolicy};

/// Seam between the content fetchers and the AI endpoint.
///
/// Implementations must be safe for concurrent invocation; the dashboard
/// orchestrator shares one instance across independently spawned fetches.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateReply>;
}

static GLOBAL: OnceLock<Arc<GeminiClient>> = OnceLock::new();

/// Install the process-wide client. Returns the client back if one was
/// already installed.
pub fn init_global(client: GeminiClient) -> std::result::Result<(), GeminiClient> {
    let mut rejected = None;
    let client_arc = Arc::new(client);
    let installed = GLOBAL.get_or_init(|| client_arc.clone());
    if !Arc::ptr_eq(installed, &client_arc) {
        rejected = Arc::into_inner(client_arc);
    }
    match rejected {
        Some(client) => Err(client),
        None => Ok(()),
    }
}

/// The process-wide client, if [`init_global`] has run.
pub fn global() -> Option<Arc<GeminiClient>> {
    GLOBAL.get().cloned()
}
