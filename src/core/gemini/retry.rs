//! Retry with exponential backoff for rate-limited calls.
//!
//! Only failures classified by [`GeminiError::is_rate_limit`] are retried;
//! everything else propagates after a single attempt. The delay only suspends
//! the calling task — concurrent fetches on the same runtime are unaffected.

use std::future::Future;
use std::time::Duration;

use super::error::{GeminiError, Result};

/// Bounded exponential backoff: `max_retries` additional attempts, starting
/// at `initial_delay` and doubling each time.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
        }
    }

    /// Policy that never retries. Used where a caller wants the raw error.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
        }
    }
}

/// Run `operation`, retrying rate-limited failures per `policy`.
///
/// The error returned after the final attempt is the underlying
/// [`GeminiError`], never a wrapper.
pub async fn with_retry<T, F, Fut>(mut operation: F, policy: RetryPolicy) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retries = policy.max_retries;
    let mut delay = policy.initial_delay;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if retries > 0 && e.is_rate_limit() => {
                log::warn!("Rate limit hit, retrying in {delay:?} ({retries} attempts left): {e}");
                tokio::time::sleep(delay).await;
                retries -= 1;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
