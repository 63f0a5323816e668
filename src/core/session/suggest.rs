//! Debounce bookkeeping for the search-suggestion sub-flow.
//!
//! Every keystroke takes a ticket; a ticket is only still current if no
//! later edit happened. The waiting itself (`tokio::time::sleep` for the
//! window) lives with the spawned task; this type just decides which edit
//! survives the quiet period and lets late completions be discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct EditDebouncer {
    seq: AtomicU64,
    window: Duration,
}

impl EditDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            seq: AtomicU64::new(0),
            window,
        }
    }

    /// Quiet period an edit must survive before its fetch fires.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Register an edit, superseding all earlier tickets.
    pub fn begin(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` is still the latest edit.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == ticket
    }

    /// Invalidate every outstanding ticket (session reset).
    pub fn invalidate(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_edits_supersede_earlier_tickets() {
        let debouncer = EditDebouncer::new(Duration::from_millis(500));
        let first = debouncer.begin();
        assert!(debouncer.is_current(first));

        let second = debouncer.begin();
        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));
    }

    #[test]
    fn invalidate_cancels_the_latest_ticket() {
        let debouncer = EditDebouncer::new(Duration::from_millis(500));
        let ticket = debouncer.begin();
        debouncer.invalidate();
        assert!(!debouncer.is_current(ticket));
    }
}
