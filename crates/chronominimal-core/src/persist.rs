//! Debounced persistence.
//!
//! Mutations mark the state dirty; the write happens once no further
//! mutation has arrived for the configured delay. The host polls
//! [`Persister::flush_if_due`] from its event loop and calls
//! [`Persister::flush`] on teardown. Write failures are logged and dropped:
//! in-memory state is the source of truth.

use tracing::{debug, warn};

use crate::storage::{encode_state, PersistedState, StateStore};

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct Persister {
    delay_ms: u64,
    /// Deadline (epoch ms) of the pending write.
    due_at_ms: Option<u64>,
}

impl Default for Persister {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl Persister {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            due_at_ms: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.due_at_ms.is_some()
    }

    /// Deadline of the pending write, if any.
    pub fn due_at(&self) -> Option<u64> {
        self.due_at_ms
    }

    /// Schedule a write `delay` after `now`, superseding any earlier one.
    pub fn mark_dirty(&mut self, now_ms: u64) {
        self.due_at_ms = Some(now_ms.saturating_add(self.delay_ms));
    }

    /// Drop the pending write without performing it.
    pub fn cancel(&mut self) {
        self.due_at_ms = None;
    }

    /// Write if the deadline has passed. Returns whether a write was attempted.
    pub fn flush_if_due<S: StateStore + ?Sized>(
        &mut self,
        now_ms: u64,
        store: &mut S,
        state: &PersistedState,
    ) -> bool {
        match self.due_at_ms {
            Some(due) if now_ms >= due => self.flush(store, state),
            _ => false,
        }
    }

    /// Write immediately if anything is pending. Returns whether a write was
    /// attempted.
    pub fn flush<S: StateStore + ?Sized>(&mut self, store: &mut S, state: &PersistedState) -> bool {
        if self.due_at_ms.take().is_none() {
            return false;
        }
        write(store, state);
        true
    }
}

/// Encode and store, logging instead of failing.
fn write<S: StateStore + ?Sized>(store: &mut S, state: &PersistedState) {
    let blob = match encode_state(state) {
        Ok(blob) => blob,
        Err(e) => {
            warn!(error = %e, "failed to encode timer state");
            return;
        }
    };
    match store.save(&blob) {
        Ok(()) => debug!(timers = state.timers.len(), "timer state saved"),
        Err(e) => warn!(error = %e, "failed to save timer state"),
    }
}
