//! Timer ledger implementation.
//!
//! The ledger is an ordered collection of [`TimerRecord`]s and the only
//! place they are mutated. It does not read the clock: every operation that
//! depends on time takes `now_ms` (epoch milliseconds) from the caller.
//!
//! ## Usage
//!
//! ```ignore
//! let mut ledger = Ledger::default();
//! let id = ledger.create(now_ms());
//! ledger.toggle_running(id, now_ms());
//! // Once per frame while anything runs:
//! ledger.tick(now_ms());
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::record::{TimerId, TimerRecord, DEFAULT_FIRST_LABEL};
use crate::events::{at, Event};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    timers: Vec<TimerRecord>,
}

impl Default for Ledger {
    /// A single stopped timer with id 1.
    fn default() -> Self {
        Self {
            timers: vec![TimerRecord::new(TimerId(1), DEFAULT_FIRST_LABEL)],
        }
    }
}

impl Ledger {
    /// A ledger with no timers. Only useful as a starting point for
    /// [`Ledger::create`]; loaded ledgers always hold at least one record.
    pub fn empty() -> Self {
        Self { timers: Vec::new() }
    }

    /// Build a ledger from already-decoded records, falling back to the
    /// default ledger when there are none.
    pub fn from_records(records: Vec<TimerRecord>) -> Self {
        if records.is_empty() {
            Self::default()
        } else {
            Self { timers: records }
        }
    }

    /// Rebuild a ledger from persisted records, correcting running timers
    /// for the time that passed while nothing was ticking them.
    pub fn resume_from_persisted(records: Vec<TimerRecord>, now_ms: u64) -> Self {
        let mut ledger = Self::from_records(records);
        for timer in &mut ledger.timers {
            if timer.is_running {
                if let Some(last) = timer.last_update_ms {
                    let drift = now_ms.saturating_sub(last);
                    timer.elapsed_ms = timer.elapsed_ms.saturating_add(drift);
                    timer.last_update_ms = Some(now_ms);
                    debug!(id = %timer.id, drift_ms = drift, "resumed running timer");
                }
            }
        }
        ledger
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Number of timers.
    pub fn count(&self) -> usize {
        self.timers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimerRecord> {
        self.timers.iter()
    }

    pub fn records(&self) -> &[TimerRecord] {
        &self.timers
    }

    pub fn ids(&self) -> Vec<TimerId> {
        self.timers.iter().map(|t| t.id).collect()
    }

    pub fn get(&self, id: TimerId) -> Option<&TimerRecord> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn index_of(&self, id: TimerId) -> Option<usize> {
        self.timers.iter().position(|t| t.id == id)
    }

    pub fn has_running(&self) -> bool {
        self.timers.iter().any(|t| t.is_running)
    }

    /// Elapsed time of `id` as of `now`, including un-ticked running time.
    pub fn elapsed_at(&self, id: TimerId, now_ms: u64) -> Option<u64> {
        self.get(id).map(|t| t.elapsed_at(now_ms))
    }

    /// One greater than the largest id, or 1 for an empty ledger. If the
    /// largest id is `u64::MAX`, the smallest unused id instead.
    pub fn next_id(&self) -> TimerId {
        let max = self.timers.iter().map(|t| t.id.0).max().unwrap_or(0);
        match max.checked_add(1) {
            Some(next) => TimerId(next),
            None => TimerId((1..).find(|n| self.get(TimerId(*n)).is_none()).unwrap_or(1)),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a stopped timer and return its id.
    pub fn create(&mut self, now_ms: u64) -> TimerId {
        self.create_event(now_ms).timer_id()
    }

    /// Like [`Ledger::create`], returning the creation event.
    pub fn create_event(&mut self, now_ms: u64) -> Event {
        let id = self.next_id();
        let label = TimerRecord::default_label(id);
        self.timers.push(TimerRecord::new(id, label.clone()));
        Event::TimerCreated {
            id,
            label,
            at: at(now_ms),
        }
    }

    /// Set the label verbatim. Blank labels are allowed until
    /// [`Ledger::commit_label`] runs.
    pub fn rename(&mut self, id: TimerId, text: &str, now_ms: u64) -> Option<Event> {
        let timer = self.get_mut(id)?;
        if timer.label == text {
            return None;
        }
        timer.label = text.to_string();
        Some(Event::TimerRenamed {
            id,
            label: timer.label.clone(),
            at: at(now_ms),
        })
    }

    /// Replace a blank label with `"Timer <id>"`.
    pub fn commit_label(&mut self, id: TimerId, now_ms: u64) -> Option<Event> {
        let timer = self.get_mut(id)?;
        if !timer.label.trim().is_empty() {
            return None;
        }
        timer.label = TimerRecord::default_label(id);
        Some(Event::TimerRenamed {
            id,
            label: timer.label.clone(),
            at: at(now_ms),
        })
    }

    pub fn toggle_running(&mut self, id: TimerId, now_ms: u64) -> Option<Event> {
        let timer = self.get_mut(id)?;
        if timer.is_running {
            timer.pause(now_ms);
            Some(Event::TimerPaused {
                id,
                elapsed_ms: timer.elapsed_ms,
                at: at(now_ms),
            })
        } else {
            timer.start(now_ms);
            Some(Event::TimerStarted {
                id,
                elapsed_ms: timer.elapsed_ms,
                at: at(now_ms),
            })
        }
    }

    pub fn reset(&mut self, id: TimerId, now_ms: u64) -> Option<Event> {
        let timer = self.get_mut(id)?;
        timer.reset();
        Some(Event::TimerReset { id, at: at(now_ms) })
    }

    /// Delete a timer. The sole remaining timer cannot be deleted.
    pub fn remove(&mut self, id: TimerId, now_ms: u64) -> Option<Event> {
        if self.timers.len() <= 1 {
            debug!(%id, "refusing to remove the last timer");
            return None;
        }
        let index = self.index_of(id)?;
        self.timers.remove(index);
        Some(Event::TimerRemoved { id, at: at(now_ms) })
    }

    /// Move `source` to the position currently held by `target`, shifting
    /// the records in between.
    pub fn reorder(&mut self, source: TimerId, target: TimerId, now_ms: u64) -> Option<Event> {
        if source == target {
            return None;
        }
        let from = self.index_of(source)?;
        let to = self.index_of(target)?;
        let moved = self.timers.remove(from);
        self.timers.insert(to, moved);
        Some(Event::TimersReordered {
            source,
            target,
            position: to,
            at: at(now_ms),
        })
    }

    /// Move a timer `offset` places (negative is towards the head).
    /// No-op when the destination is outside the ledger.
    pub fn move_by(&mut self, id: TimerId, offset: isize, now_ms: u64) -> Option<Event> {
        let from = self.index_of(id)?;
        let to = from.checked_add_signed(offset)?;
        let target = self.timers.get(to)?.id;
        self.reorder(id, target, now_ms)
    }

    /// Advance every running timer to `now`. Returns whether any timer is
    /// still running, i.e. whether the caller should keep ticking.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let mut running = false;
        for timer in self.timers.iter_mut().filter(|t| t.is_running) {
            timer.accrue(now_ms);
            running = true;
        }
        running
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn get_mut(&mut self, id: TimerId) -> Option<&mut TimerRecord> {
        self.timers.iter_mut().find(|t| t.id == id)
    }
}
