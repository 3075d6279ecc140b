//! A single stopwatch record.
//!
//! Time is tracked as a committed `elapsed_ms` plus, while running, the
//! wall-clock instant (`last_update_ms`) at which that value was last
//! confirmed. Everything that advances time goes through [`TimerRecord::accrue`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label given to the timer in a fresh ledger.
pub const DEFAULT_FIRST_LABEL: &str = "First timer";

/// Stable identifier of a timer. Never reused while the record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for TimerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TimerId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecord {
    pub id: TimerId,
    pub label: String,
    pub is_running: bool,
    pub elapsed_ms: u64,
    /// Epoch milliseconds at which `elapsed_ms` was last exact.
    #[serde(
        default,
        rename = "lastUpdateTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_update_ms: Option<u64>,
}

impl TimerRecord {
    /// A stopped record with zero elapsed time.
    pub fn new(id: TimerId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            is_running: false,
            elapsed_ms: 0,
            last_update_ms: None,
        }
    }

    /// `"Timer <id>"`, used for new timers and blank labels.
    pub fn default_label(id: TimerId) -> String {
        format!("Timer {id}")
    }

    /// Elapsed time as of `now`, without mutating the record.
    pub fn elapsed_at(&self, now_ms: u64) -> u64 {
        match (self.is_running, self.last_update_ms) {
            (true, Some(last)) => self.elapsed_ms.saturating_add(now_ms.saturating_sub(last)),
            _ => self.elapsed_ms,
        }
    }

    pub(crate) fn start(&mut self, now_ms: u64) {
        self.is_running = true;
        self.last_update_ms = Some(now_ms);
    }

    pub(crate) fn pause(&mut self, now_ms: u64) {
        self.accrue(now_ms);
        self.is_running = false;
        self.last_update_ms = Some(now_ms);
    }

    pub(crate) fn reset(&mut self) {
        self.is_running = false;
        self.elapsed_ms = 0;
        self.last_update_ms = None;
    }

    /// Fold the time since `last_update_ms` into `elapsed_ms`.
    ///
    /// A running record with no timestamp starts accruing from `now`.
    /// A clock that went backwards adds nothing; the total saturates.
    pub(crate) fn accrue(&mut self, now_ms: u64) {
        if !self.is_running {
            return;
        }
        if let Some(last) = self.last_update_ms {
            self.elapsed_ms = self.elapsed_ms.saturating_add(now_ms.saturating_sub(last));
        }
        self.last_update_ms = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_at_projects_running_time() {
        let mut record = TimerRecord::new(TimerId(1), "a");
        record.elapsed_ms = 500;
        assert_eq!(record.elapsed_at(10_000), 500);

        record.start(1_000);
        assert_eq!(record.elapsed_at(1_250), 750);
    }

    #[test]
    fn pause_commits_exact_delta() {
        let mut record = TimerRecord::new(TimerId(1), "a");
        record.start(100);
        record.pause(1_100);
        assert!(!record.is_running);
        assert_eq!(record.elapsed_ms, 1_000);
        assert_eq!(record.last_update_ms, Some(1_100));
    }

    #[test]
    fn accrue_ignores_backwards_clock() {
        let mut record = TimerRecord::new(TimerId(1), "a");
        record.start(5_000);
        record.accrue(4_000);
        assert_eq!(record.elapsed_ms, 0);
        assert_eq!(record.last_update_ms, Some(4_000));
    }

    #[test]
    fn accrual_saturates() {
        let mut record = TimerRecord::new(TimerId(1), "a");
        record.elapsed_ms = u64::MAX - 10;
        record.start(0);
        assert_eq!(record.elapsed_at(1_000), u64::MAX);
        record.accrue(1_000);
        assert_eq!(record.elapsed_ms, u64::MAX);
        record.accrue(2_000);
        assert_eq!(record.elapsed_ms, u64::MAX);
    }

    #[test]
    fn serializes_camel_case_fields() {
        let mut record = TimerRecord::new(TimerId(2), "Tea");
        record.start(42);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["isRunning"], true);
        assert_eq!(json["elapsedMs"], 0);
        assert_eq!(json["lastUpdateTime"], 42);
    }

    #[test]
    fn parses_timer_id() {
        assert_eq!(" 7 ".parse::<TimerId>().unwrap(), TimerId(7));
        assert!("x".parse::<TimerId>().is_err());
    }
}
