//! Per-frame accrual driver.
//!
//! While armed, every scheduler pulse ticks the ledger. The loop disarms
//! itself on the first pulse that finds nothing running and must be
//! re-armed explicitly when a timer starts again. Accrual always uses each
//! record's own `last_update_ms`, so stopping and restarting the loop can
//! neither lose nor double count time.

use crate::ledger::Ledger;

#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    armed: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Arm if anything is running. Idempotent. Returns the armed state.
    pub fn arm(&mut self, ledger: &Ledger) -> bool {
        if !self.armed && ledger.has_running() {
            self.armed = true;
        }
        self.armed
    }

    /// Handle one scheduler pulse. Returns whether another pulse is wanted.
    pub fn pulse(&mut self, ledger: &mut Ledger, now_ms: u64) -> bool {
        if !self.armed {
            return false;
        }
        if !ledger.tick(now_ms) {
            self.armed = false;
        }
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TimerId;

    #[test]
    fn stays_disarmed_when_idle() {
        let mut ledger = Ledger::default();
        let mut frames = FrameLoop::new();
        assert!(!frames.arm(&ledger));
        assert!(!frames.pulse(&mut ledger, 100));
        assert!(!frames.is_armed());
    }

    #[test]
    fn disarms_once_nothing_runs() {
        let mut ledger = Ledger::default();
        let mut frames = FrameLoop::new();
        let id = TimerId(1);

        ledger.toggle_running(id, 0);
        assert!(frames.arm(&ledger));
        assert!(frames.arm(&ledger));
        assert!(frames.pulse(&mut ledger, 16));
        assert!(frames.pulse(&mut ledger, 32));

        ledger.toggle_running(id, 40);
        assert!(!frames.pulse(&mut ledger, 48));
        assert!(!frames.is_armed());
        assert_eq!(ledger.get(id).unwrap().elapsed_ms, 40);
    }

    #[test]
    fn restart_does_not_double_count() {
        let mut ledger = Ledger::default();
        let mut frames = FrameLoop::new();
        let id = TimerId(1);

        ledger.toggle_running(id, 0);
        frames.arm(&ledger);
        frames.pulse(&mut ledger, 100);
        ledger.toggle_running(id, 150);
        frames.pulse(&mut ledger, 200);
        assert!(!frames.is_armed());

        // Idle gap of 10s is not counted.
        ledger.toggle_running(id, 10_200);
        frames.arm(&ledger);
        frames.pulse(&mut ledger, 10_300);
        frames.pulse(&mut ledger, 10_300);
        ledger.toggle_running(id, 10_350);

        assert_eq!(ledger.get(id).unwrap().elapsed_ms, 300);
    }
}
