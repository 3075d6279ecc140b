use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::TimerId;

/// Every settled ledger mutation produces an Event.
/// No-ops produce nothing, which is how callers tell the two apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerCreated {
        id: TimerId,
        label: String,
        at: DateTime<Utc>,
    },
    TimerRenamed {
        id: TimerId,
        label: String,
        at: DateTime<Utc>,
    },
    TimerStarted {
        id: TimerId,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        id: TimerId,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        id: TimerId,
        at: DateTime<Utc>,
    },
    TimerRemoved {
        id: TimerId,
        at: DateTime<Utc>,
    },
    TimersReordered {
        source: TimerId,
        target: TimerId,
        /// New index of `source` in the ordering.
        position: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The timer this event is about (the moved one for reorders).
    pub fn timer_id(&self) -> TimerId {
        match self {
            Event::TimerCreated { id, .. }
            | Event::TimerRenamed { id, .. }
            | Event::TimerStarted { id, .. }
            | Event::TimerPaused { id, .. }
            | Event::TimerReset { id, .. }
            | Event::TimerRemoved { id, .. } => *id,
            Event::TimersReordered { source, .. } => *source,
        }
    }
}

/// Convert an epoch-millisecond timestamp into a UTC datetime.
pub(crate) fn at(now_ms: u64) -> DateTime<Utc> {
    i64::try_from(now_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}
