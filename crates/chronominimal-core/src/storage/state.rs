//! Persisted-state codec.
//!
//! The stored blob is JSON:
//!
//! ```json
//! { "timers": [ { "id": 1, "label": "Tea", "isRunning": false, "elapsedMs": 0 } ],
//!   "prefs":  { "theme": "dark", "zenMode": false } }
//! ```
//!
//! Older blobs are a bare `timers` array. Decoding never fails: every field
//! is coerced to a safe default, and an unusable blob yields the default
//! ledger.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;
use crate::ledger::{Ledger, TimerId, TimerRecord};

/// Key under which the blob is stored.
pub const STORAGE_KEY: &str = "chrono-minimal-timers-v1";

/// Label substituted for a record whose label is missing or not a string.
const FALLBACK_LABEL: &str = "Timer";

/// Largest integer a JSON number carries exactly (2^53 - 1). Stored ids
/// above it are invalid; stored times are clamped to it.
pub const MAX_STORED_INTEGER: u64 = (1 << 53) - 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Presentation preferences stored next to the timers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPrefs {
    pub theme: Theme,
    pub zen_mode: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub timers: Vec<TimerRecord>,
    pub prefs: UiPrefs,
}

impl PersistedState {
    pub fn new(ledger: &Ledger, prefs: UiPrefs) -> Self {
        Self {
            timers: ledger.records().to_vec(),
            prefs,
        }
    }
}

/// Serialize state to the stored JSON form.
///
/// # Errors
/// Returns an error only if serde_json fails, which plain records never do.
pub fn encode_state(state: &PersistedState) -> Result<String> {
    Ok(serde_json::to_string(state)?)
}

/// Decode a stored blob, tolerating anything.
///
/// `None`, unparsable JSON and an empty timer list all produce the default
/// ledger's records.
pub fn decode_state(raw: Option<&str>) -> PersistedState {
    let Some(raw) = raw else {
        return fallback(UiPrefs::default());
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "stored timer state is not valid JSON, using defaults");
            return fallback(UiPrefs::default());
        }
    };

    let (items, prefs) = match &value {
        Value::Array(items) => (items.as_slice(), UiPrefs::default()),
        Value::Object(obj) => {
            let items = obj
                .get("timers")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            (items, coerce_prefs(obj.get("prefs")))
        }
        _ => {
            warn!("stored timer state has unexpected shape, using defaults");
            return fallback(UiPrefs::default());
        }
    };

    let timers = coerce_records(items);
    if timers.is_empty() {
        return fallback(prefs);
    }
    PersistedState { timers, prefs }
}

fn fallback(prefs: UiPrefs) -> PersistedState {
    PersistedState {
        timers: Ledger::default().records().to_vec(),
        prefs,
    }
}

fn coerce_prefs(value: Option<&Value>) -> UiPrefs {
    let Some(Value::Object(obj)) = value else {
        return UiPrefs::default();
    };
    UiPrefs {
        theme: obj
            .get("theme")
            .and_then(Value::as_str)
            .and_then(Theme::parse)
            .unwrap_or_default(),
        zen_mode: obj.get("zenMode").and_then(Value::as_bool).unwrap_or(false),
    }
}

/// Coerce each item field by field. Missing, invalid or duplicate ids are
/// replaced by fresh ids above every valid one, in order of appearance.
fn coerce_records(items: &[Value]) -> Vec<TimerRecord> {
    let empty = Map::new();
    let mut seen = HashSet::new();

    let mut partial: Vec<(Option<TimerId>, TimerRecord)> = items
        .iter()
        .map(|item| {
            let obj = item.as_object().unwrap_or(&empty);
            let id = obj
                .get("id")
                .and_then(as_whole_number)
                .filter(|id| (1..=MAX_STORED_INTEGER).contains(id))
                .map(TimerId)
                .filter(|id| seen.insert(*id));
            let record = TimerRecord {
                id: TimerId(0),
                label: obj
                    .get("label")
                    .and_then(Value::as_str)
                    .unwrap_or(FALLBACK_LABEL)
                    .to_string(),
                is_running: obj.get("isRunning").and_then(Value::as_bool).unwrap_or(false),
                elapsed_ms: obj.get("elapsedMs").and_then(as_stored_time).unwrap_or(0),
                last_update_ms: obj.get("lastUpdateTime").and_then(as_stored_time),
            };
            (id, record)
        })
        .collect();

    let mut next = seen.iter().map(|id| id.0).max().unwrap_or(0).saturating_add(1);
    for (id, record) in &mut partial {
        record.id = match id {
            Some(id) => *id,
            None => {
                let fresh = TimerId(next);
                next = next.saturating_add(1);
                warn!(id = %fresh, "stored timer had no usable id, assigned a fresh one");
                fresh
            }
        };
    }

    partial.into_iter().map(|(_, record)| record).collect()
}

/// Non-negative finite number, floored.
fn as_whole_number(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.is_finite() && f >= 0.0).then(|| f.floor() as u64)
}

fn as_stored_time(value: &Value) -> Option<u64> {
    as_whole_number(value).map(|n| n.min(MAX_STORED_INTEGER))
}
