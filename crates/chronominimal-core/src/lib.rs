//! # ChronoMinimal Core Library
//!
//! This library provides the state logic for ChronoMinimal, a multi-stopwatch
//! app. The CLI binary (one-shot commands and the interactive `watch` view)
//! is a thin host over the same core.
//!
//! ## Architecture
//!
//! - **Ledger**: ordered timer records and every mutation on them. Pure: the
//!   caller passes the current time in.
//! - **Frame loop**: per-frame accrual driver that stops itself when no timer
//!   runs
//! - **Persistence**: one JSON blob in a SQLite key-value table, written
//!   through a debouncer; TOML-based configuration
//! - **Controller**: single owner of ledger, presentation state, frame loop
//!   and persister
//!
//! ## Key Components
//!
//! - [`Ledger`]: timer collection and operations
//! - [`Controller`]: action/key routing and state ownership
//! - [`Database`]: key-value persistence
//! - [`Config`]: application configuration management

pub mod controller;
pub mod error;
pub mod events;
pub mod format;
pub mod frame_loop;
pub mod keymap;
pub mod ledger;
pub mod persist;
pub mod storage;

pub use controller::{Action, Controller, KeyOutcome, Snapshot, TimerView, ViewState};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use format::{format_elapsed, Elapsed};
pub use frame_loop::FrameLoop;
pub use keymap::{Command, Key, KeyCode, Keymap};
pub use ledger::{Ledger, TimerId, TimerRecord};
pub use persist::Persister;
pub use storage::{Config, Database, MemoryStore, PersistedState, StateStore, Theme, UiPrefs};

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
