//! The single owner of application state.
//!
//! A [`Controller`] holds the ledger, the presentation state, the frame
//! loop, the debounced persister and the backing store. Hosts (the CLI
//! one-shot commands, the interactive view) feed it [`Action`]s or key
//! presses and drive it with the current time; nothing else mutates timer
//! data.
//!
//! ## Host loop
//!
//! ```ignore
//! let mut ctl = Controller::load(Database::open()?, &config, now_ms());
//! loop {
//!     // on key:   ctl.handle_key(key, now_ms())
//!     // on frame: if ctl.wants_frames() { ctl.frame(now_ms()); }
//!     ctl.poll_persist(now_ms());
//! }
//! ctl.shutdown();
//! ```

mod action;
mod view;

pub use action::{Action, KeyOutcome};
pub use view::{EditState, ViewState};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::events::{self, Event};
use crate::format::format_elapsed;
use crate::frame_loop::FrameLoop;
use crate::keymap::{Command, Key, KeyCode, Keymap};
use crate::ledger::{Ledger, TimerId};
use crate::persist::Persister;
use crate::storage::{decode_state, Config, PersistedState, StateStore};

/// One timer as presented to a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub id: TimerId,
    pub label: String,
    pub is_running: bool,
    pub elapsed_ms: u64,
    pub display: String,
    pub active: bool,
    pub focused: bool,
}

/// Full presentation snapshot at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub timers: Vec<TimerView>,
    pub view: ViewState,
    pub at: DateTime<Utc>,
}

pub struct Controller<S: StateStore> {
    ledger: Ledger,
    view: ViewState,
    frames: FrameLoop,
    persister: Persister,
    keymap: Keymap,
    store: S,
}

impl<S: StateStore> Controller<S> {
    /// Load state from `store`, correcting running timers for drift.
    ///
    /// A failing read is logged and treated like an empty store.
    pub fn load(store: S, config: &Config, now_ms: u64) -> Self {
        let raw = match store.load() {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to read stored timers, starting fresh");
                None
            }
        };
        let stored = raw.is_some();
        let state = decode_state(raw.as_deref());
        let mut view = ViewState::from_prefs(&state.prefs);
        if !stored {
            view.theme = config.ui.theme;
        }

        let ledger = Ledger::resume_from_persisted(state.timers, now_ms);
        view.active = ledger.iter().next().map(|t| t.id);
        debug!(timers = ledger.count(), running = ledger.has_running(), "timer state loaded");

        let mut frames = FrameLoop::new();
        frames.arm(&ledger);

        Self {
            ledger,
            view,
            frames,
            persister: Persister::new(config.persistence.debounce_ms),
            keymap: Keymap::from_config(&config.shortcuts),
            store,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_dirty(&self) -> bool {
        self.persister.is_dirty()
    }

    /// Deadline of the pending debounced write, if any.
    pub fn persist_due_at(&self) -> Option<u64> {
        self.persister.due_at()
    }

    /// The active timer, falling back to the first one.
    pub fn active_id(&self) -> TimerId {
        self.view
            .active
            .filter(|id| self.ledger.get(*id).is_some())
            .or_else(|| self.ledger.iter().next().map(|t| t.id))
            .unwrap_or(TimerId(1))
    }

    /// Whether the host should keep issuing frame pulses.
    pub fn wants_frames(&self) -> bool {
        self.frames.is_armed()
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState::new(&self.ledger, self.view.prefs())
    }

    pub fn snapshot(&self, now_ms: u64) -> Snapshot {
        let active = self.active_id();
        let timers = self
            .ledger
            .iter()
            .map(|t| {
                let elapsed_ms = t.elapsed_at(now_ms);
                TimerView {
                    id: t.id,
                    label: t.label.clone(),
                    is_running: t.is_running,
                    elapsed_ms,
                    display: format_elapsed(elapsed_ms),
                    active: t.id == active,
                    focused: self.view.focused == Some(t.id),
                }
            })
            .collect();
        Snapshot {
            timers,
            view: self.view.clone(),
            at: events::at(now_ms),
        }
    }

    // ── Driving ──────────────────────────────────────────────────────

    /// One frame pulse. Returns whether another frame is wanted.
    pub fn frame(&mut self, now_ms: u64) -> bool {
        self.frames.pulse(&mut self.ledger, now_ms)
    }

    /// Perform the debounced write if it is due.
    pub fn poll_persist(&mut self, now_ms: u64) -> bool {
        let state = self.persisted_state();
        self.persister.flush_if_due(now_ms, &mut self.store, &state)
    }

    /// Write any pending state now. Call on teardown.
    pub fn shutdown(&mut self) {
        let state = self.persisted_state();
        if self.persister.flush(&mut self.store, &state) {
            debug!("flushed timer state on shutdown");
        }
    }

    /// Drop a pending write without performing it.
    pub fn discard_pending(&mut self) {
        self.persister.cancel();
    }

    /// Feed a key press.
    pub fn handle_key(&mut self, key: Key, now_ms: u64) -> KeyOutcome {
        if self.view.is_editing() && !key.ctrl {
            let action = match key.code {
                KeyCode::Enter | KeyCode::Esc => Action::CommitRename,
                KeyCode::Backspace => Action::EditBackspace,
                KeyCode::Space => Action::EditInput(' '),
                KeyCode::Char(c) => Action::EditInput(c),
                _ => return KeyOutcome::Ignored,
            };
            return KeyOutcome::Handled(self.dispatch(action, now_ms));
        }

        let Some(command) = self.keymap.lookup(&key) else {
            return KeyOutcome::Ignored;
        };
        match command {
            Command::Quit => KeyOutcome::Quit,
            Command::ToggleFullscreen => KeyOutcome::RequestFullscreen(!self.view.fullscreen),
            other => match Action::from_command(other) {
                Some(action) => KeyOutcome::Handled(self.dispatch(action, now_ms)),
                None => KeyOutcome::Ignored,
            },
        }
    }

    /// Apply an action. Returns the ledger event when timer data changed.
    pub fn dispatch(&mut self, action: Action, now_ms: u64) -> Option<Event> {
        let prefs_before = self.view.prefs();
        let event = self.apply(action, now_ms);

        if let Some(removed) = event.as_ref().and_then(removed_id) {
            self.forget(removed);
        }
        if event.is_some() || self.view.prefs() != prefs_before {
            self.persister.mark_dirty(now_ms);
        }
        self.frames.arm(&self.ledger);
        event
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(&mut self, action: Action, now_ms: u64) -> Option<Event> {
        let active = self.active_id();
        match action {
            Action::AddTimer => {
                let event = self.ledger.create_event(now_ms);
                self.view.active = Some(event.timer_id());
                Some(event)
            }
            Action::Toggle(id) => self.ledger.toggle_running(id, now_ms),
            Action::ToggleActive => self.ledger.toggle_running(active, now_ms),
            Action::Reset(id) => self.ledger.reset(id, now_ms),
            Action::ResetActive => self.ledger.reset(active, now_ms),
            Action::Remove(id) => self.remove(id, now_ms),
            Action::RemoveActive => self.remove(active, now_ms),
            Action::Rename(id, text) => {
                let renamed = self.ledger.rename(id, &text, now_ms);
                self.ledger.commit_label(id, now_ms).or(renamed)
            }
            Action::BeginRename => {
                let label = self.ledger.get(active)?.label.clone();
                self.view.editing = Some(EditState {
                    id: active,
                    buffer: label,
                });
                None
            }
            Action::EditInput(c) => {
                let edit = self.view.editing.as_mut()?;
                edit.buffer.push(c);
                let (id, buffer) = (edit.id, edit.buffer.clone());
                self.ledger.rename(id, &buffer, now_ms)
            }
            Action::EditBackspace => {
                let edit = self.view.editing.as_mut()?;
                edit.buffer.pop()?;
                let (id, buffer) = (edit.id, edit.buffer.clone());
                self.ledger.rename(id, &buffer, now_ms)
            }
            Action::CommitRename => {
                let edit = self.view.editing.take()?;
                self.ledger.commit_label(edit.id, now_ms)
            }
            Action::Select(id) => {
                if self.ledger.get(id).is_some() {
                    self.view.active = Some(id);
                }
                None
            }
            Action::SelectPrev => {
                self.select_offset(-1);
                None
            }
            Action::SelectNext => {
                self.select_offset(1);
                None
            }
            Action::Reorder { source, target } => self.ledger.reorder(source, target, now_ms),
            Action::ReorderActiveUp => self.ledger.move_by(active, -1, now_ms),
            Action::ReorderActiveDown => self.ledger.move_by(active, 1, now_ms),
            Action::DragStart(id) => {
                if self.ledger.get(id).is_some() {
                    self.view.drag_source = Some(id);
                }
                None
            }
            Action::DragOver(target) => {
                let source = self.view.drag_source?;
                self.ledger.reorder(source, target, now_ms)
            }
            Action::Drop => {
                self.view.drag_source = None;
                None
            }
            Action::ToggleMenu => {
                self.view.menu_open = !self.view.menu_open;
                None
            }
            Action::ToggleZen => {
                self.view.zen = !self.view.zen;
                None
            }
            Action::ToggleFocus => {
                self.view.focused = match self.view.focused {
                    Some(_) => None,
                    None => Some(active),
                };
                None
            }
            Action::ToggleTheme => {
                self.view.theme = self.view.theme.toggled();
                None
            }
            Action::Escape => {
                if let Some(edit) = self.view.editing.take() {
                    self.ledger.commit_label(edit.id, now_ms)
                } else if self.view.menu_open {
                    self.view.menu_open = false;
                    None
                } else {
                    self.view.focused = None;
                    None
                }
            }
            Action::FullscreenChanged(active) => {
                self.view.fullscreen = active;
                None
            }
        }
    }

    fn remove(&mut self, id: TimerId, now_ms: u64) -> Option<Event> {
        let index = self.ledger.index_of(id)?;
        let event = self.ledger.remove(id, now_ms)?;
        if self.view.active == Some(id) || self.view.active.is_none() {
            let next = index.min(self.ledger.count().saturating_sub(1));
            self.view.active = self.ledger.records().get(next).map(|t| t.id);
        }
        Some(event)
    }

    /// Clear presentation references to a deleted timer.
    fn forget(&mut self, id: TimerId) {
        if self.view.focused == Some(id) {
            self.view.focused = None;
        }
        if self.view.drag_source == Some(id) {
            self.view.drag_source = None;
        }
        if self.view.editing.as_ref().is_some_and(|e| e.id == id) {
            self.view.editing = None;
        }
    }

    fn select_offset(&mut self, offset: isize) {
        let Some(index) = self.ledger.index_of(self.active_id()) else {
            return;
        };
        if let Some(next) = index
            .checked_add_signed(offset)
            .and_then(|i| self.ledger.records().get(i))
        {
            self.view.active = Some(next.id);
        }
    }
}

fn removed_id(event: &Event) -> Option<TimerId> {
    match event {
        Event::TimerRemoved { id, .. } => Some(*id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{encode_state, MemoryStore, Theme, UiPrefs, MAX_STORED_INTEGER};
    use crate::ledger::TimerRecord;

    fn controller() -> Controller<MemoryStore> {
        Controller::load(MemoryStore::new(), &Config::default(), 0)
    }

    fn ids(ctl: &Controller<MemoryStore>) -> Vec<u64> {
        ctl.ledger().iter().map(|t| t.id.0).collect()
    }

    #[test]
    fn empty_store_yields_default_timer() {
        let ctl = controller();
        assert_eq!(ids(&ctl), vec![1]);
        assert_eq!(ctl.active_id(), TimerId(1));
        assert!(!ctl.wants_frames());
        assert!(!ctl.is_dirty());
    }

    #[test]
    fn unreadable_store_starts_fresh() {
        let store = MemoryStore {
            fail_reads: true,
            ..MemoryStore::default()
        };
        let ctl = Controller::load(store, &Config::default(), 0);
        assert_eq!(ctl.ledger(), &Ledger::default());
    }

    #[test]
    fn load_resumes_running_timers() {
        let t = 1_000_000;
        let state = PersistedState {
            timers: vec![TimerRecord {
                id: TimerId(2),
                label: "Bread".into(),
                is_running: true,
                elapsed_ms: 5_000,
                last_update_ms: Some(t),
            }],
            prefs: UiPrefs {
                theme: Theme::Light,
                zen_mode: true,
            },
        };
        let store = MemoryStore::with_value(encode_state(&state).unwrap());
        let ctl = Controller::load(store, &Config::default(), t + 3_000);

        let timer = ctl.ledger().get(TimerId(2)).unwrap();
        assert_eq!(timer.elapsed_ms, 8_000);
        assert_eq!(timer.last_update_ms, Some(t + 3_000));
        assert!(ctl.wants_frames());
        assert_eq!(ctl.view().theme, Theme::Light);
        assert!(ctl.view().zen);
    }

    #[test]
    fn config_theme_applies_only_without_stored_state() {
        let mut config = Config::default();
        config.ui.theme = Theme::Light;
        let ctl = Controller::load(MemoryStore::new(), &config, 0);
        assert_eq!(ctl.view().theme, Theme::Light);

        let stored = encode_state(&PersistedState::default()).unwrap();
        let ctl = Controller::load(MemoryStore::with_value(stored), &config, 0);
        assert_eq!(ctl.view().theme, Theme::Dark);
    }

    #[test]
    fn mutations_are_debounced_into_one_write() {
        let mut ctl = controller();
        ctl.dispatch(Action::AddTimer, 0);
        ctl.dispatch(Action::AddTimer, 100);
        ctl.dispatch(Action::ToggleActive, 200);
        assert!(!ctl.poll_persist(600));
        assert!(ctl.poll_persist(700));
        assert_eq!(ctl.store().writes, 1);

        let stored = decode_state(ctl.store().value.as_deref());
        assert_eq!(stored.timers.len(), 3);
        assert!(stored.timers[2].is_running);
    }

    #[test]
    fn noops_do_not_schedule_writes() {
        let mut ctl = controller();
        assert!(ctl.dispatch(Action::RemoveActive, 0).is_none());
        assert!(ctl.dispatch(Action::Toggle(TimerId(9)), 0).is_none());
        ctl.dispatch(Action::SelectNext, 0);
        ctl.dispatch(Action::ToggleMenu, 0);
        assert!(!ctl.is_dirty());
    }

    #[test]
    fn prefs_changes_are_persisted() {
        let mut ctl = controller();
        ctl.dispatch(Action::ToggleTheme, 0);
        ctl.dispatch(Action::ToggleZen, 0);
        assert!(ctl.is_dirty());
        ctl.shutdown();

        let stored = decode_state(ctl.store().value.as_deref());
        assert_eq!(stored.prefs.theme, Theme::Light);
        assert!(stored.prefs.zen_mode);
    }

    #[test]
    fn frames_follow_running_state() {
        let mut ctl = controller();
        ctl.dispatch(Action::ToggleActive, 0);
        assert!(ctl.wants_frames());
        assert!(ctl.frame(1_000));
        assert_eq!(ctl.ledger().get(TimerId(1)).unwrap().elapsed_ms, 1_000);

        ctl.dispatch(Action::ToggleActive, 1_500);
        assert!(ctl.wants_frames());
        assert!(!ctl.frame(1_516));
        assert!(!ctl.wants_frames());
        assert_eq!(ctl.ledger().get(TimerId(1)).unwrap().elapsed_ms, 1_500);
    }

    #[test]
    fn selection_moves_and_clamps() {
        let mut ctl = controller();
        ctl.dispatch(Action::AddTimer, 0);
        ctl.dispatch(Action::AddTimer, 0);
        assert_eq!(ctl.active_id(), TimerId(3));

        ctl.dispatch(Action::SelectNext, 0);
        assert_eq!(ctl.active_id(), TimerId(3));
        ctl.dispatch(Action::SelectPrev, 0);
        ctl.dispatch(Action::SelectPrev, 0);
        ctl.dispatch(Action::SelectPrev, 0);
        assert_eq!(ctl.active_id(), TimerId(1));
    }

    #[test]
    fn removing_active_selects_neighbour_and_clears_focus() {
        let mut ctl = controller();
        ctl.dispatch(Action::AddTimer, 0);
        ctl.dispatch(Action::AddTimer, 0);
        ctl.dispatch(Action::Select(TimerId(2)), 0);
        ctl.dispatch(Action::ToggleFocus, 0);
        assert_eq!(ctl.view().focused, Some(TimerId(2)));

        assert!(ctl.dispatch(Action::RemoveActive, 0).is_some());
        assert_eq!(ids(&ctl), vec![1, 3]);
        assert_eq!(ctl.active_id(), TimerId(3));
        assert_eq!(ctl.view().focused, None);

        ctl.dispatch(Action::RemoveActive, 0);
        assert_eq!(ctl.active_id(), TimerId(1));
        assert!(ctl.dispatch(Action::RemoveActive, 0).is_none());
        assert_eq!(ids(&ctl), vec![1]);
    }

    #[test]
    fn keyboard_reorder_moves_active() {
        let mut ctl = controller();
        ctl.dispatch(Action::AddTimer, 0);
        ctl.dispatch(Action::AddTimer, 0);
        ctl.dispatch(Action::ReorderActiveUp, 0);
        assert_eq!(ids(&ctl), vec![1, 3, 2]);
        ctl.dispatch(Action::ReorderActiveUp, 0);
        assert_eq!(ids(&ctl), vec![3, 1, 2]);
        assert!(ctl.dispatch(Action::ReorderActiveUp, 0).is_none());
        ctl.dispatch(Action::ReorderActiveDown, 0);
        assert_eq!(ids(&ctl), vec![1, 3, 2]);
    }

    #[test]
    fn drag_reorders_while_hovering() {
        let mut ctl = controller();
        ctl.dispatch(Action::AddTimer, 0);
        ctl.dispatch(Action::AddTimer, 0);

        assert!(ctl.dispatch(Action::DragOver(TimerId(2)), 0).is_none());
        ctl.dispatch(Action::DragStart(TimerId(1)), 0);
        ctl.dispatch(Action::DragOver(TimerId(2)), 0);
        ctl.dispatch(Action::DragOver(TimerId(3)), 0);
        assert_eq!(ids(&ctl), vec![2, 3, 1]);
        assert!(ctl.dispatch(Action::DragOver(TimerId(1)), 0).is_none());

        ctl.dispatch(Action::Drop, 0);
        assert_eq!(ctl.view().drag_source, None);
    }

    #[test]
    fn rename_via_keys_commits_blank_to_default() {
        let mut ctl = controller();
        ctl.handle_key(Key::char('e'), 0);
        assert!(ctl.view().is_editing());

        for _ in 0.."First timer".len() {
            ctl.handle_key(Key::new(KeyCode::Backspace), 0);
        }
        assert_eq!(ctl.ledger().get(TimerId(1)).unwrap().label, "");

        // Bound keys type text while editing.
        ctl.handle_key(Key::char('n'), 0);
        ctl.handle_key(Key::char(' '), 0);
        assert_eq!(ctl.ledger().get(TimerId(1)).unwrap().label, "n ");
        assert_eq!(ids(&ctl), vec![1]);

        ctl.handle_key(Key::new(KeyCode::Backspace), 0);
        ctl.handle_key(Key::new(KeyCode::Backspace), 0);
        let outcome = ctl.handle_key(Key::new(KeyCode::Enter), 0);
        assert!(matches!(
            outcome,
            KeyOutcome::Handled(Some(Event::TimerRenamed { .. }))
        ));
        assert!(!ctl.view().is_editing());
        assert_eq!(ctl.ledger().get(TimerId(1)).unwrap().label, "Timer 1");
    }

    #[test]
    fn rename_action_sets_and_commits() {
        let mut ctl = controller();
        let event = ctl.dispatch(Action::Rename(TimerId(1), "Eggs".into()), 0);
        assert!(matches!(event, Some(Event::TimerRenamed { ref label, .. }) if label == "Eggs"));

        let event = ctl.dispatch(Action::Rename(TimerId(1), "  ".into()), 0);
        assert!(matches!(event, Some(Event::TimerRenamed { ref label, .. }) if label == "Timer 1"));
    }

    #[test]
    fn escape_priority() {
        let mut ctl = controller();
        ctl.dispatch(Action::ToggleFocus, 0);
        ctl.dispatch(Action::ToggleMenu, 0);
        ctl.dispatch(Action::BeginRename, 0);

        ctl.dispatch(Action::Escape, 0);
        assert!(!ctl.view().is_editing());
        assert!(ctl.view().menu_open);

        ctl.dispatch(Action::Escape, 0);
        assert!(!ctl.view().menu_open);
        assert_eq!(ctl.view().focused, Some(TimerId(1)));

        ctl.dispatch(Action::Escape, 0);
        assert_eq!(ctl.view().focused, None);
    }

    #[test]
    fn fullscreen_is_reconciled_through_callback() {
        let mut ctl = controller();
        let outcome = ctl.handle_key(Key::char('F'), 0);
        assert_eq!(outcome, KeyOutcome::RequestFullscreen(true));
        assert!(!ctl.view().fullscreen);

        ctl.dispatch(Action::FullscreenChanged(true), 0);
        assert!(ctl.view().fullscreen);
        assert!(ctl.view().hides_chrome());
        assert_eq!(ctl.handle_key(Key::char('F'), 0), KeyOutcome::RequestFullscreen(false));
    }

    #[test]
    fn quit_and_unbound_keys() {
        let mut ctl = controller();
        assert_eq!(ctl.handle_key(Key::char('q'), 0), KeyOutcome::Quit);
        assert_eq!(ctl.handle_key(Key::ctrl('c'), 0), KeyOutcome::Quit);
        assert_eq!(ctl.handle_key(Key::char('~'), 0), KeyOutcome::Ignored);
    }

    #[test]
    fn snapshot_projects_running_time() {
        let mut ctl = controller();
        ctl.dispatch(Action::ToggleActive, 1_000);
        let snap = ctl.snapshot(62_000);
        assert_eq!(snap.timers.len(), 1);
        let view = &snap.timers[0];
        assert!(view.is_running);
        assert!(view.active);
        assert_eq!(view.elapsed_ms, 61_000);
        assert_eq!(view.display, "01:01.00");
    }

    #[test]
    fn oversized_stored_values_load_safely() {
        let blob = r#"[{"id":18446744073709551615,"isRunning":true,"elapsedMs":1e30,"lastUpdateTime":0}]"#;
        let mut ctl = Controller::load(MemoryStore::with_value(blob), &Config::default(), 1_000);
        assert_eq!(ctl.active_id(), TimerId(1));
        assert_eq!(ctl.ledger().get(TimerId(1)).unwrap().elapsed_ms, MAX_STORED_INTEGER + 1_000);
        assert!(ctl.frame(2_000));
        assert_eq!(ctl.snapshot(3_000).timers[0].elapsed_ms, MAX_STORED_INTEGER + 3_000);
        assert!(ctl.dispatch(Action::AddTimer, 3_000).is_some());
    }

    #[test]
    fn huge_debounce_does_not_overflow() {
        let mut config = Config::default();
        config.persistence.debounce_ms = u64::MAX;
        let mut ctl = Controller::load(MemoryStore::new(), &config, 0);
        ctl.dispatch(Action::AddTimer, 5);
        assert!(!ctl.poll_persist(10_000));
        ctl.shutdown();
        assert_eq!(ctl.store().writes, 1);
    }

    #[test]
    fn snapshot_json_uses_camel_case() {
        let ctl = controller();
        let json = serde_json::to_value(ctl.snapshot(0)).unwrap();
        let timer = &json["timers"][0];
        assert_eq!(timer["isRunning"], false);
        assert_eq!(timer["elapsedMs"], 0);
        assert!(timer.get("is_running").is_none());
        assert_eq!(json["view"]["menuOpen"], false);
    }

    #[test]
    fn discard_pending_skips_write() {
        let mut ctl = controller();
        ctl.dispatch(Action::AddTimer, 0);
        ctl.discard_pending();
        ctl.shutdown();
        assert_eq!(ctl.store().writes, 0);
    }
}
