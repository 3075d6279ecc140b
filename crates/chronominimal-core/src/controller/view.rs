//! Presentation state owned by the controller.
//!
//! None of this touches timer data; it only decides how the ledger is
//! shown and which timer keyboard commands apply to.

use serde::Serialize;

use crate::ledger::TimerId;
use crate::storage::{Theme, UiPrefs};

/// An in-progress label edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditState {
    pub id: TimerId,
    pub buffer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Timer keyboard commands act on.
    pub active: Option<TimerId>,
    /// Timer shown enlarged in focus mode.
    pub focused: Option<TimerId>,
    pub zen: bool,
    /// Mirrors the host's actual fullscreen state; only changed through
    /// the host's change notification.
    pub fullscreen: bool,
    pub menu_open: bool,
    pub theme: Theme,
    /// Timer being dragged, if a drag is in progress.
    pub drag_source: Option<TimerId>,
    pub editing: Option<EditState>,
}

impl ViewState {
    pub fn from_prefs(prefs: &UiPrefs) -> Self {
        Self {
            theme: prefs.theme,
            zen: prefs.zen_mode,
            ..Self::default()
        }
    }

    pub fn prefs(&self) -> UiPrefs {
        UiPrefs {
            theme: self.theme,
            zen_mode: self.zen,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Whether chrome (headers, hints) should be hidden.
    pub fn hides_chrome(&self) -> bool {
        self.zen || self.fullscreen
    }
}
