use crate::events::Event;
use crate::keymap::Command;
use crate::ledger::TimerId;

/// Everything a user (or host) can ask the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddTimer,
    Toggle(TimerId),
    ToggleActive,
    Reset(TimerId),
    ResetActive,
    Remove(TimerId),
    RemoveActive,
    /// Set and commit a label in one step.
    Rename(TimerId, String),
    BeginRename,
    EditInput(char),
    EditBackspace,
    CommitRename,
    Select(TimerId),
    SelectPrev,
    SelectNext,
    Reorder { source: TimerId, target: TimerId },
    ReorderActiveUp,
    ReorderActiveDown,
    DragStart(TimerId),
    DragOver(TimerId),
    Drop,
    ToggleMenu,
    ToggleZen,
    ToggleFocus,
    ToggleTheme,
    Escape,
    /// Host notification that fullscreen was entered or left.
    FullscreenChanged(bool),
}

impl Action {
    /// The action a keymap command maps to. `Quit` and `ToggleFullscreen`
    /// are handled by the host and have none.
    pub fn from_command(command: Command) -> Option<Self> {
        let action = match command {
            Command::NewTimer => Action::AddTimer,
            Command::ToggleActive => Action::ToggleActive,
            Command::DeleteActive => Action::RemoveActive,
            Command::ResetActive => Action::ResetActive,
            Command::RenameActive => Action::BeginRename,
            Command::SelectPrev => Action::SelectPrev,
            Command::SelectNext => Action::SelectNext,
            Command::ReorderUp => Action::ReorderActiveUp,
            Command::ReorderDown => Action::ReorderActiveDown,
            Command::ToggleMenu => Action::ToggleMenu,
            Command::ToggleFocus => Action::ToggleFocus,
            Command::ToggleZen => Action::ToggleZen,
            Command::ToggleTheme => Action::ToggleTheme,
            Command::Escape => Action::Escape,
            Command::ToggleFullscreen | Command::Quit => return None,
        };
        Some(action)
    }
}

/// Result of feeding a key press to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Not bound to anything.
    Ignored,
    /// Handled; carries the ledger event if the press mutated a timer.
    Handled(Option<Event>),
    /// The host should ask for fullscreen to be entered (`true`) or left,
    /// then report back with [`Action::FullscreenChanged`].
    RequestFullscreen(bool),
    Quit,
}
