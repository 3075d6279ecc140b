//! Keyboard shortcuts.
//!
//! Keys are described by short binding strings (`"n"`, `"space"`,
//! `"shift+up"`, `"ctrl+c"`). A [`Keymap`] resolves a pressed [`Key`] to a
//! [`Command`]; overrides from [`ShortcutsConfig`] replace a command's
//! default keys.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::error::ValidationError;
use crate::storage::ShortcutsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Space,
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

/// A key press. Character keys carry their case in the character itself,
/// so `shift` is only meaningful for non-character keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub shift: bool,
    pub ctrl: bool,
}

impl Key {
    pub fn new(code: KeyCode) -> Self {
        Self::with_modifiers(code, false, false)
    }

    /// Build a normalized key: `' '` becomes [`KeyCode::Space`] and shift is
    /// dropped for characters.
    pub fn with_modifiers(code: KeyCode, shift: bool, ctrl: bool) -> Self {
        let code = match code {
            KeyCode::Char(' ') => KeyCode::Space,
            other => other,
        };
        let shift = shift && !matches!(code, KeyCode::Char(_));
        Self { code, shift, ctrl }
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> Self {
        Self::with_modifiers(KeyCode::Char(c), false, true)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::with_modifiers(code, true, false)
    }

    /// Parse a binding string such as `"shift+down"` or `"K"`.
    pub fn parse(binding: &str) -> Result<Self, ValidationError> {
        let invalid = |message: &str| ValidationError::InvalidBinding {
            binding: binding.to_string(),
            message: message.to_string(),
        };

        let trimmed = binding.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty binding"));
        }

        let mut shift = false;
        let mut ctrl = false;
        let mut parts: Vec<&str> = trimmed.split('+').collect();
        // A trailing "+" means the plus key itself.
        if trimmed.ends_with('+') && parts.len() > 1 {
            parts.pop();
            parts.pop();
            parts.push("+");
        }
        let (key_part, modifiers) = parts.split_last().ok_or_else(|| invalid("empty binding"))?;

        for modifier in modifiers {
            match modifier.trim().to_ascii_lowercase().as_str() {
                "shift" => shift = true,
                "ctrl" | "control" => ctrl = true,
                _ => return Err(invalid("unknown modifier")),
            }
        }

        let code = match key_part.trim().to_ascii_lowercase().as_str() {
            "space" => KeyCode::Space,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "tab" => KeyCode::Tab,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            _ => {
                let raw = key_part.trim();
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        let c = if shift { c.to_ascii_uppercase() } else { c };
                        KeyCode::Char(c)
                    }
                    _ => return Err(invalid("unknown key name")),
                }
            }
        };

        Ok(Self::with_modifiers(code, shift, ctrl))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "ctrl+")?;
        }
        if self.shift {
            write!(f, "shift+")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Space => write!(f, "space"),
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Esc => write!(f, "esc"),
            KeyCode::Backspace => write!(f, "backspace"),
            KeyCode::Delete => write!(f, "delete"),
            KeyCode::Tab => write!(f, "tab"),
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            KeyCode::Left => write!(f, "left"),
            KeyCode::Right => write!(f, "right"),
        }
    }
}

/// Something a key can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Command {
    NewTimer,
    ToggleActive,
    DeleteActive,
    ResetActive,
    RenameActive,
    SelectPrev,
    SelectNext,
    ReorderUp,
    ReorderDown,
    ToggleMenu,
    ToggleFocus,
    ToggleZen,
    ToggleTheme,
    ToggleFullscreen,
    Escape,
    Quit,
}

impl Command {
    pub const ALL: [Command; 16] = [
        Command::NewTimer,
        Command::ToggleActive,
        Command::DeleteActive,
        Command::ResetActive,
        Command::RenameActive,
        Command::SelectPrev,
        Command::SelectNext,
        Command::ReorderUp,
        Command::ReorderDown,
        Command::ToggleMenu,
        Command::ToggleFocus,
        Command::ToggleZen,
        Command::ToggleTheme,
        Command::ToggleFullscreen,
        Command::Escape,
        Command::Quit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::NewTimer => "new-timer",
            Command::ToggleActive => "toggle-active",
            Command::DeleteActive => "delete-active",
            Command::ResetActive => "reset-active",
            Command::RenameActive => "rename-active",
            Command::SelectPrev => "select-prev",
            Command::SelectNext => "select-next",
            Command::ReorderUp => "reorder-up",
            Command::ReorderDown => "reorder-down",
            Command::ToggleMenu => "toggle-menu",
            Command::ToggleFocus => "toggle-focus",
            Command::ToggleZen => "toggle-zen",
            Command::ToggleTheme => "toggle-theme",
            Command::ToggleFullscreen => "toggle-fullscreen",
            Command::Escape => "escape",
            Command::Quit => "quit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name.trim())
    }

    /// One-line description for the shortcuts help.
    pub fn description(self) -> &'static str {
        match self {
            Command::NewTimer => "New timer",
            Command::ToggleActive => "Start/stop selected timer",
            Command::DeleteActive => "Delete selected timer",
            Command::ResetActive => "Reset selected timer",
            Command::RenameActive => "Rename selected timer",
            Command::SelectPrev => "Select previous timer",
            Command::SelectNext => "Select next timer",
            Command::ReorderUp => "Move selected timer up",
            Command::ReorderDown => "Move selected timer down",
            Command::ToggleMenu => "Toggle menu",
            Command::ToggleFocus => "Focus selected timer",
            Command::ToggleZen => "Zen mode",
            Command::ToggleTheme => "Light/dark theme",
            Command::ToggleFullscreen => "Fullscreen",
            Command::Escape => "Exit focus / close menu",
            Command::Quit => "Quit",
        }
    }

    fn default_keys(self) -> Vec<Key> {
        match self {
            Command::NewTimer => vec![Key::char('n')],
            Command::ToggleActive => vec![Key::new(KeyCode::Space)],
            Command::DeleteActive => vec![Key::new(KeyCode::Delete), Key::char('x')],
            Command::ResetActive => vec![Key::char('r')],
            Command::RenameActive => vec![Key::new(KeyCode::Enter), Key::char('e')],
            Command::SelectPrev => vec![Key::new(KeyCode::Up), Key::char('k')],
            Command::SelectNext => vec![Key::new(KeyCode::Down), Key::char('j')],
            Command::ReorderUp => vec![Key::shift(KeyCode::Up), Key::char('K')],
            Command::ReorderDown => vec![Key::shift(KeyCode::Down), Key::char('J')],
            Command::ToggleMenu => vec![Key::char('m')],
            Command::ToggleFocus => vec![Key::char('f')],
            Command::ToggleZen => vec![Key::char('z')],
            Command::ToggleTheme => vec![Key::char('t')],
            Command::ToggleFullscreen => vec![Key::char('F')],
            Command::Escape => vec![Key::new(KeyCode::Esc)],
            Command::Quit => vec![Key::char('q'), Key::ctrl('c')],
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<Key, Command>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        for command in Command::ALL {
            for key in command.default_keys() {
                bindings.insert(key, command);
            }
        }
        Self { bindings }
    }
}

impl Keymap {
    /// Defaults plus user overrides. Bad entries are logged and skipped.
    pub fn from_config(config: &ShortcutsConfig) -> Self {
        let mut keymap = Self::default();
        for (name, keys_text) in &config.bindings {
            if let Err(e) = keymap.rebind(name, keys_text) {
                warn!(command = %name, error = %e, "ignoring shortcut override");
            }
        }
        keymap
    }

    /// Replace the keys of `command_name` with the comma-separated `keys_text`.
    ///
    /// Nothing changes unless every key in `keys_text` parses.
    pub fn rebind(&mut self, command_name: &str, keys_text: &str) -> Result<(), ValidationError> {
        let command = Command::from_name(command_name)
            .ok_or_else(|| ValidationError::UnknownCommand(command_name.to_string()))?;
        let keys = keys_text
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Key::parse)
            .collect::<Result<Vec<_>, _>>()?;

        self.bindings.retain(|_, bound| *bound != command);
        for key in keys {
            self.bindings.insert(key, command);
        }
        Ok(())
    }

    pub fn lookup(&self, key: &Key) -> Option<Command> {
        self.bindings.get(key).copied()
    }

    /// Keys bound to `command`, in display order.
    pub fn keys_for(&self, command: Command) -> Vec<Key> {
        let mut keys: Vec<Key> = self
            .bindings
            .iter()
            .filter(|(_, bound)| **bound == command)
            .map(|(key, _)| *key)
            .collect();
        keys.sort_by_key(|k| k.to_string());
        keys
    }

    /// `(command, "key, key")` rows for a help screen.
    pub fn help_rows(&self) -> Vec<(Command, String)> {
        Command::ALL
            .into_iter()
            .map(|command| {
                let keys: Vec<String> =
                    self.keys_for(command).iter().map(ToString::to_string).collect();
                (command, keys.join(", "))
            })
            .collect()
    }
}
