//! Text rendering of controller snapshots.
//!
//! Produces styled lines only; writing them to a terminal is the caller's
//! job, which keeps this module testable.

use chronominimal_core::{Elapsed, Keymap, Snapshot, Theme, TimerView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    /// Highlighted (selected timer, running focus display).
    Accent,
    /// De-emphasized chrome.
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

fn time_text(ms: u64, show_hundredths: bool) -> String {
    let elapsed = Elapsed::from_ms(ms);
    if show_hundredths {
        elapsed.to_string()
    } else {
        elapsed.coarse()
    }
}

fn row(timer: &TimerView, label: &str, show_hundredths: bool) -> String {
    let marker = if timer.active { '>' } else { ' ' };
    let state = if timer.is_running { "running" } else { "stopped" };
    format!(
        "{marker} {:>3}  {:<24} {:>12}  {state}",
        timer.id,
        label,
        time_text(timer.elapsed_ms, show_hundredths),
    )
}

/// Plain rows for `list`.
pub fn list_lines(snapshot: &Snapshot, show_hundredths: bool) -> Vec<String> {
    snapshot
        .timers
        .iter()
        .map(|t| row(t, &t.label, show_hundredths))
        .collect()
}

/// Full screen for the live view.
pub fn watch_lines(snapshot: &Snapshot, keymap: &Keymap, show_hundredths: bool) -> Vec<Line> {
    let view = &snapshot.view;
    let mut lines = Vec::new();

    if !view.hides_chrome() {
        let theme = match view.theme {
            Theme::Light => "light",
            Theme::Dark => "dark",
        };
        lines.push(Line::new(format!("CHRONO minimal  [{theme}]"), Tone::Muted));
        lines.push(Line::new("", Tone::Normal));
    }

    let editing = view.editing.as_ref();
    let label_of = |t: &TimerView| match editing {
        Some(edit) if edit.id == t.id => format!("{}_", edit.buffer),
        _ => t.label.clone(),
    };

    match snapshot.timers.iter().find(|t| t.focused) {
        Some(timer) => {
            lines.push(Line::new(format!("  {}", label_of(timer)), Tone::Muted));
            let tone = if timer.is_running {
                Tone::Accent
            } else {
                Tone::Normal
            };
            lines.push(Line::new(
                format!("  {}", time_text(timer.elapsed_ms, show_hundredths)),
                tone,
            ));
        }
        None => {
            for timer in &snapshot.timers {
                let tone = if timer.active {
                    Tone::Accent
                } else {
                    Tone::Normal
                };
                lines.push(Line::new(row(timer, &label_of(timer), show_hundredths), tone));
            }
        }
    }

    if view.menu_open {
        lines.push(Line::new("", Tone::Normal));
        lines.push(Line::new("Keyboard shortcuts", Tone::Accent));
        for (command, keys) in keymap.help_rows() {
            lines.push(Line::new(
                format!("  {:<20} {}", keys, command.description()),
                Tone::Normal,
            ));
        }
    }

    if !view.zen {
        lines.push(Line::new("", Tone::Normal));
        let hint = if editing.is_some() {
            "Type to rename, enter to finish."
        } else {
            "space start/stop  n new  e rename  r reset  m menu  q quit"
        };
        lines.push(Line::new(hint, Tone::Muted));
    }

    lines
}
