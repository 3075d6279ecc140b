//! Interactive live view.
//!
//! Runs a single-threaded tokio loop over three sources: key presses read
//! on a dedicated thread, a frame ticker that only fires while the frame
//! loop is armed, and the deadline of the pending debounced write.

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::Duration;

use clap::Args;
use crossterm::event::{self, Event as TermEvent, KeyCode as TermKey, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use chronominimal_core::{
    now_ms, Action, Config, Controller, Database, Key, KeyCode, KeyOutcome, StateStore, Theme,
};

use crate::render::{self, Line, Tone};

#[derive(Args)]
pub struct WatchArgs {
    /// Start in fullscreen (alternate screen)
    #[arg(long)]
    fullscreen: bool,
    /// Frame interval in milliseconds (overrides display.frame_interval_ms)
    #[arg(long)]
    interval_ms: Option<u64>,
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut ctl = Controller::load(db, &config, now_ms());

    let interval_ms = args
        .interval_ms
        .unwrap_or(config.display.frame_interval_ms)
        .max(1);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let result = {
        let mut term = Terminal::enter(config.display.show_hundredths)?;
        if args.fullscreen {
            request_fullscreen(&mut ctl, &mut term, true);
        }
        let input = spawn_input_reader();
        runtime.block_on(event_loop(
            &mut ctl,
            &mut term,
            input,
            Duration::from_millis(interval_ms),
        ))
    };

    ctl.shutdown();
    result.map_err(Into::into)
}

enum Input {
    Key(Key),
    Resize,
}

async fn event_loop<S: StateStore>(
    ctl: &mut Controller<S>,
    term: &mut Terminal,
    mut input: mpsc::UnboundedReceiver<Input>,
    frame_every: Duration,
) -> io::Result<()> {
    let mut ticker = time::interval(frame_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    term.draw(ctl)?;
    loop {
        let persist_in = ctl
            .persist_due_at()
            .map(|due| Duration::from_millis(due.saturating_sub(now_ms())));

        tokio::select! {
            received = input.recv() => {
                match received {
                    None => break,
                    Some(Input::Resize) => {}
                    Some(Input::Key(key)) => {
                        let was_armed = ctl.wants_frames();
                        match ctl.handle_key(key, now_ms()) {
                            KeyOutcome::Quit => break,
                            KeyOutcome::RequestFullscreen(on) => request_fullscreen(ctl, term, on),
                            KeyOutcome::Handled(Some(event)) => debug!(?event, "timer event"),
                            KeyOutcome::Handled(None) | KeyOutcome::Ignored => {}
                        }
                        if !was_armed && ctl.wants_frames() {
                            ticker.reset();
                        }
                    }
                }
            }
            _ = ticker.tick(), if ctl.wants_frames() => {
                ctl.frame(now_ms());
            }
            _ = time::sleep(persist_in.unwrap_or_default()), if persist_in.is_some() => {
                ctl.poll_persist(now_ms());
            }
        }

        term.draw(ctl)?;
    }
    Ok(())
}

/// Ask the terminal for a fullscreen change; the controller only learns of
/// it once the terminal accepted.
fn request_fullscreen<S: StateStore>(ctl: &mut Controller<S>, term: &mut Terminal, on: bool) {
    match term.set_fullscreen(on) {
        Ok(()) => {
            ctl.dispatch(Action::FullscreenChanged(on), now_ms());
        }
        Err(e) => warn!(error = %e, "fullscreen request rejected"),
    }
}

fn spawn_input_reader() -> mpsc::UnboundedReceiver<Input> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(Duration::from_millis(100)) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    warn!(error = %e, "terminal input failed");
                    break;
                }
            }
            let input = match event::read() {
                Ok(TermEvent::Key(key)) => match to_key(key) {
                    Some(key) => Input::Key(key),
                    None => continue,
                },
                Ok(TermEvent::Resize(..)) => Input::Resize,
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "terminal input failed");
                    break;
                }
            };
            if tx.send(input).is_err() {
                break;
            }
        }
    });
    rx
}

fn to_key(key: KeyEvent) -> Option<Key> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let mut shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let code = match key.code {
        TermKey::Char(c) => KeyCode::Char(c),
        TermKey::Enter => KeyCode::Enter,
        TermKey::Esc => KeyCode::Esc,
        TermKey::Backspace => KeyCode::Backspace,
        TermKey::Delete => KeyCode::Delete,
        TermKey::Tab => KeyCode::Tab,
        TermKey::BackTab => {
            shift = true;
            KeyCode::Tab
        }
        TermKey::Up => KeyCode::Up,
        TermKey::Down => KeyCode::Down,
        TermKey::Left => KeyCode::Left,
        TermKey::Right => KeyCode::Right,
        _ => return None,
    };
    Some(Key::with_modifiers(
        code,
        shift,
        key.modifiers.contains(KeyModifiers::CONTROL),
    ))
}

/// Raw-mode terminal. Restores the terminal on drop.
struct Terminal {
    out: Stdout,
    show_hundredths: bool,
    fullscreen: bool,
    /// Lines drawn by the last inline render.
    drawn: u16,
}

impl Terminal {
    fn enter(show_hundredths: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self {
            out,
            show_hundredths,
            fullscreen: false,
            drawn: 0,
        })
    }

    fn set_fullscreen(&mut self, on: bool) -> io::Result<()> {
        if on == self.fullscreen {
            return Ok(());
        }
        if on {
            execute!(self.out, terminal::EnterAlternateScreen)?;
        } else {
            execute!(self.out, terminal::LeaveAlternateScreen)?;
        }
        self.fullscreen = on;
        Ok(())
    }

    fn draw<S: StateStore>(&mut self, ctl: &Controller<S>) -> io::Result<()> {
        let snapshot = ctl.snapshot(now_ms());
        let lines = render::watch_lines(&snapshot, ctl.keymap(), self.show_hundredths);
        let width = terminal::size().map(|(w, _)| w).unwrap_or(80).max(2) as usize;
        let theme = snapshot.view.theme;

        if self.fullscreen {
            queue!(
                self.out,
                cursor::MoveTo(0, 0),
                terminal::Clear(terminal::ClearType::All)
            )?;
        } else {
            if self.drawn > 0 {
                queue!(self.out, cursor::MoveUp(self.drawn))?;
            }
            queue!(
                self.out,
                cursor::MoveToColumn(0),
                terminal::Clear(terminal::ClearType::FromCursorDown)
            )?;
        }

        for line in &lines {
            self.print_line(line, theme, width)?;
        }
        if !self.fullscreen {
            self.drawn = lines.len().try_into().unwrap_or(u16::MAX);
        }
        self.out.flush()
    }

    fn print_line(&mut self, line: &Line, theme: Theme, width: usize) -> io::Result<()> {
        let text: String = line.text.chars().take(width - 1).collect();
        match tone_color(line.tone, theme) {
            Some(color) => queue!(
                self.out,
                SetForegroundColor(color),
                Print(text),
                ResetColor,
                Print("\r\n")
            ),
            None => queue!(self.out, Print(text), Print("\r\n")),
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.fullscreen {
            let _ = execute!(self.out, terminal::LeaveAlternateScreen);
        }
        let _ = execute!(self.out, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn tone_color(tone: Tone, theme: Theme) -> Option<Color> {
    match (tone, theme) {
        (Tone::Normal, _) => None,
        (Tone::Accent, Theme::Dark) => Some(Color::Cyan),
        (Tone::Accent, Theme::Light) => Some(Color::DarkBlue),
        (Tone::Muted, _) => Some(Color::DarkGrey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: TermKey, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn converts_terminal_keys() {
        assert_eq!(
            to_key(press(TermKey::Char('n'), KeyModifiers::NONE)),
            Some(Key::char('n'))
        );
        assert_eq!(
            to_key(press(TermKey::Char('F'), KeyModifiers::SHIFT)),
            Some(Key::char('F'))
        );
        assert_eq!(
            to_key(press(TermKey::Char('c'), KeyModifiers::CONTROL)),
            Some(Key::ctrl('c'))
        );
        assert_eq!(
            to_key(press(TermKey::Up, KeyModifiers::SHIFT)),
            Some(Key::shift(KeyCode::Up))
        );
        assert_eq!(
            to_key(press(TermKey::Char(' '), KeyModifiers::NONE)),
            Some(Key::new(KeyCode::Space))
        );
        assert_eq!(to_key(press(TermKey::F(1), KeyModifiers::NONE)), None);
    }

    #[test]
    fn ignores_key_release() {
        let mut key = press(TermKey::Char('n'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(to_key(key), None);
    }

    #[test]
    fn accent_follows_theme() {
        assert_eq!(tone_color(Tone::Accent, Theme::Dark), Some(Color::Cyan));
        assert_eq!(tone_color(Tone::Accent, Theme::Light), Some(Color::DarkBlue));
        assert_eq!(tone_color(Tone::Normal, Theme::Light), None);
    }
}
