//! Keyboard drivers.
//!
//! On a terminal, stdin is put in raw mode and crossterm key events map
//! straight onto interpreter keys; Ctrl-C or Ctrl-D ends the session.
//!
//! Piped stdin only hands over whole lines, so each line is expanded into
//! typed characters plus Enter. A few chords stand in for keys a line cannot
//! carry:
//!
//! | line          | keys                        |
//! |---------------|-----------------------------|
//! | `:up`         | Up                          |
//! | `:down`       | Down                        |
//! | `:skip`       | Escape                      |
//! | `wh:tab`      | `w`, `h`, Tab               |
//! | `:quit`       | end the session now         |
//!
//! End of piped input ends the session once everything already typed has run.

use std::io::{self, BufRead, IsTerminal};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use retroterm_core::input::KeyEvent;

/// Input delivered to the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMessage {
    Keys(Vec<KeyEvent>),
    Quit,
    /// Piped stdin closed.
    Eof,
}

const TAB_SUFFIX: &str = ":tab";

/// Translate one input line.
pub fn parse_line(line: &str) -> InputMessage {
    let line = line.trim_end_matches(['\r', '\n']);
    let keys = match line.trim() {
        ":quit" => return InputMessage::Quit,
        ":up" => vec![KeyEvent::Up],
        ":down" => vec![KeyEvent::Down],
        ":skip" => vec![KeyEvent::Escape],
        _ => match line.strip_suffix(TAB_SUFFIX) {
            Some(prefix) => typed(prefix, KeyEvent::Tab),
            None => typed(line, KeyEvent::Enter),
        },
    };
    InputMessage::Keys(keys)
}

fn typed(text: &str, last: KeyEvent) -> Vec<KeyEvent> {
    text.chars()
        .map(KeyEvent::Char)
        .chain(std::iter::once(last))
        .collect()
}

/// Interpreter key for a terminal key code, if it has one.
pub fn map_key(code: KeyCode) -> Option<KeyEvent> {
    match code {
        KeyCode::Char(ch) => Some(KeyEvent::Char(ch)),
        KeyCode::Backspace => Some(KeyEvent::Backspace),
        KeyCode::Enter => Some(KeyEvent::Enter),
        KeyCode::Up => Some(KeyEvent::Up),
        KeyCode::Down => Some(KeyEvent::Down),
        KeyCode::Tab => Some(KeyEvent::Tab),
        KeyCode::Esc => Some(KeyEvent::Escape),
        _ => None,
    }
}

/// Translate one terminal event. Key releases and unmapped keys are dropped.
pub fn map_event(event: &Event) -> Option<InputMessage> {
    let Event::Key(key) = event else {
        return None;
    };
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'd')).then_some(InputMessage::Quit);
    }
    map_key(key.code).map(|key| InputMessage::Keys(vec![key]))
}

/// Holds the terminal in raw mode until dropped.
pub struct RawMode(());

impl RawMode {
    /// Switch the terminal to raw mode.
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        log::debug!("Terminal raw mode enabled");
        Ok(Self(()))
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("Leaving raw mode failed: {e}");
        }
    }
}

/// Where keys come from.
pub enum KeySource {
    /// Raw-mode key events from the controlling terminal.
    Keyboard(RawMode),
    /// Chord-expanded lines from piped stdin.
    Lines(Receiver<InputMessage>),
}

impl KeySource {
    /// Raw keyboard when stdin is a terminal, the line reader otherwise.
    pub fn open() -> io::Result<Self> {
        if io::stdin().is_terminal() {
            Ok(Self::Keyboard(RawMode::enable()?))
        } else {
            Ok(Self::Lines(spawn_line_reader()))
        }
    }

    /// Whether keys come from a raw-mode terminal.
    pub fn is_keyboard(&self) -> bool {
        matches!(self, Self::Keyboard(_))
    }

    /// Everything that arrived since the last call, without blocking.
    pub fn drain(&mut self) -> io::Result<Vec<InputMessage>> {
        let mut messages = Vec::new();
        match self {
            Self::Keyboard(_) => {
                while event::poll(Duration::ZERO)? {
                    if let Some(message) = map_event(&event::read()?) {
                        messages.push(message);
                    }
                }
            },
            Self::Lines(rx) => loop {
                match rx.try_recv() {
                    Ok(message) => messages.push(message),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        messages.push(InputMessage::Eof);
                        break;
                    },
                }
            },
        }
        Ok(messages)
    }
}

/// Read piped stdin on a helper thread. The channel ends with `Quit` or `Eof`.
fn spawn_line_reader() -> Receiver<InputMessage> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let message = match line {
                Ok(line) => parse_line(&line),
                Err(e) => {
                    log::warn!("stdin read failed: {e}");
                    InputMessage::Quit
                },
            };
            let quit = message == InputMessage::Quit;
            if tx.send(message).is_err() || quit {
                return;
            }
        }
        let _ = tx.send(InputMessage::Eof);
    });
    rx
}
