use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Wait up to `timeout` for a key press.
///
/// Release and repeat events, resizes and mouse input all yield `None`.
pub fn poll_key(timeout: Duration) -> Option<KeyEvent> {
    if !event::poll(timeout).ok()? {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}

pub trait KeyEventExt {
    /// `q`, `Esc` or `Ctrl+C`
    fn is_quit(&self) -> bool;
}

impl KeyEventExt for KeyEvent {
    fn is_quit(&self) -> bool {
        matches!(
            (self.code, self.modifiers),
            (KeyCode::Char('q'), KeyModifiers::NONE)
                | (KeyCode::Esc, _)
                | (KeyCode::Char('c'), KeyModifiers::CONTROL)
        )
    }
}
