//! Terminal event polling

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ils_app::config::UiSettings;
use ils_app::message::Message;
use ils_app::InputKey;
use ils_core::prelude::*;

use crate::terminal::viewport_from_cells;

/// Longest wait for terminal input before the runner checks timers again
pub const MAX_POLL: Duration = Duration::from_millis(50);

/// Convert crossterm KeyEvent to InputKey
pub fn key_event_to_input(key: crossterm::event::KeyEvent) -> Option<InputKey> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputKey::CharCtrl(c))
        }
        KeyCode::Char(c) => Some(InputKey::Char(c)),
        KeyCode::Enter => Some(InputKey::Enter),
        KeyCode::Esc => Some(InputKey::Esc),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(InputKey::BackTab),
        KeyCode::Tab => Some(InputKey::Tab),
        KeyCode::BackTab => Some(InputKey::BackTab),
        KeyCode::Backspace => Some(InputKey::Backspace),
        KeyCode::Up => Some(InputKey::Up),
        KeyCode::Down => Some(InputKey::Down),
        KeyCode::Left => Some(InputKey::Left),
        KeyCode::Right => Some(InputKey::Right),
        _ => None, // Unsupported keys ignored
    }
}

/// Translate a terminal event into an application message
pub fn event_to_message(event: Event, ui: &UiSettings) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind == event::KeyEventKind::Press => {
            key_event_to_input(key).map(Message::Key)
        }
        Event::Resize(cols, rows) => Some(Message::ViewportResized(viewport_from_cells(
            cols, rows, ui,
        ))),
        _ => None,
    }
}

/// Poll for terminal events, waiting at most `timeout` (capped at 50ms)
pub fn poll(timeout: Duration, ui: &UiSettings) -> Result<Option<Message>> {
    if event::poll(timeout.min(MAX_POLL))? {
        let event = event::read()?;
        Ok(event_to_message(event, ui))
    } else {
        Ok(None)
    }
}
