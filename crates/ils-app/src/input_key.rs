//! Abstract input key event, independent of terminal library.
//!
//! The TUI converts crossterm key events into `InputKey` at its boundary so
//! the application crate never depends on a terminal backend.

/// Keyboard input understood by the key handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character
    Char(char),
    /// Character with Ctrl held (Ctrl+c, Ctrl+l, ...)
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,

    Enter,
    Esc,
    Tab,
    /// Shift+Tab
    BackTab,
    Backspace,
}

impl InputKey {
    /// Whether this key is a plain printable character
    pub fn is_text(&self) -> bool {
        matches!(self, InputKey::Char(_))
    }
}
