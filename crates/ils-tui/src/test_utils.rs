//! Test utilities for TUI rendering verification
//!
//! Provides helpers for testing widgets and full-screen rendering
//! using ratatui's TestBackend.

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::Frame;
use ratatui::Terminal;

/// Standard test terminal size
pub const TEST_WIDTH: u16 = 160;
pub const TEST_HEIGHT: u16 = 40;

/// Narrow terminal; maps to a mobile viewport with default cell metrics
pub const COMPACT_WIDTH: u16 = 60;
pub const COMPACT_HEIGHT: u16 = 30;

/// Test utility wrapper around ratatui's TestBackend terminal.
///
/// For full-frame rendering use `draw_with()`:
/// ```ignore
/// let mut term = TestTerminal::new();
/// term.draw_with(|frame| view(frame, &state));
/// assert!(term.buffer_contains("expected content"));
/// ```
pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    /// Create a new test terminal with standard dimensions (160x40)
    pub fn new() -> Self {
        Self::with_size(TEST_WIDTH, TEST_HEIGHT)
    }

    /// Create a new test terminal with compact dimensions (60x30)
    pub fn compact() -> Self {
        Self::with_size(COMPACT_WIDTH, COMPACT_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).expect("Failed to create test terminal");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        let size = self.terminal.size().expect("Failed to get terminal size");
        Rect::new(0, 0, size.width, size.height)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.terminal
            .draw(|frame| frame.render_widget(widget, area))
            .expect("Failed to render widget");
    }

    /// Draws a frame using a custom rendering function
    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("Failed to draw frame");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    /// Check if the buffer contains a string anywhere
    pub fn buffer_contains(&self, text: &str) -> bool {
        self.content().contains(text)
    }

    /// Check if a specific line contains text
    pub fn line_contains(&self, line: u16, text: &str) -> bool {
        let buffer = self.buffer();
        let area = buffer.area;
        if line >= area.height {
            return false;
        }
        let row: String = (0..area.width)
            .filter_map(|x| buffer.cell((area.x + x, area.y + line)))
            .map(|cell| cell.symbol())
            .collect();
        row.contains(text)
    }

    /// Get the buffer content as a newline-separated string
    pub fn content(&self) -> String {
        buffer_to_string(self.buffer())
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a buffer to a string, one line per row
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut lines = Vec::with_capacity(area.height as usize);
    for y in 0..area.height {
        let line: String = (0..area.width)
            .filter_map(|x| buffer.cell((area.x + x, area.y + y)))
            .map(|cell| cell.symbol())
            .collect();
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_terminal_sizes() {
        assert_eq!(TestTerminal::new().area(), Rect::new(0, 0, 160, 40));
        assert_eq!(TestTerminal::compact().area(), Rect::new(0, 0, 60, 30));
    }

    #[test]
    fn test_line_contains() {
        let mut term = TestTerminal::with_size(20, 3);
        term.render_widget(Paragraph::new("hello"), Rect::new(0, 1, 20, 1));
        assert!(term.line_contains(1, "hello"));
        assert!(!term.line_contains(0, "hello"));
        assert!(!term.line_contains(5, "hello"));
    }
}
