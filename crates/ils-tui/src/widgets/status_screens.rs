//! Waiting-to-join and leave screens

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::modal_overlay::centered_rect;
use crate::theme::styles;

pub const WAITING_TITLE: &str = "Waiting for the host to let you in...";
pub const DENIED_TITLE: &str = "The host denied your request to join.";
pub const DENIED_SUBTITLE: &str = "Leaving the meeting shortly.";
pub const LEFT_TITLE: &str = "You left the meeting!";

/// Shown between the join request and admission
pub struct WaitingScreen {
    entry_denied: bool,
}

impl WaitingScreen {
    pub fn new(entry_denied: bool) -> Self {
        Self { entry_denied }
    }
}

impl Widget for WaitingScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, subtitle, title_style) = if self.entry_denied {
            (DENIED_TITLE, Some(DENIED_SUBTITLE), styles::status_red())
        } else {
            (WAITING_TITLE, None, styles::accent_bold())
        };

        let hints = Line::from(vec![
            Span::styled("l", styles::keybinding()),
            Span::styled(" leave  ", styles::text_muted()),
            Span::styled("q", styles::keybinding()),
            Span::styled(" quit", styles::text_muted()),
        ]);
        render_centered(title, title_style, subtitle, hints, area, buf);
    }
}

/// Shown after leaving; credentials have been cleared
pub struct LeaveScreen;

impl Widget for LeaveScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hints = Line::from(vec![
            Span::styled("Enter", styles::keybinding()),
            Span::styled(" rejoin  ", styles::text_muted()),
            Span::styled("q", styles::keybinding()),
            Span::styled(" quit", styles::text_muted()),
        ]);
        render_centered(LEFT_TITLE, styles::accent_bold(), None, hints, area, buf);
    }
}

fn render_centered(
    title: &str,
    title_style: Style,
    subtitle: Option<&str>,
    hints: Line<'_>,
    area: Rect,
    buf: &mut Buffer,
) {
    let content = centered_rect(area.width, 5, area);
    let [title_row, subtitle_row, _, hint_row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(content);

    Paragraph::new(title)
        .alignment(Alignment::Center)
        .style(title_style)
        .render(title_row, buf);
    if let Some(subtitle) = subtitle {
        Paragraph::new(subtitle)
            .alignment(Alignment::Center)
            .style(styles::text_secondary())
            .render(subtitle_row, buf);
    }
    Paragraph::new(hints)
        .alignment(Alignment::Center)
        .render(hint_row, buf);
}
