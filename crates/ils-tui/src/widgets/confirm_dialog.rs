//! Confirmation dialog widget for the leave guard

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::modal_overlay;
use crate::theme::{palette, styles};

use ils_app::confirm_dialog::ConfirmDialogState;

/// Confirmation dialog widget
pub struct ConfirmDialog<'a> {
    state: &'a ConfirmDialogState,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(state: &'a ConfirmDialogState) -> Self {
        Self { state }
    }

    fn options_line(&self) -> Line<'a> {
        let mut spans = Vec::new();
        for (i, (label, _)) in self.state.options.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            let style = if i == self.state.selected {
                Style::default()
                    .fg(palette::DEEPEST_BG)
                    .bg(palette::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                styles::text_secondary()
            };
            spans.push(Span::styled(format!(" {} ", label), style));
        }
        Line::from(spans)
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal_area = modal_overlay::centered_rect(50, 9, area);
        modal_overlay::dim_background(buf, area);
        modal_overlay::clear_area(buf, modal_area);

        let block = styles::active_block()
            .title(format!(" {} ", self.state.title))
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(palette::POPUP_BG));
        let inner = block.inner(modal_area);
        block.render(modal_area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Message
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Options
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Hint
            Constraint::Min(0),
        ])
        .split(inner);

        Paragraph::new(self.state.message.as_str())
            .alignment(Alignment::Center)
            .style(styles::status_yellow())
            .render(chunks[1], buf);

        Paragraph::new(self.options_line())
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let hint = Line::from(vec![
            Span::styled("y", styles::keybinding()),
            Span::styled(" leave  ", styles::text_muted()),
            Span::styled("n", styles::keybinding()),
            Span::styled(" stay  ", styles::text_muted()),
            Span::styled("Tab", styles::keybinding()),
            Span::styled(" switch", styles::text_muted()),
        ]);
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }
}
