//! Error modal shown until the user acknowledges it

use ils_core::{ErrorNotice, Severity};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::modal_overlay;
use crate::theme::{palette, styles};

pub struct ErrorModal<'a> {
    notice: &'a ErrorNotice,
}

impl<'a> ErrorModal<'a> {
    pub fn new(notice: &'a ErrorNotice) -> Self {
        Self { notice }
    }
}

impl Widget for ErrorModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal_area = modal_overlay::centered_rect(56, 10, area);
        modal_overlay::dim_background(buf, area);
        modal_overlay::clear_area(buf, modal_area);

        let title_style = match self.notice.severity {
            Severity::Critical => styles::status_red(),
            Severity::Normal => styles::status_yellow(),
        };
        let block = styles::active_block()
            .title(Span::styled(format!(" {} ", self.notice.title()), title_style))
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(palette::POPUP_BG));
        let inner = block.inner(modal_area);
        block.render(modal_area, buf);

        let [_, message, hint] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(self.notice.message.as_str())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(styles::text_primary())
            .render(message, buf);

        let hint_line = Line::from(vec![
            Span::styled("Enter", styles::keybinding()),
            Span::styled(" Ok", styles::text_muted()),
        ]);
        Paragraph::new(hint_line)
            .alignment(Alignment::Center)
            .render(hint, buf);
    }
}
