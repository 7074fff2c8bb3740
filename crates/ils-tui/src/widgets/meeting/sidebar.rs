//! Chat and participants sidebar

use ils_app::state::AppState;
use ils_app::view::SidebarPanel;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget, Wrap},
};

use super::{hand_marker, roster};
use crate::theme::{palette, styles};

pub struct Sidebar<'a> {
    state: &'a AppState,
    panel: SidebarPanel,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a AppState, panel: SidebarPanel) -> Self {
        Self { state, panel }
    }

    fn render_chat(&self, area: Rect, buf: &mut Buffer) {
        let [history, input] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let lines: Vec<Line> = self
            .state
            .chat
            .iter()
            .map(|line| {
                let sender = if self.state.is_local(&line.sender_id) {
                    "You".to_string()
                } else {
                    line.sender_name.clone()
                };
                Line::from(vec![
                    Span::styled(
                        line.received_at.format("%H:%M ").to_string(),
                        styles::text_muted(),
                    ),
                    Span::styled(sender, styles::accent()),
                    Span::styled(": ", styles::text_muted()),
                    Span::styled(line.message.clone(), styles::text_primary()),
                ])
            })
            .collect();

        // Keep the newest lines in view
        let overflow = lines.len().saturating_sub(history.height as usize);
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((overflow as u16, 0))
            .render(history, buf);

        let prompt = Line::from(vec![
            Span::styled("> ", styles::accent()),
            Span::styled(self.state.chat_draft.clone(), styles::text_primary()),
            Span::styled("_", styles::accent()),
        ]);
        Paragraph::new(prompt).render(input, buf);
    }

    fn render_participants(&self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = roster(self.state)
            .into_iter()
            .map(|(id, label)| {
                Line::from(vec![
                    Span::styled(label, styles::text_primary()),
                    Span::raw(" "),
                    Span::styled(hand_marker(self.state, id), styles::status_yellow()),
                ])
            })
            .collect();
        Paragraph::new(lines).render(area, buf);
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.panel {
            SidebarPanel::Chat => format!(" {} ", self.panel.title()),
            SidebarPanel::Participants => {
                format!(" {} ({}) ", self.panel.title(), roster(self.state).len())
            }
        };
        let block = styles::active_block()
            .title(title)
            .style(Style::default().bg(palette::POPUP_BG));
        let inner = block.inner(area);
        // Compact layouts draw the sidebar over the stage
        Clear.render(area, buf);
        block.render(area, buf);

        match self.panel {
            SidebarPanel::Chat => self.render_chat(inner, buf),
            SidebarPanel::Participants => self.render_participants(inner, buf),
        }
    }
}
