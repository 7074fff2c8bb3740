//! Toast stack anchored at the bottom-left corner

use ils_app::notices::{Notice, NoticeStack, ToastPosition};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::palette;

const TOAST_HEIGHT: u16 = 3;
const MARGIN: u16 = 1;

/// Renders visible toasts, newest at the bottom
pub struct Toasts<'a> {
    notices: &'a NoticeStack,
}

impl<'a> Toasts<'a> {
    pub fn new(notices: &'a NoticeStack) -> Self {
        Self { notices }
    }

    fn toast_rect(notice: &Notice, area: Rect, slot: u16) -> Option<Rect> {
        let width = (notice.text.width() as u16)
            .saturating_add(4)
            .min(area.width.saturating_sub(MARGIN * 2));
        let offset = (slot + 1) * TOAST_HEIGHT + MARGIN;
        if offset > area.height || width == 0 {
            return None;
        }
        let y = area.y + area.height - offset;
        let x = match notice.position {
            ToastPosition::BottomLeft => area.x + MARGIN,
        };
        Some(Rect::new(x, y, width, TOAST_HEIGHT))
    }
}

impl Widget for Toasts<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let notices: Vec<&Notice> = self.notices.iter().collect();
        for (slot, notice) in notices.iter().rev().enumerate() {
            let Some(rect) = Self::toast_rect(notice, area, slot as u16) else {
                break;
            };
            let block = crate::theme::styles::panel_block()
                .style(Style::default().bg(palette::TOAST_BG));
            Paragraph::new(notice.text.as_str())
                .style(Style::default().fg(palette::TEXT_ON_LIGHT).bg(palette::TOAST_BG))
                .block(block)
                .render(rect, buf);
        }
    }
}
