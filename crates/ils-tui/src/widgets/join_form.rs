//! Joining screen: credentials, capture toggles and mode selection

use ils_app::state::{AppState, JoinField};
use ils_core::{DeviceKind, Mode};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::modal_overlay::centered_rect;
use crate::theme::{palette, styles};

const FORM_WIDTH: u16 = 64;
const FORM_HEIGHT: u16 = 16;

pub struct JoinForm<'a> {
    state: &'a AppState,
}

impl<'a> JoinForm<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn field_line(&self, field: JoinField) -> Line<'a> {
        let config = &self.state.config;
        let value = match field {
            JoinField::Token => config.token.as_str(),
            JoinField::MeetingId => config.meeting_id.as_str(),
            JoinField::Name => config.participant_name.as_str(),
        };
        let focused = self.state.join_focus == field;

        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused {
            styles::accent_bold()
        } else {
            styles::text_secondary()
        };
        let mut spans = vec![
            Span::styled(marker, styles::accent()),
            Span::styled(format!("{:<11}", field.label()), label_style),
        ];
        if value.is_empty() {
            let placeholder = match field {
                JoinField::Name => config.effective_name().to_string(),
                _ => String::from("required"),
            };
            spans.push(Span::styled(placeholder, styles::text_muted()));
        } else {
            spans.push(Span::styled(value.to_string(), styles::text_primary()));
        }
        if focused {
            spans.push(Span::styled("_", styles::accent()));
        }
        Line::from(spans)
    }

    fn device_line(&self, kind: DeviceKind) -> Line<'a> {
        let config = &self.state.config;
        let (label, key) = match kind {
            DeviceKind::Microphone => ("Mic", "^A"),
            DeviceKind::Camera => ("Camera", "^V"),
        };
        let on = config.device_enabled(kind);
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:<11}", label), styles::text_secondary()),
            Span::styled(if on { "on " } else { "off" }, styles::toggle(on)),
            Span::raw("  "),
            Span::styled(
                config.selected_device(kind).display_name().to_string(),
                styles::text_primary(),
            ),
            Span::styled(format!("  ({})", key), styles::text_muted()),
        ])
    }

    fn mode_line(&self) -> Line<'a> {
        let mode = self.state.config.mode;
        let option = |m: Mode| {
            if m == mode {
                Span::styled(
                    format!("[{}]", m.label()),
                    styles::accent().add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(format!(" {} ", m.label()), styles::text_muted())
            }
        };
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:<11}", "Join as"), styles::text_secondary()),
            option(Mode::Interactive),
            Span::raw(" "),
            option(Mode::BroadcastOnly),
            Span::styled("  (^B)", styles::text_muted()),
        ])
    }
}

impl Widget for JoinForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let form_area = centered_rect(FORM_WIDTH, FORM_HEIGHT, area);
        let block = styles::active_block()
            .title(" Join Meeting ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(palette::POPUP_BG));
        let inner = block.inner(form_area);
        block.render(form_area, buf);

        let rows = Layout::vertical([
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Token
            Constraint::Length(1), // Meeting ID
            Constraint::Length(1), // Name
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Mic
            Constraint::Length(1), // Camera
            Constraint::Length(1), // Mode
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Error
            Constraint::Min(0),
            Constraint::Length(1), // Hints
            Constraint::Length(1), // Hints
        ])
        .split(inner);

        Paragraph::new(self.field_line(JoinField::Token)).render(rows[1], buf);
        Paragraph::new(self.field_line(JoinField::MeetingId)).render(rows[2], buf);
        Paragraph::new(self.field_line(JoinField::Name)).render(rows[3], buf);
        Paragraph::new(self.device_line(DeviceKind::Microphone)).render(rows[5], buf);
        Paragraph::new(self.device_line(DeviceKind::Camera)).render(rows[6], buf);
        Paragraph::new(self.mode_line()).render(rows[7], buf);

        if let Some(error) = &self.state.join_error {
            Paragraph::new(error.as_str())
                .alignment(Alignment::Center)
                .style(styles::status_red())
                .render(rows[9], buf);
        }

        let hints = [
            vec![
                Span::styled("Enter", styles::keybinding()),
                Span::styled(" join  ", styles::text_muted()),
                Span::styled("Tab", styles::keybinding()),
                Span::styled(" next field  ", styles::text_muted()),
                Span::styled("Esc", styles::keybinding()),
                Span::styled(" quit", styles::text_muted()),
            ],
            vec![
                Span::styled("←", styles::keybinding()),
                Span::styled(" next mic  ", styles::text_muted()),
                Span::styled("→", styles::keybinding()),
                Span::styled(" next camera  ", styles::text_muted()),
                Span::styled("^R", styles::keybinding()),
                Span::styled(" refresh devices", styles::text_muted()),
            ],
        ];
        for (row, spans) in [rows[11], rows[12]].into_iter().zip(hints) {
            Paragraph::new(Line::from(spans))
                .alignment(Alignment::Center)
                .render(row, buf);
        }
    }
}
