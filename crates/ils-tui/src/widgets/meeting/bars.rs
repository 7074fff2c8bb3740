//! Top and bottom bars of the meeting screen

use ils_app::state::AppState;
use ils_core::{DeviceKind, RecordingStatus};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::{hand_marker, roster};
use crate::theme::styles;

/// Meeting id, recording indicator and participant count
pub struct TopBar<'a> {
    state: &'a AppState,
}

impl<'a> TopBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn recording_span(&self) -> Option<Span<'static>> {
        match self.state.recording? {
            RecordingStatus::Started => Some(Span::styled("● REC", styles::status_red())),
            RecordingStatus::Starting => Some(Span::styled("○ REC", styles::status_yellow())),
            RecordingStatus::Stopping => Some(Span::styled("○ REC", styles::text_muted())),
            RecordingStatus::Stopped => None,
        }
    }
}

impl Widget for TopBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::panel_block();
        let inner = block.inner(area);
        block.render(area, buf);

        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(28)]).areas(inner);

        let mut left = vec![
            Span::styled("Meeting ", styles::text_secondary()),
            Span::styled(self.state.config.meeting_id.clone(), styles::accent_bold()),
        ];
        if let Some(rec) = self.recording_span() {
            left.push(Span::raw("  "));
            left.push(rec);
        }
        Paragraph::new(Line::from(left)).render(left_area, buf);

        let count = roster(self.state).len();
        let right = Line::from(vec![
            Span::styled(self.state.mode.label(), styles::text_secondary()),
            Span::styled(format!("  {} in call", count), styles::text_muted()),
        ]);
        Paragraph::new(right)
            .alignment(Alignment::Right)
            .render(right_area, buf);
    }
}

/// Capture state and key hints
pub struct BottomBar<'a> {
    state: &'a AppState,
}

impl<'a> BottomBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn device_spans(&self, kind: DeviceKind, label: &'static str) -> Vec<Span<'a>> {
        let on = self.state.config.device_enabled(kind);
        vec![
            Span::styled(label, styles::text_secondary()),
            Span::styled(if on { " on " } else { " off " }, styles::toggle(on)),
            Span::styled(
                self.state.current_device(kind).display_name().to_string(),
                styles::text_muted(),
            ),
            Span::raw("   "),
        ]
    }

    fn hints(&self) -> Line<'a> {
        let mut keys = vec![("h", "raise hand"), ("c", "chat"), ("p", "participants")];
        if self.state.mode.is_interactive() {
            keys.extend([("m", "next mic"), ("v", "next camera")]);
        }
        keys.extend([("l", "leave"), ("q", "quit")]);

        let spans = keys
            .into_iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key, styles::keybinding()),
                    Span::styled(format!(" {}  ", label), styles::text_muted()),
                ]
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }
}

impl Widget for BottomBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::panel_block();
        let inner = block.inner(area);
        block.render(area, buf);

        let [status, hints] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

        let mut spans = Vec::new();
        if self.state.mode.is_interactive() {
            spans.extend(self.device_spans(DeviceKind::Microphone, "Mic"));
            spans.extend(self.device_spans(DeviceKind::Camera, "Camera"));
        } else {
            spans.push(Span::styled("Watching live stream   ", styles::text_secondary()));
        }
        let hand = hand_marker(self.state, self.state.local_participant_id.as_deref());
        if !hand.is_empty() {
            spans.push(Span::styled(format!("{} hand raised", hand), styles::status_yellow()));
        }
        Paragraph::new(Line::from(spans)).render(status, buf);
        Paragraph::new(self.hints()).render(hints, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use ils_app::state::RaisedHand;
    use ils_core::{DeviceRef, Mode, Participant};
    use std::time::Duration;

    fn joined_state() -> AppState {
        let mut state = AppState::new();
        state.config.meeting_id = "abcd-efgh".to_string();
        state.config.participant_name = "Ann".to_string();
        state.local_participant_id = Some("local-1".to_string());
        state.participants.push(Participant {
            id: "p2".to_string(),
            name: "Bob".to_string(),
        });
        state
    }

    #[test]
    fn test_top_bar_shows_meeting_and_count() {
        let mut term = TestTerminal::with_size(100, 3);
        let state = joined_state();
        term.render_widget(TopBar::new(&state), term.area());

        assert!(term.buffer_contains("Meeting abcd-efgh"));
        assert!(term.buffer_contains("2 in call"));
        assert!(!term.buffer_contains("REC"));
    }

    #[test]
    fn test_top_bar_shows_recording() {
        let mut term = TestTerminal::with_size(100, 3);
        let mut state = joined_state();
        state.recording = Some(RecordingStatus::Started);
        term.render_widget(TopBar::new(&state), term.area());

        assert!(term.buffer_contains("● REC"));
    }

    #[test]
    fn test_bottom_bar_interactive_shows_devices() {
        let mut term = TestTerminal::with_size(140, 4);
        let mut state = joined_state();
        state
            .active_devices
            .insert(DeviceKind::Microphone, DeviceRef::new("m2", "USB Mic"));
        term.render_widget(BottomBar::new(&state), term.area());

        assert!(term.buffer_contains("Mic on USB Mic"));
        assert!(term.buffer_contains("next camera"));
    }

    #[test]
    fn test_bottom_bar_viewer_hides_device_keys() {
        let mut term = TestTerminal::with_size(140, 4);
        let mut state = joined_state();
        state.mode = Mode::BroadcastOnly;
        term.render_widget(BottomBar::new(&state), term.area());

        assert!(term.buffer_contains("Watching live stream"));
        assert!(!term.buffer_contains("next mic"));
        assert!(term.buffer_contains("raise hand"));
    }

    #[test]
    fn test_bottom_bar_shows_local_raised_hand() {
        let mut term = TestTerminal::with_size(140, 4);
        let mut state = joined_state();
        state.raised_hands.push(RaisedHand {
            participant_id: "local-1".to_string(),
            raised_at: Duration::ZERO,
        });
        term.render_widget(BottomBar::new(&state), term.area());

        assert!(term.buffer_contains("hand raised"));
    }
}
