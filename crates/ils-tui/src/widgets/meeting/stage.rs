//! Stage content: participant tiles, the presenter pane and the stream viewer,
//! plus the poll and reaction overlay drawn on top of them

use ils_app::config::UiSettings;
use ils_app::state::AppState;
use ils_app::view::HlsViewerContent;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget},
};

use super::{hand_marker, local_label, roster};
use crate::terminal::px_to_cells;
use crate::widgets::modal_overlay::centered_rect;
use crate::theme::{palette, styles};

const TILE_WIDTH: u16 = 28;
const TILE_HEIGHT: u16 = 5;
const POLL_CARD_WIDTH: u16 = 36;

/// One tile per participant, local first, filling rows left to right
pub struct ParticipantGrid<'a> {
    state: &'a AppState,
}

impl<'a> ParticipantGrid<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

impl Widget for ParticipantGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let columns = (area.width / TILE_WIDTH).max(1);
        for (i, (id, label)) in roster(self.state).into_iter().enumerate() {
            let i = i as u16;
            let x = area.x + (i % columns) * TILE_WIDTH;
            let y = area.y + (i / columns) * TILE_HEIGHT;
            if y + TILE_HEIGHT > area.y + area.height {
                break;
            }
            let tile = Rect::new(x, y, TILE_WIDTH.min(area.width), TILE_HEIGHT);

            let hand = hand_marker(self.state, id);
            let block = if hand.is_empty() {
                styles::panel_block()
            } else {
                styles::active_block()
            };
            let inner = block.inner(tile);
            block.render(tile, buf);

            let line = Line::from(vec![
                Span::styled(label, styles::text_primary()),
                Span::raw(" "),
                Span::raw(hand),
            ]);
            let [_, row, _] = Layout::vertical([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .areas(inner);
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .render(row, buf);
        }
    }
}

/// Screen share of the current presenter
pub struct PresenterPane<'a> {
    state: &'a AppState,
}

impl<'a> PresenterPane<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn presenter_label(&self) -> String {
        match self.state.presenter_id.as_deref() {
            Some(id) if self.state.is_local(id) => local_label(self.state),
            Some(id) => self
                .state
                .participant_name(id)
                .unwrap_or(id)
                .to_string(),
            None => String::new(),
        }
    }
}

impl Widget for PresenterPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::active_block()
            .title(" Presentation ")
            .style(Style::default().bg(palette::STAGE_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        let [_, row, _] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);
        Paragraph::new(format!("{} is presenting", self.presenter_label()))
            .alignment(Alignment::Center)
            .style(styles::text_secondary())
            .render(row, buf);
    }
}

/// HLS player for broadcast-only viewers
pub struct StreamViewer<'a> {
    content: HlsViewerContent,
    ui: &'a UiSettings,
}

impl<'a> StreamViewer<'a> {
    pub fn new(content: HlsViewerContent, ui: &'a UiSettings) -> Self {
        Self { content, ui }
    }
}

impl Widget for StreamViewer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.content {
            HlsViewerContent::Playing { url } => {
                let block = styles::active_block()
                    .title(Span::styled(" ● LIVE ", styles::status_red()))
                    .style(Style::default().bg(palette::STAGE_BG));
                let inner = block.inner(area);
                block.render(area, buf);

                let [_, row, _] = Layout::vertical([
                    Constraint::Min(0),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .areas(inner);
                Paragraph::new(url)
                    .alignment(Alignment::Center)
                    .style(styles::text_secondary())
                    .render(row, buf);
            }
            HlsViewerContent::Placeholder {
                title,
                subtitle,
                animation_size,
                looping,
            } => {
                let text_rows = 2;
                let anim_w = px_to_cells(animation_size, self.ui.cell_width_px);
                let anim_h = px_to_cells(animation_size, self.ui.cell_height_px)
                    .min(area.height.saturating_sub(text_rows));
                let [anim_row, title_row, subtitle_row] = Layout::vertical([
                    Constraint::Length(anim_h),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .flex(Flex::Center)
                .areas(area);

                let anim_area = centered_rect(anim_w, anim_row.height, anim_row);
                let glyph = if looping { "◌ ◌ ◌" } else { "■" };
                let block = styles::panel_block();
                let inner = block.inner(anim_area);
                block.render(anim_area, buf);
                let [_, glyph_row, _] = Layout::vertical([
                    Constraint::Min(0),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .areas(inner);
                Paragraph::new(glyph)
                    .alignment(Alignment::Center)
                    .style(styles::accent())
                    .render(glyph_row, buf);

                Paragraph::new(title)
                    .alignment(Alignment::Center)
                    .style(styles::text_primary())
                    .render(title_row, buf);
                if let Some(subtitle) = subtitle {
                    Paragraph::new(subtitle)
                        .alignment(Alignment::Center)
                        .style(styles::text_muted())
                        .render(subtitle_row, buf);
                }
            }
        }
    }
}

/// Open polls in the top-right corner, reactions rising from the bottom-left
pub struct StageOverlay<'a> {
    state: &'a AppState,
}

impl<'a> StageOverlay<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn render_polls(&self, area: Rect, buf: &mut Buffer) {
        let width = POLL_CARD_WIDTH.min(area.width);
        let mut y = area.y;
        for active in self.state.polls.iter().rev() {
            let height = active.poll.options.len() as u16 + 3;
            if y + height > area.bottom() {
                break;
            }
            let card = Rect::new(area.right() - width, y, width, height);
            Clear.render(card, buf);

            let block = styles::active_block().title(Span::styled(
                format!(" Poll · {} ", active.sender_name),
                styles::accent_bold(),
            ));
            let inner = block.inner(card);
            block.render(card, buf);

            let mut lines = vec![Line::styled(
                active.poll.question.as_str(),
                styles::text_primary(),
            )];
            lines.extend(
                active
                    .poll
                    .options
                    .iter()
                    .map(|o| Line::styled(format!("  ○ {o}"), styles::text_secondary())),
            );
            Paragraph::new(lines).render(inner, buf);
            y += height;
        }
    }

    fn render_reactions(&self, area: Rect, buf: &mut Buffer) {
        let mut y = area.bottom();
        for reaction in self.state.reactions.iter().rev() {
            if y <= area.y {
                break;
            }
            y -= 1;
            let line = Line::from(vec![
                Span::raw(reaction.emoji.as_str()),
                Span::raw(" "),
                Span::styled(reaction.sender_name.as_str(), styles::text_muted()),
            ]);
            let row = Rect::new(area.x + 1, y, area.width.saturating_sub(1), 1);
            Paragraph::new(line).render(row, buf);
        }
    }
}

impl Widget for StageOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        self.render_reactions(area, buf);
        self.render_polls(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use ils_app::state::{ActivePoll, RaisedHand};
    use ils_app::view::{hls_viewer_content, HlsViewerState};
    use ils_core::{HlsStatus, Participant, Poll, Viewport};
    use std::time::Duration;

    fn state_with_peers() -> AppState {
        let mut state = AppState::new();
        state.config.participant_name = "Ann".to_string();
        state.local_participant_id = Some("local-1".to_string());
        for (id, name) in [("p2", "Bob"), ("p3", "Cleo")] {
            state.participants.push(Participant {
                id: id.to_string(),
                name: name.to_string(),
            });
        }
        state
    }

    #[test]
    fn test_grid_renders_local_first_then_peers() {
        let mut term = TestTerminal::new();
        let state = state_with_peers();
        term.render_widget(ParticipantGrid::new(&state), term.area());

        assert!(term.buffer_contains("You (Ann)"));
        assert!(term.buffer_contains("Bob"));
        assert!(term.buffer_contains("Cleo"));
    }

    #[test]
    fn test_grid_marks_raised_hand() {
        let mut term = TestTerminal::new();
        let mut state = state_with_peers();
        state.raised_hands.push(RaisedHand {
            participant_id: "p2".to_string(),
            raised_at: Duration::ZERO,
        });
        term.render_widget(ParticipantGrid::new(&state), term.area());

        assert!(term.buffer_contains("🖐"));
    }

    #[test]
    fn test_presenter_pane_names_presenter() {
        let mut term = TestTerminal::new();
        let mut state = state_with_peers();
        state.presenter_id = Some("p3".to_string());
        term.render_widget(PresenterPane::new(&state), term.area());

        assert!(term.buffer_contains("Cleo is presenting"));
    }

    #[test]
    fn test_stream_viewer_playing_shows_url() {
        let mut term = TestTerminal::new();
        let ui = UiSettings::default();
        let mut hls = HlsViewerState::default();
        hls.update(HlsStatus::Playable, Some("https://cdn.example/live.m3u8".to_string()));
        let content = hls_viewer_content(&hls, Viewport::new(1280, 640));
        term.render_widget(StreamViewer::new(content, &ui), term.area());

        assert!(term.buffer_contains("LIVE"));
        assert!(term.buffer_contains("https://cdn.example/live.m3u8"));
    }

    #[test]
    fn test_stream_viewer_waiting_placeholder() {
        let mut term = TestTerminal::new();
        let ui = UiSettings::default();
        let content = hls_viewer_content(&HlsViewerState::default(), Viewport::new(1280, 640));
        term.render_widget(StreamViewer::new(content, &ui), term.area());

        assert!(term.buffer_contains("Waiting for host to start live stream."));
        assert!(term.buffer_contains("Meanwhile, take a few deep breaths."));
        assert!(term.buffer_contains("◌"));
    }

    #[test]
    fn test_stream_viewer_stopped_placeholder() {
        let mut term = TestTerminal::compact();
        let ui = UiSettings::default();
        let mut hls = HlsViewerState::default();
        hls.update(HlsStatus::Started, None);
        hls.update(HlsStatus::Stopped, None);
        let content = hls_viewer_content(&hls, Viewport::new(480, 480));
        term.render_widget(StreamViewer::new(content, &ui), term.area());

        assert!(term.buffer_contains("Host has stopped the live streaming."));
        assert!(!term.buffer_contains("deep breaths"));
    }

    #[test]
    fn test_overlay_shows_polls_and_reactions() {
        let mut term = TestTerminal::new();
        let mut state = state_with_peers();
        state.open_poll(ActivePoll {
            poll: Poll {
                id: "poll-1".to_string(),
                question: "Ship it?".to_string(),
                options: vec!["Yes".to_string(), "Later".to_string()],
                timeout_secs: None,
            },
            sender_name: "Host".to_string(),
            opened_at: Duration::ZERO,
        });
        state.push_reaction("👏".to_string(), "Bob".to_string());
        term.render_widget(StageOverlay::new(&state), term.area());

        assert!(term.buffer_contains("Poll · Host"));
        assert!(term.buffer_contains("Ship it?"));
        assert!(term.buffer_contains("○ Later"));
        assert!(term.buffer_contains("Bob"));
    }

    #[test]
    fn test_overlay_is_empty_without_polls_or_reactions() {
        let mut term = TestTerminal::new();
        let state = state_with_peers();
        term.render_widget(StageOverlay::new(&state), term.area());

        assert!(!term.buffer_contains("Poll"));
    }
}
