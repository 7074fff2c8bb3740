//! Main render/view function (View in TEA pattern)

#[cfg(test)]
mod tests;

use ils_app::state::AppState;
use ils_app::view::{hls_viewer_content, MeetingLayout, Stage};
use ils_app::Screen;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use super::{layout, widgets};
use crate::theme::palette;

/// Render the complete UI (View function in TEA)
///
/// Draws the composed screen, then toasts, then the error modal and the
/// leave confirmation on top.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(bg_block, area);

    match state.screen() {
        Screen::Joining => frame.render_widget(widgets::JoinForm::new(state), area),
        Screen::WaitingToJoin { entry_denied } => {
            frame.render_widget(widgets::WaitingScreen::new(entry_denied), area)
        }
        Screen::Leave => frame.render_widget(widgets::LeaveScreen, area),
        Screen::InMeeting(meeting) => render_meeting(frame, state, &meeting),
    }

    if !state.notices.is_empty() {
        frame.render_widget(widgets::Toasts::new(&state.notices), area);
    }

    if let Some(notice) = &state.error_notice {
        frame.render_widget(widgets::ErrorModal::new(notice), area);
    }

    if let Some(dialog) = &state.confirm_dialog {
        frame.render_widget(widgets::ConfirmDialog::new(dialog), area);
    }
}

fn render_meeting(frame: &mut Frame, state: &AppState, meeting: &MeetingLayout) {
    let areas = layout::meeting_areas(frame.area(), meeting, &state.settings.ui);

    if let Some(top_bar) = areas.top_bar {
        frame.render_widget(widgets::TopBar::new(state), top_bar);
    }

    match meeting.stage {
        Stage::Interactive { .. } => {
            let stage = layout::stage_areas(areas.stage, meeting);
            if let Some(presenter) = stage.presenter {
                frame.render_widget(widgets::PresenterPane::new(state), presenter);
            }
            if let Some(grid) = stage.grid {
                frame.render_widget(widgets::ParticipantGrid::new(state), grid);
            }
        }
        Stage::Stream { .. } => {
            let content = hls_viewer_content(&state.hls, state.viewport);
            frame.render_widget(
                widgets::StreamViewer::new(content, &state.settings.ui),
                areas.stage,
            );
        }
    }

    if !state.polls.is_empty() || !state.reactions.is_empty() {
        frame.render_widget(widgets::StageOverlay::new(state), areas.stage);
    }

    if let (Some(sidebar), Some(side)) = (areas.sidebar, meeting.sidebar) {
        frame.render_widget(widgets::Sidebar::new(state, side.panel), sidebar);
    }

    frame.render_widget(widgets::BottomBar::new(state), areas.bottom_bar);
}
