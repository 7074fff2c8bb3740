//! In-meeting widgets: bars, stage content and the sidebar

mod bars;
mod sidebar;
mod stage;

pub use bars::{BottomBar, TopBar};
pub use sidebar::Sidebar;
pub use stage::{ParticipantGrid, PresenterPane, StageOverlay, StreamViewer};

use ils_app::state::AppState;

pub(crate) const HAND: &str = "🖐";

/// Tile label for the local participant
pub(crate) fn local_label(state: &AppState) -> String {
    format!("You ({})", state.config.effective_name())
}

/// Participants in display order, local first: `(id, label)`
pub(crate) fn roster(state: &AppState) -> Vec<(Option<&str>, String)> {
    let mut entries = vec![(state.local_participant_id.as_deref(), local_label(state))];
    entries.extend(
        state
            .participants
            .iter()
            .filter(|p| !state.is_local(&p.id))
            .map(|p| (Some(p.id.as_str()), p.name.clone())),
    );
    entries
}

pub(crate) fn hand_marker(state: &AppState, id: Option<&str>) -> &'static str {
    match id {
        Some(id) if state.has_raised_hand(id) => HAND,
        _ => "",
    }
}
