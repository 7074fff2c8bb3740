//! Screen layout for the in-meeting view
//!
//! Converts the pixel regions of a composed [`MeetingLayout`] into terminal
//! cells using the configured cell metrics.

use ils_app::config::UiSettings;
use ils_app::view::{MeetingLayout, Stage};
use ratatui::layout::{Constraint, Layout, Rect};

use crate::terminal::px_to_cells;

/// Cell areas for the in-meeting screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingAreas {
    /// Hidden on compact viewports and in broadcast-only mode
    pub top_bar: Option<Rect>,
    pub stage: Rect,
    /// On compact viewports the sidebar covers the stage
    pub sidebar: Option<Rect>,
    pub bottom_bar: Rect,
}

/// Sub-areas of the interactive stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageAreas {
    pub presenter: Option<Rect>,
    pub grid: Option<Rect>,
}

pub fn meeting_areas(area: Rect, layout: &MeetingLayout, ui: &UiSettings) -> MeetingAreas {
    let top = px_to_cells(layout.top_bar_height, ui.cell_height_px);
    let bottom = px_to_cells(layout.bottom_bar_height, ui.cell_height_px);

    let [top_area, middle, bottom_area] = Layout::vertical([
        Constraint::Length(top),
        Constraint::Min(1),
        Constraint::Length(bottom),
    ])
    .areas(area);

    let top_bar = (top > 0).then_some(top_area);

    let (stage, sidebar) = match layout.sidebar {
        None => (middle, None),
        Some(_) if layout.viewport_class.is_compact() => (middle, Some(middle)),
        Some(sidebar) => {
            let width = px_to_cells(sidebar.width, ui.cell_width_px).min(middle.width / 2);
            let [stage, side] =
                Layout::horizontal([Constraint::Min(1), Constraint::Length(width)])
                    .areas(middle);
            (stage, Some(side))
        }
    };

    MeetingAreas {
        top_bar,
        stage,
        sidebar,
        bottom_bar: bottom_area,
    }
}

/// Split the interactive stage between the presenter pane and the grid
pub fn stage_areas(stage: Rect, layout: &MeetingLayout) -> StageAreas {
    match layout.stage {
        Stage::Interactive {
            presenter_pane: true,
            participant_grid: true,
            ..
        } => {
            let [presenter, grid] =
                Layout::vertical([Constraint::Percentage(70), Constraint::Percentage(30)])
                    .areas(stage);
            StageAreas {
                presenter: Some(presenter),
                grid: Some(grid),
            }
        }
        Stage::Interactive {
            presenter_pane: true,
            ..
        } => StageAreas {
            presenter: Some(stage),
            grid: None,
        },
        Stage::Interactive { .. } => StageAreas {
            presenter: None,
            grid: Some(stage),
        },
        Stage::Stream { .. } => StageAreas {
            presenter: None,
            grid: None,
        },
    }
}
