//! Terminal setup and restoration

use ils_app::config::UiSettings;
use ils_core::Viewport;

/// Install a panic hook that restores the terminal
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));
}

/// Logical pixel viewport for a terminal of `cols` x `rows` cells
pub fn viewport_from_cells(cols: u16, rows: u16, ui: &UiSettings) -> Viewport {
    Viewport::new(
        u32::from(cols) * ui.cell_width_px.max(1),
        u32::from(rows) * ui.cell_height_px.max(1),
    )
}

/// Cells needed to cover `px` logical pixels along one axis
pub fn px_to_cells(px: u32, cell_px: u32) -> u16 {
    let cells = px.div_ceil(cell_px.max(1));
    u16::try_from(cells).unwrap_or(u16::MAX)
}
