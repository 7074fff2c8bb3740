//! Custom widget components

mod confirm_dialog;
mod error_modal;
mod join_form;
pub mod meeting;
pub mod modal_overlay;
mod status_screens;
mod toasts;

pub use confirm_dialog::ConfirmDialog;
pub use error_modal::ErrorModal;
pub use join_form::JoinForm;
pub use meeting::{
    BottomBar, ParticipantGrid, PresenterPane, Sidebar, StageOverlay, StreamViewer, TopBar,
};
pub use status_screens::{LeaveScreen, WaitingScreen};
pub use toasts::Toasts;

// Re-export state types from app layer (these are used by render/)
pub use ils_app::confirm_dialog::ConfirmDialogState;
