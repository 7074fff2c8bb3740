//! Confirm dialog state.
//!
//! Data model for confirmation dialogs. The rendering widget lives in
//! `ils-tui`.

use crate::message::Message;

#[derive(Debug, Clone)]
pub struct ConfirmDialogState {
    pub title: String,
    pub message: String,
    pub options: Vec<(String, Message)>,
    pub selected: usize,
}

impl ConfirmDialogState {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        options: Vec<(&str, Message)>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            options: options
                .into_iter()
                .map(|(label, msg)| (label.to_string(), msg))
                .collect(),
            selected: 0,
        }
    }

    /// Leave-guard prompt shown before closing the client mid-meeting
    pub fn leave_confirmation() -> Self {
        Self::new(
            "Leave meeting?",
            "You are still connected to the meeting.",
            vec![("Leave", Message::ConfirmQuit), ("Stay", Message::CancelQuit)],
        )
    }

    pub fn select_next(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + 1) % self.options.len();
        }
    }

    /// Message bound to the highlighted option
    pub fn selected_message(&self) -> Option<Message> {
        self.options.get(self.selected).map(|(_, msg)| msg.clone())
    }
}
