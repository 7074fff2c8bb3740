//! Message processing
//!
//! Runs the TEA update loop for one incoming message, following up
//! messages until none remain and dispatching every resulting action.

use tokio::sync::{broadcast, mpsc};

use crate::actions::{handle_action, SessionBackend};
use crate::engine_event::EngineEvent;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<S: SessionBackend>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    session: &S,
    event_tx: &broadcast::Sender<EngineEvent>,
) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        for action in result.actions {
            handle_action(
                action,
                msg_tx.clone(),
                session,
                event_tx,
                &state.settings.sounds,
            );
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
