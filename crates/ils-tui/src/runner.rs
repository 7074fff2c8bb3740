//! Main TUI runner - entry point and event loop

use std::io::Write;

use ils_app::message::Message;
use ils_app::{Engine, EngineEvent, SessionBackend};
use ils_core::prelude::*;
use ratatui::DefaultTerminal;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time::Instant;

use super::{event, render, terminal};

/// Run the TUI on top of an engine until the user quits.
///
/// The caller owns shutdown: it calls `Engine::shutdown` and stops the
/// session after this returns.
pub async fn run<S: SessionBackend>(engine: &mut Engine<S>) -> Result<()> {
    terminal::install_panic_hook();
    let mut term = ratatui::init();

    if let Ok(size) = term.size() {
        let viewport =
            terminal::viewport_from_cells(size.width, size.height, &engine.state.settings.ui);
        engine.process_message(Message::ViewportResized(viewport));
    }
    engine.process_message(Message::EnumerateDevices);

    let mut events = engine.subscribe();
    let result = run_loop(&mut term, engine, &mut events);

    ratatui::restore();
    result
}

fn run_loop<S: SessionBackend>(
    term: &mut DefaultTerminal,
    engine: &mut Engine<S>,
    events: &mut broadcast::Receiver<EngineEvent>,
) -> Result<()> {
    while !engine.should_quit() {
        engine.drain_pending_messages();
        engine.tick();
        play_sounds(events);

        term.draw(|frame| render::view(frame, &engine.state))?;

        // Wake up in time for the next timer
        let timeout = engine
            .next_deadline()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .unwrap_or(event::MAX_POLL);
        if let Some(msg) = event::poll(timeout, &engine.state.settings.ui)? {
            engine.process_message(msg);
        }
    }
    Ok(())
}

/// Terminals cannot play the cue URL; ring the bell instead
fn play_sounds(events: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match events.try_recv() {
            Ok(EngineEvent::Sound { cue, url }) => {
                debug!("Sound cue {:?} ({})", cue, url);
                let mut stdout = std::io::stdout();
                if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
                    warn!("Failed to ring terminal bell: {}", e);
                }
            }
            Ok(_) => {}
            Err(TryRecvError::Lagged(skipped)) => {
                debug!("Skipped {} engine events", skipped);
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}
