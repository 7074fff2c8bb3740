//! Headless mode runner - event loop without TUI
//!
//! Starts the meeting immediately, prints engine events as NDJSON and reads
//! user actions from stdin.

use tokio::sync::{broadcast, mpsc};
use tokio::time::sleep_until;

use ils_app::message::Message;
use ils_app::{Engine, EngineEvent, SessionBackend};
use ils_core::prelude::*;
use ils_core::LifecyclePhase;

use super::HeadlessEvent;

/// What woke the event loop
enum Wake {
    Message(Option<Message>),
    Timer,
}

/// Run in headless mode.
///
/// `credentials` are the messages that fill the joining form. They are
/// replayed on `rejoin` because leaving clears the form.
pub async fn run_headless<S: SessionBackend>(
    engine: &mut Engine<S>,
    credentials: Vec<Message>,
) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("ILS prebuilt starting in HEADLESS mode");
    info!("═══════════════════════════════════════════════════════");

    let mut events = engine.subscribe();

    let stdin_tx = engine.msg_sender();
    let replay = credentials.clone();
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(stdin_tx, replay);
    });

    for msg in credentials {
        engine.process_message(msg);
    }
    engine.process_message(Message::StartMeeting);
    emit_events(&mut events);

    if engine.state.phase == LifecyclePhase::NotStarted {
        let reason = engine
            .state
            .join_error
            .clone()
            .unwrap_or_else(|| "meeting did not start".to_string());
        return Err(Error::config_invalid(reason));
    }

    headless_event_loop(engine, &mut events).await
}

async fn headless_event_loop<S: SessionBackend>(
    engine: &mut Engine<S>,
    events: &mut broadcast::Receiver<EngineEvent>,
) -> Result<()> {
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        let wake = match engine.next_deadline() {
            Some(due) => tokio::select! {
                msg = engine.msg_rx.recv() => Wake::Message(msg),
                _ = sleep_until(due) => Wake::Timer,
            },
            None => Wake::Message(engine.msg_rx.recv().await),
        };

        match wake {
            Wake::Message(Some(msg)) => engine.process_message(msg),
            Wake::Message(None) => {
                info!("Message channel closed");
                break;
            }
            Wake::Timer => engine.tick(),
        }
        emit_events(events);
    }

    Ok(())
}

/// Print every event queued since the last call
fn emit_events(events: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => {
                if let Some(line) = HeadlessEvent::from_engine_event(&event) {
                    line.emit();
                }
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output skipped {} events", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Map one stdin line to the messages it triggers
fn parse_command(line: &str, credentials: &[Message]) -> Option<Vec<Message>> {
    let messages = match line.trim() {
        "leave" | "l" => vec![Message::LeaveMeeting],
        "ack" | "ok" => vec![Message::AcknowledgeError],
        "raise" | "h" => vec![Message::RaiseHand],
        "rejoin" => {
            let mut messages = vec![Message::ReturnToJoin];
            messages.extend(credentials.iter().cloned());
            messages.push(Message::StartMeeting);
            messages
        }
        "quit" | "q" => vec![Message::Quit],
        _ => return None,
    };
    Some(messages)
}

/// Read commands from stdin and forward them to the engine (blocking)
fn spawn_stdin_reader_blocking(msg_tx: mpsc::Sender<Message>, credentials: Vec<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Stdin read error: {}", e);
                break;
            }
        };
        let Some(messages) = parse_command(&line, &credentials) else {
            if !line.trim().is_empty() {
                warn!("Stdin: unknown command '{}'", line.trim());
            }
            continue;
        };
        info!("Stdin: {}", line.trim());
        for msg in messages {
            if msg_tx.blocking_send(msg).is_err() {
                return;
            }
        }
    }

    // EOF ends the session like `quit`
    let _ = msg_tx.blocking_send(Message::Quit);
}
