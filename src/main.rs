//! ILS prebuilt - interactive live streaming client with a terminal UI
//!
//! This is the binary entry point. Meeting logic lives in the workspace
//! crates; this file wires the SDK bridge, the engine and a frontend.

mod headless;

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;

use ils_app::config::{init_ils_directory, load_settings};
use ils_app::message::Message;
use ils_app::Engine;
use ils_core::prelude::*;
use ils_core::Mode;
use ils_sdk::{BridgeOptions, BridgeSession, SessionEvent};

/// ILS prebuilt - join an interactive live stream from the terminal
#[derive(Parser, Debug)]
#[command(name = "ils")]
#[command(about = "Prebuilt interactive live streaming client", long_about = None)]
struct Args {
    /// Run in headless mode (NDJSON output, no TUI)
    #[arg(long)]
    headless: bool,

    /// Directory containing `.ils/config.toml` (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    config: Option<PathBuf>,

    /// Auth token used to join the meeting
    #[arg(long)]
    token: Option<String>,

    #[arg(long)]
    meeting_id: Option<String>,

    /// Display name shown to other participants
    #[arg(long)]
    name: Option<String>,

    /// Join as a broadcast-only viewer
    #[arg(long)]
    viewer: bool,

    /// SDK bridge command (overrides `[bridge] command`)
    #[arg(long, value_name = "CMD")]
    bridge: Option<String>,
}

impl Args {
    /// Messages that prefill the joining form from the command line
    fn credentials(&self) -> Vec<Message> {
        let mut messages = Vec::new();
        if let Some(token) = &self.token {
            messages.push(Message::SetToken(token.clone()));
        }
        if let Some(meeting_id) = &self.meeting_id {
            messages.push(Message::SetMeetingId(meeting_id.clone()));
        }
        if let Some(name) = &self.name {
            messages.push(Message::SetParticipantName(name.clone()));
        }
        if self.viewer {
            messages.push(Message::SetJoinMode(Mode::BroadcastOnly));
        }
        messages
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    ils_core::logging::init()?;

    let base_dir = args
        .config
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    if let Err(e) = init_ils_directory(&base_dir) {
        warn!("Could not create default config: {}", e);
    }
    let mut settings = load_settings(&base_dir);
    if let Some(bridge) = &args.bridge {
        settings.bridge.command = bridge.clone();
    }

    let options = BridgeOptions {
        command: settings.bridge.command.clone(),
        args: settings.bridge.args.clone(),
        request_timeout: settings.bridge.request_timeout(),
    };
    let (session_tx, session_rx) = mpsc::channel::<SessionEvent>(256);
    let session = BridgeSession::spawn(&options, session_tx)?;
    info!("SDK bridge started: {}", options.command);

    let mut engine = Engine::new(settings, session.clone());
    engine.forward_session_events(session_rx);

    let credentials = args.credentials();
    let result = if args.headless {
        headless::runner::run_headless(&mut engine, credentials).await
    } else {
        for msg in credentials {
            engine.process_message(msg);
        }
        ils_tui::run(&mut engine).await
    };

    engine.shutdown();
    session.shutdown().await;

    if let Err(e) = &result {
        log_exit_error(e);
    }
    result?;
    Ok(())
}

fn log_exit_error(e: &Error) {
    if e.is_fatal() {
        error!("Fatal error: {}", e);
    } else {
        warn!("Exiting after error: {}", e);
    }
}
