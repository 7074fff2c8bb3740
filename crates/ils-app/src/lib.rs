//! ils-app - Application state and orchestration for the ILS prebuilt client
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! meeting lifecycle, mode listener, notification dispatcher and view
//! composer, plus the Engine shared by the TUI and headless runners.

pub mod actions;
pub mod config;
pub mod confirm_dialog;
pub mod devices;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod notices;
pub mod process;
pub mod scheduler;
pub mod signals;
pub mod state;
pub mod view;

// Re-export primary types
pub use actions::SessionBackend;
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use state::AppState;
pub use view::Screen;
