//! Configuration file parsing for the ILS client
//!
//! Supports `.ils/config.toml` for timing, sounds, bridge and UI settings.

pub mod settings;
pub mod types;

pub use settings::{init_ils_directory, load_settings, CONFIG_FILENAME, ILS_DIR};
pub use types::*;
