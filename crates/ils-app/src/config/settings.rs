//! Settings loading from `.ils/config.toml`

use std::path::Path;

use ils_core::prelude::*;

use super::types::*;

pub const ILS_DIR: &str = ".ils";
pub const CONFIG_FILENAME: &str = "config.toml";

/// Load settings from `.ils/config.toml` under `base_dir`.
///
/// A missing file yields defaults. An unreadable or malformed file is logged
/// and also yields defaults; settings never block startup.
pub fn load_settings(base_dir: &Path) -> Settings {
    let config_path = base_dir.join(ILS_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    let settings = match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<Settings>(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    };

    sanitize(settings)
}

/// Replace values that cannot be used with their defaults
fn sanitize(mut settings: Settings) -> Settings {
    let defaults = SoundSettings::default();
    let sounds = &mut settings.sounds;
    for (name, value, fallback) in [
        ("notification", &mut sounds.notification, defaults.notification),
        ("error", &mut sounds.error, defaults.error),
        ("critical_error", &mut sounds.critical_error, defaults.critical_error),
    ] {
        if let Err(e) = url::Url::parse(value.as_str()) {
            warn!("Invalid sound URL for '{}' ({}): {}", name, value, e);
            *value = fallback;
        }
    }

    if settings.bridge.command.trim().is_empty() {
        warn!("Empty bridge command, using default");
        settings.bridge.command = BridgeSettings::default().command;
    }

    if settings.ui.cell_width_px == 0 || settings.ui.cell_height_px == 0 {
        warn!("Cell size must be non-zero, using defaults");
        let ui = UiSettings::default();
        settings.ui.cell_width_px = ui.cell_width_px;
        settings.ui.cell_height_px = ui.cell_height_px;
    }

    settings
}

/// Create `.ils/` with a commented default `config.toml` if missing
pub fn init_ils_directory(base_dir: &Path) -> Result<()> {
    let ils_dir = base_dir.join(ILS_DIR);

    if !ils_dir.exists() {
        std::fs::create_dir_all(&ils_dir)
            .context(format!("Failed to create {}", ils_dir.display()))?;
        info!("Created .ils directory");
    }

    let config_path = ils_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, generate_default_config())
            .context(format!("Failed to write {}", config_path.display()))?;
        info!("Created default config.toml");
    }

    Ok(())
}

fn generate_default_config() -> String {
    format!(
        r#"# ILS prebuilt client configuration

[timing]
device_settle_ms = 500        # Pause between releasing and re-acquiring a device
denial_leave_ms = 3000        # Denied-entry screen duration before leaving
notice_auto_close_ms = 4000   # Toast lifetime
raised_hand_ttl_ms = 15000
reaction_ttl_ms = 2500        # How long a reaction floats over the stage

[sounds]
notification = "{DEFAULT_NOTIFICATION_SOUND}"
error = "{DEFAULT_ERROR_SOUND}"
critical_error = "{DEFAULT_CRITICAL_ERROR_SOUND}"

[bridge]
command = "videosdk-bridge"
args = []
request_timeout_ms = 30000

[ui]
chat_history = 200
cell_width_px = 8             # Used to map the terminal size to viewport breakpoints
cell_height_px = 16
"#
    )
}
