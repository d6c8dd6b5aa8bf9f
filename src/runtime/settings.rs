use std::fs;
use std::path::{Path, PathBuf};

use crate::config;

/// Load settings for this run together with the path changes are written to.
/// Never fails: broken files fall back to corrected values or defaults.
pub fn load_settings() -> (config::Settings, Option<PathBuf>) {
    let path = config::resolve_config_path();

    let mut settings = match config::Settings::load_from(path.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            log::warn!("failed to load config, using defaults: {e}");
            if let Some(p) = &path {
                keep_unreadable(p);
            }
            config::Settings::default()
        }
    };

    if let Err(msg) = settings.validate() {
        log::warn!("invalid config: {msg}");
        settings.correct();
        if let Err(msg) = settings.validate() {
            log::error!("config still invalid after correction, using defaults: {msg}");
            settings = config::Settings::default();
        }
    }

    match &path {
        Some(p) => log::debug!("settings file: {}", p.display()),
        None => log::warn!("no config directory; settings will not be saved"),
    }
    (settings, path)
}

// The next save would overwrite a file that did not parse; set it aside first.
fn keep_unreadable(path: &Path) {
    if !path.is_file() {
        return;
    }
    let backup = path.with_extension("toml.bak");
    match fs::copy(path, &backup) {
        Ok(_) => log::warn!("unreadable settings kept as {}", backup.display()),
        Err(e) => log::warn!("cannot back up {}: {e}", path.display()),
    }
}
