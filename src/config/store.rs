//! The live settings object used by the UI.
//!
//! `ConfigStore` owns the loaded `Settings` and the path they came from. Every
//! setter validates, applies and flushes the document to disk in one step.

use std::{
    fs,
    path::{Path, PathBuf},
};

use super::error::SettingsError;
use super::load::validate_music_folder;
use super::schema::{DpiScale, Settings, ThemeMode, format_hex_color};

/// Outcome of a settings mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// The value was already set; nothing was written.
    Unchanged,
    /// The new value is live.
    Applied,
    /// Stored, but only takes effect after a restart.
    RestartRequired,
}

pub struct ConfigStore {
    path: Option<PathBuf>,
    settings: Settings,
}

impl ConfigStore {
    pub fn new(settings: Settings, path: Option<PathBuf>) -> Self {
        Self { path, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the current document to disk. No-op without a path.
    pub fn save(&self) -> Result<(), SettingsError> {
        match &self.path {
            Some(path) => save_settings(&self.settings, path),
            None => Ok(()),
        }
    }

    /// Point the music folder somewhere else. Rejects paths that are not
    /// existing directories.
    pub fn set_music_folder(&mut self, folder: &Path) -> Result<Change, SettingsError> {
        if self.settings.folders.music == folder {
            return Ok(Change::Unchanged);
        }
        validate_music_folder(folder).map_err(SettingsError::Invalid)?;
        self.settings.folders.music = folder.to_path_buf();
        self.commit(Change::Applied)
    }

    pub fn set_acrylic(&mut self, enabled: bool) -> Result<Change, SettingsError> {
        if self.settings.main_window.enable_acrylic_background == enabled {
            return Ok(Change::Unchanged);
        }
        self.settings.main_window.enable_acrylic_background = enabled;
        self.commit(Change::Applied)
    }

    pub fn set_dpi_scale(&mut self, scale: DpiScale) -> Result<Change, SettingsError> {
        if self.settings.main_window.dpi_scale == scale {
            return Ok(Change::Unchanged);
        }
        self.settings.main_window.dpi_scale = scale;
        self.commit(Change::RestartRequired)
    }

    pub fn set_check_update_at_startup(&mut self, enabled: bool) -> Result<Change, SettingsError> {
        if self.settings.update.check_update_at_startup == enabled {
            return Ok(Change::Unchanged);
        }
        self.settings.update.check_update_at_startup = enabled;
        self.commit(Change::Applied)
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) -> Result<Change, SettingsError> {
        if self.settings.appearance.theme_mode == mode {
            return Ok(Change::Unchanged);
        }
        self.settings.appearance.theme_mode = mode;
        self.commit(Change::Applied)
    }

    pub fn set_theme_color(&mut self, rgb: [u8; 3]) -> Result<Change, SettingsError> {
        let hex = format_hex_color(rgb);
        if self.settings.appearance.theme_color.eq_ignore_ascii_case(&hex) {
            return Ok(Change::Unchanged);
        }
        self.settings.appearance.theme_color = hex;
        self.commit(Change::Applied)
    }

    // The in-memory value stays applied even if the flush fails.
    fn commit(&self, change: Change) -> Result<Change, SettingsError> {
        self.save()?;
        Ok(change)
    }
}

/// Serialize `settings` as TOML and replace the file at `path`.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<(), SettingsError> {
    let body = toml::to_string_pretty(settings)?;
    let write_err = |source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    // Write next to the target, then rename over it.
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, body).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)?;
    log::debug!("settings saved to {}", path.display());
    Ok(())
}
