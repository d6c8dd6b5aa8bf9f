use std::{
    env, fs,
    path::{Path, PathBuf},
};

use ::config::{Config, ConfigError};
use serde::{Serialize, de::DeserializeOwned};

use super::error::SettingsError;
use super::schema::{AppearanceSettings, AudioSettings, FolderSettings, Settings, parse_hex_color};

/// Configuration loading helpers.
///
/// `Settings::load_from` reads the optional config file first, then lets
/// environment variables (prefix `MUSE__`) override it, and falls back to
/// struct defaults.
impl Settings {
    /// Load settings from `path` (if any) and the environment.
    pub fn load_from(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MUSE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        Ok(Settings {
            folders: load_section(&cfg, "folders"),
            main_window: load_section(&cfg, "main_window"),
            update: load_section(&cfg, "update"),
            appearance: load_section(&cfg, "appearance"),
            audio: load_section(&cfg, "audio"),
            library: load_section(&cfg, "library"),
        })
    }

    /// Perform validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if let Err(msg) = validate_music_folder(&self.folders.music) {
            problems.push(msg);
        }
        if parse_hex_color(&self.appearance.theme_color).is_none() {
            problems.push(format!(
                "appearance.theme_color must be #rrggbb, got {:?}",
                self.appearance.theme_color
            ));
        }
        if self.audio.initial_volume > 100 {
            problems.push("audio.initial_volume must be <= 100".to_string());
        }
        if self.audio.skip_back_seconds == 0 || self.audio.skip_forward_seconds == 0 {
            problems.push("audio skip intervals must be >= 1".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }

    /// Repair invalid fields in place. Returns `true` if anything changed.
    ///
    /// A missing music folder is created; if that fails the default is used.
    pub fn correct(&mut self) -> bool {
        let before = self.clone();

        if validate_music_folder(&self.folders.music).is_err()
            && fs::create_dir_all(&self.folders.music).is_err()
        {
            self.folders = FolderSettings::default();
            let _ = fs::create_dir_all(&self.folders.music);
        }
        if parse_hex_color(&self.appearance.theme_color).is_none() {
            self.appearance.theme_color = AppearanceSettings::default().theme_color;
        }
        self.audio.initial_volume = self.audio.initial_volume.min(100);
        let defaults = AudioSettings::default();
        if self.audio.skip_back_seconds == 0 {
            self.audio.skip_back_seconds = defaults.skip_back_seconds;
        }
        if self.audio.skip_forward_seconds == 0 {
            self.audio.skip_forward_seconds = defaults.skip_forward_seconds;
        }

        *self != before
    }
}

/// Read one settings section. A field that does not deserialize keeps its
/// default; the rest of the section (and the document) still loads.
fn load_section<T>(cfg: &Config, name: &str) -> T
where
    T: Default + Serialize + DeserializeOwned,
{
    match cfg.get::<T>(name) {
        Ok(section) => return section,
        Err(ConfigError::NotFound(_)) => return T::default(),
        Err(e) => log::warn!("{name}: {e}; checking fields one by one"),
    }

    let mut table = match toml::Value::try_from(T::default()) {
        Ok(toml::Value::Table(t)) => t,
        _ => return T::default(),
    };
    let fields = match cfg.get_table(name) {
        Ok(fields) => fields,
        Err(e) => {
            log::warn!("{name}: {e}; using defaults");
            return T::default();
        }
    };

    for (key, value) in fields {
        let accepted = value
            .try_deserialize::<toml::Value>()
            .ok()
            .map(|v| {
                let mut candidate = table.clone();
                candidate.insert(key.clone(), v);
                candidate
            })
            .filter(|candidate| toml::Value::Table(candidate.clone()).try_into::<T>().is_ok());
        match accepted {
            Some(candidate) => table = candidate,
            None => log::warn!("ignoring invalid setting {name}.{key}; using default"),
        }
    }

    toml::Value::Table(table).try_into().unwrap_or_default()
}

/// The music folder must name an existing directory.
pub fn validate_music_folder(path: &Path) -> Result<(), String> {
    if path.as_os_str().is_empty() {
        return Err("folders.music must not be empty".to_string());
    }
    if !path.is_dir() {
        return Err(format!(
            "folders.music is not a directory: {}",
            path.display()
        ));
    }
    Ok(())
}

/// Resolve the config path from `MUSE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MUSE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/museplayer/config.toml`
/// or `~/.config/museplayer/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        env::var_os("APPDATA").map(PathBuf::from)
    };

    config_home.map(|d| d.join("museplayer").join("config.toml"))
}
