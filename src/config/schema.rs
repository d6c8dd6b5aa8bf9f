use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, de};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/museplayer/config.toml` or
/// `~/.config/museplayer/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MUSE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub folders: FolderSettings,
    pub main_window: MainWindowSettings,
    pub update: UpdateSettings,
    pub appearance: AppearanceSettings,
    pub audio: AudioSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderSettings {
    /// Where the file picker starts and what the List page scans.
    pub music: PathBuf,
}

impl Default for FolderSettings {
    fn default() -> Self {
        Self {
            music: PathBuf::from("music"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MainWindowSettings {
    /// Translucent window background.
    pub enable_acrylic_background: bool,
    /// UI scale factor. Only read at startup.
    pub dpi_scale: DpiScale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateSettings {
    pub check_update_at_startup: bool,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            check_update_at_startup: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceSettings {
    pub theme_mode: ThemeMode,
    /// Accent color as `#rrggbb`.
    pub theme_color: String,
}

pub const DEFAULT_THEME_COLOR: &str = "#009faa";

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::Light,
            theme_color: DEFAULT_THEME_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume (0..=100) the player starts with.
    pub initial_volume: u8,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Seconds jumped by the skip-back button.
    pub skip_back_seconds: u32,
    /// Seconds jumped by the skip-forward button.
    pub skip_forward_seconds: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 30,
            quit_fade_out_ms: 300,
            skip_back_seconds: 10,
            skip_forward_seconds: 30,
        }
    }
}

/// Extensions offered by the file picker and picked up by the library scan.
pub const SUPPORTED_EXTENSIONS: [&str; 9] = [
    "mp3", "wma", "wav", "ogg", "m4a", "ape", "flac", "cue", "aac",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    #[serde(alias = "system")]
    Auto,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Auto];

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
            ThemeMode::Auto => "Use system setting",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub enum DpiScale {
    #[serde(rename = "1")]
    X100,
    #[serde(rename = "1.25")]
    X125,
    #[serde(rename = "1.5")]
    X150,
    #[serde(rename = "1.75")]
    X175,
    #[serde(rename = "2")]
    X200,
    #[default]
    #[serde(rename = "auto")]
    Auto,
}

impl DpiScale {
    pub const ALL: [DpiScale; 6] = [
        DpiScale::X100,
        DpiScale::X125,
        DpiScale::X150,
        DpiScale::X175,
        DpiScale::X200,
        DpiScale::Auto,
    ];

    /// Fixed zoom factor, or `None` to follow the platform.
    pub fn factor(self) -> Option<f32> {
        match self {
            DpiScale::X100 => Some(1.0),
            DpiScale::X125 => Some(1.25),
            DpiScale::X150 => Some(1.5),
            DpiScale::X175 => Some(1.75),
            DpiScale::X200 => Some(2.0),
            DpiScale::Auto => None,
        }
    }

    /// Accepts `auto` (any case) or a factor such as `1.25` / `"1.25"`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("auto") {
            return Some(DpiScale::Auto);
        }
        text.parse::<f64>().ok().and_then(Self::from_factor)
    }

    pub fn from_factor(factor: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| {
            s.factor()
                .is_some_and(|f| (f64::from(f) - factor).abs() < 1e-6)
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            DpiScale::X100 => "100%",
            DpiScale::X125 => "125%",
            DpiScale::X150 => "150%",
            DpiScale::X175 => "175%",
            DpiScale::X200 => "200%",
            DpiScale::Auto => "Use system setting",
        }
    }
}

// The file stores strings, but numeric env overrides arrive as numbers.
impl<'de> Deserialize<'de> for DpiScale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        let scale = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => DpiScale::from_factor(n),
            Raw::Text(t) => DpiScale::parse(&t),
        };
        scale.ok_or_else(|| {
            de::Error::custom("expected auto, 1, 1.25, 1.5, 1.75 or 2")
        })
    }
}

/// Parse `#rrggbb` (leading `#` optional) into RGB bytes.
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub fn format_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}
