//! Light and dark palettes, optional palette documents on disk, and the
//! mapping onto egui visuals.
//!
//! A palette document is a flat TOML table of `#rrggbb` strings; every key is
//! optional and missing keys keep the built-in value:
//!
//! ```toml
//! background = "#f3f3f3"
//! panel = "#fbfbfb"
//! card = "#ffffff"
//! text = "#1b1b1b"
//! weak_text = "#5f5f5f"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, CornerRadius, Stroke, Theme};
use serde::Deserialize;
use thiserror::Error;

use crate::config::{AppearanceSettings, DEFAULT_THEME_COLOR, ThemeMode, parse_hex_color};

/// Alpha applied to panel fills while the acrylic background is on.
const ACRYLIC_ALPHA: u8 = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub panel: Color32,
    pub card: Color32,
    pub text: Color32,
    pub weak_text: Color32,
}

impl Palette {
    pub fn builtin(dark: bool) -> Self {
        if dark {
            Self {
                background: Color32::from_rgb(0x20, 0x20, 0x20),
                panel: Color32::from_rgb(0x27, 0x27, 0x27),
                card: Color32::from_rgb(0x2d, 0x2d, 0x2d),
                text: Color32::from_rgb(0xf0, 0xf0, 0xf0),
                weak_text: Color32::from_rgb(0xa0, 0xa0, 0xa0),
            }
        } else {
            Self {
                background: Color32::from_rgb(0xf3, 0xf3, 0xf3),
                panel: Color32::from_rgb(0xf9, 0xf9, 0xf9),
                card: Color32::from_rgb(0xff, 0xff, 0xff),
                text: Color32::from_rgb(0x1b, 0x1b, 0x1b),
                weak_text: Color32::from_rgb(0x5f, 0x5f, 0x5f),
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid palette document: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("`{key}` is not a #rrggbb color: {value:?}")]
    Color { key: &'static str, value: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PaletteDocument {
    background: Option<String>,
    panel: Option<String>,
    card: Option<String>,
    text: Option<String>,
    weak_text: Option<String>,
}

/// Overlay the colors in `text` on top of `base`.
pub fn parse_palette(text: &str, base: Palette) -> Result<Palette, ThemeError> {
    let doc: PaletteDocument = toml::from_str(text)?;

    let pick = |key: &'static str, value: Option<String>, fallback: Color32| match value {
        None => Ok(fallback),
        Some(v) => parse_hex_color(&v)
            .map(|[r, g, b]| Color32::from_rgb(r, g, b))
            .ok_or(ThemeError::Color { key, value: v }),
    };

    Ok(Palette {
        background: pick("background", doc.background, base.background)?,
        panel: pick("panel", doc.panel, base.panel)?,
        card: pick("card", doc.card, base.card)?,
        text: pick("text", doc.text, base.text)?,
        weak_text: pick("weak_text", doc.weak_text, base.weak_text)?,
    })
}

/// Directories searched for `themes/` and `assets/`, in priority order.
pub fn resource_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(dir) = env::var_os("MUSE_THEME_DIR") {
        dirs.push(PathBuf::from(dir));
    }
    if let Some(dir) = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(dir);
    }
    if let Ok(dir) = env::current_dir() {
        dirs.push(dir);
    }
    dirs
}

/// First existing `<dir>/<sub>/<name>` among `dirs`.
pub fn find_resource(dirs: &[PathBuf], sub: &str, name: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|d| d.join(sub).join(name))
        .find(|p| p.is_file())
}

/// The built-in palette with `themes/<light|dark>.toml` applied, if found.
pub fn load_palette(dark: bool, dirs: &[PathBuf]) -> Palette {
    let base = Palette::builtin(dark);
    let name = if dark { "dark.toml" } else { "light.toml" };

    let Some(path) = find_resource(dirs, "themes", name) else {
        return base;
    };
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            log::warn!("cannot read {}: {e}", path.display());
            return base;
        }
    };
    match parse_palette(&text, base) {
        Ok(p) => {
            log::debug!("palette loaded from {}", path.display());
            p
        }
        Err(e) => {
            log::warn!("{}: {e}; using built-in palette", path.display());
            base
        }
    }
}

/// Whether the dark palette applies. `Auto` follows the OS and falls back to
/// light when the OS does not say.
pub fn is_dark(mode: ThemeMode, system: Option<Theme>) -> bool {
    match mode {
        ThemeMode::Light => false,
        ThemeMode::Dark => true,
        ThemeMode::Auto => system == Some(Theme::Dark),
    }
}

pub fn accent_color(appearance: &AppearanceSettings) -> Color32 {
    let [r, g, b] = parse_hex_color(&appearance.theme_color)
        .or_else(|| parse_hex_color(DEFAULT_THEME_COLOR))
        .unwrap_or([0x00, 0x9f, 0xaa]);
    Color32::from_rgb(r, g, b)
}

pub fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Everything that decides the look; restyling happens when it changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look {
    pub dark: bool,
    pub accent: Color32,
    pub acrylic: bool,
    pub palette: Palette,
}

impl Look {
    pub fn visuals(&self) -> egui::Visuals {
        let p = &self.palette;
        let fill = |c: Color32| if self.acrylic { with_alpha(c, ACRYLIC_ALPHA) } else { c };

        let mut v = if self.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        v.panel_fill = fill(p.panel);
        v.window_fill = p.card;
        v.extreme_bg_color = fill(p.background);
        v.faint_bg_color = p.card;
        v.override_text_color = Some(p.text);
        v.hyperlink_color = self.accent;
        v.selection.bg_fill = self.accent;
        v.selection.stroke = Stroke::new(1.0, p.text);

        let radius = CornerRadius::same(6);
        v.widgets.inactive.corner_radius = radius;
        v.widgets.hovered.corner_radius = radius;
        v.widgets.active.corner_radius = radius;
        v.widgets.active.bg_fill = self.accent;
        v.widgets.active.weak_bg_fill = self.accent;
        v.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        v.window_corner_radius = CornerRadius::same(8);
        v
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let theme = if self.dark { Theme::Dark } else { Theme::Light };
        ctx.set_theme(theme);
        ctx.set_visuals_of(theme, self.visuals());
        log::debug!(
            "restyled: dark={} acrylic={} accent={:?}",
            self.dark,
            self.acrylic,
            self.accent
        );
    }
}
