//! Turns `CoverArt` into a GPU texture, including the theme placeholder.

use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, ColorImage, TextureHandle, TextureOptions};
use image::{Rgba, RgbaImage};

use crate::library::{CoverArt, decode_cover};

use super::theme::find_resource;

const PLACEHOLDER_SIZE: u32 = 128;

pub fn to_color_image(img: &RgbaImage) -> ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, img.as_raw())
}

/// `assets/album_<light|dark>.png` if present, otherwise a drawn stand-in.
pub fn placeholder_image(dark: bool, accent: Color32, dirs: &[PathBuf]) -> RgbaImage {
    let name = if dark { "album_dark.png" } else { "album_light.png" };
    if let Some(path) = find_resource(dirs, "assets", name) {
        match std::fs::read(&path).ok().and_then(|b| decode_cover(&b)) {
            Some(img) => return img,
            None => log::warn!("cannot decode placeholder {}", path.display()),
        }
    }
    generated_placeholder(dark, accent, PLACEHOLDER_SIZE)
}

/// A record: concentric grooves on the theme background with an accent label.
pub fn generated_placeholder(dark: bool, accent: Color32, size: u32) -> RgbaImage {
    let (bg, groove) = if dark {
        ([0x3a, 0x3a, 0x3a], [0x2c, 0x2c, 0x2c])
    } else {
        ([0xe6, 0xe6, 0xe6], [0xd2, 0xd2, 0xd2])
    };
    let label = [accent.r(), accent.g(), accent.b()];
    let c = (size as f32 - 1.0) / 2.0;
    let outer = size as f32 * 0.46;
    let inner = size as f32 * 0.16;
    let hole = size as f32 * 0.03;

    RgbaImage::from_fn(size, size, |x, y| {
        let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
        let [r, g, b] = if d <= hole {
            bg
        } else if d <= inner {
            label
        } else if d <= outer && ((d / 3.0) as u32) % 2 == 0 {
            groove
        } else if d <= outer {
            [groove[0] / 2 + bg[0] / 2, groove[1] / 2 + bg[1] / 2, groove[2] / 2 + bg[2] / 2]
        } else {
            bg
        };
        Rgba([r, g, b, 0xff])
    })
}

#[derive(Debug, Clone, PartialEq)]
enum ArtKey {
    Embedded(Option<PathBuf>),
    Placeholder { dark: bool, accent: Color32 },
}

/// Texture cache for the play page cover.
#[derive(Default)]
pub struct Artwork {
    texture: Option<TextureHandle>,
    key: Option<ArtKey>,
}

impl Artwork {
    /// Texture for `cover` of `source`; re-uploaded only when the source or
    /// (for the placeholder) the look changes.
    pub fn texture(
        &mut self,
        ctx: &egui::Context,
        source: Option<&Path>,
        cover: Option<&CoverArt>,
        dark: bool,
        accent: Color32,
        dirs: &[PathBuf],
    ) -> &TextureHandle {
        let embedded = match cover {
            Some(CoverArt::Embedded(img)) => Some(img),
            _ => None,
        };
        let key = match embedded {
            Some(_) => ArtKey::Embedded(source.map(Path::to_path_buf)),
            None => ArtKey::Placeholder { dark, accent },
        };

        let stale = self.key.as_ref() != Some(&key);
        let texture = match self.texture.take() {
            Some(t) if !stale => t,
            _ => {
                let image = match embedded {
                    Some(img) => to_color_image(img),
                    None => to_color_image(&placeholder_image(dark, accent, dirs)),
                };
                ctx.load_texture("play.cover", image, TextureOptions::LINEAR)
            }
        };
        self.key = Some(key);
        self.texture.insert(texture)
    }

    #[cfg(test)]
    pub fn showing_placeholder(&self) -> bool {
        matches!(self.key, Some(ArtKey::Placeholder { .. }))
    }
}
