//! Cover-art resolution.
//!
//! Pictures are taken from the generic (primary) tag first, then from the
//! format-specific tags that carry artwork: ID3v2 `APIC` frames and MP4 `covr`
//! atoms. Every failure ends in `CoverArt::Placeholder`; nothing is reported
//! to the user.

use std::path::Path;

use image::RgbaImage;
use lofty::file::TaggedFileExt;
use lofty::picture::{Picture, PictureType};
use lofty::tag::{Tag, TagType};

/// Tag types checked after the primary tag, in order.
const FORMAT_TAGS: [TagType; 2] = [TagType::Id3v2, TagType::Mp4Ilst];

/// What the play page should show for the current track.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverArt {
    /// Decoded embedded artwork.
    Embedded(RgbaImage),
    /// Theme-appropriate stand-in.
    Placeholder,
}

impl CoverArt {
    #[cfg(test)]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, CoverArt::Placeholder)
    }
}

/// Extract and decode the cover of the file at `path`.
pub fn resolve_cover(path: &Path) -> CoverArt {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            log::debug!("cover: cannot read {}: {e}", path.display());
            return CoverArt::Placeholder;
        }
    };

    let Some(picture) = pick_cover(tagged.primary_tag(), tagged.tags()) else {
        log::debug!("cover: no embedded picture in {}", path.display());
        return CoverArt::Placeholder;
    };

    match decode_cover(picture.data()) {
        Some(img) => CoverArt::Embedded(img),
        None => {
            log::debug!("cover: undecodable picture in {}", path.display());
            CoverArt::Placeholder
        }
    }
}

/// Choose the picture to display from a file's tags.
pub fn pick_cover<'a>(primary: Option<&'a Tag>, tags: &'a [Tag]) -> Option<&'a Picture> {
    if let Some(p) = primary.and_then(best_picture) {
        return Some(p);
    }

    FORMAT_TAGS.iter().find_map(|ty| {
        tags.iter()
            .filter(|t| t.tag_type() == *ty)
            .find_map(best_picture)
    })
}

// Front cover wins; otherwise whatever comes first.
fn best_picture(tag: &Tag) -> Option<&Picture> {
    let pictures = tag.pictures();
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
        .filter(|p| !p.data().is_empty())
}

/// Decode raw picture bytes (PNG, JPEG, ...) into RGBA.
pub fn decode_cover(bytes: &[u8]) -> Option<RgbaImage> {
    image::load_from_memory(bytes)
        .ok()
        .map(|img| img.to_rgba8())
        .filter(|img| img.width() > 0 && img.height() > 0)
}
