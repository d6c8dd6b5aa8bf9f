//! Track metadata, cover art and music-folder scanning.
//!
//! Everything here goes through `lofty`; reads that fail degrade to
//! filename-derived metadata and placeholder artwork.

mod cover;
mod model;
mod probe;
mod scan;

pub use cover::{CoverArt, decode_cover, pick_cover, resolve_cover};
pub use model::{AudioProperties, Track};
pub use probe::{make_display, probe};
pub use scan::{has_extension, scan};
