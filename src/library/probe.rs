use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::Accessor;

use super::model::Track;

/// Build the list label: `Artist - Title`, or just the title.
pub fn make_display(title: &str, artist: Option<&str>) -> String {
    match artist {
        Some(a) if !a.trim().is_empty() => format!("{} - {}", a.trim(), title),
        _ => title.to_string(),
    }
}

/// Read tags and stream properties for `path`.
///
/// Never fails: anything lofty cannot read leaves the filename-derived
/// defaults in place.
pub fn probe(path: &Path) -> Track {
    let mut track = Track::from_path(path);

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let props = tagged.properties();
            let duration = props.duration();
            if !duration.is_zero() {
                track.duration = Some(duration);
            }
            track.properties.format = Some(format!("{:?}", tagged.file_type()));
            track.properties.bitrate_kbps = props.audio_bitrate().or(props.overall_bitrate());
            track.properties.sample_rate = props.sample_rate();
            track.properties.channels = props.channels();

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title() {
                    if !v.trim().is_empty() {
                        track.title = v.trim().to_string();
                    }
                }
                if let Some(v) = tag.artist() {
                    let v = v.trim();
                    if !v.is_empty() {
                        track.artist = Some(v.to_string());
                    }
                }
                if let Some(v) = tag.album() {
                    let v = v.trim();
                    if !v.is_empty() {
                        track.album = Some(v.to_string());
                    }
                }
            }
        }
        Err(e) => log::debug!("no metadata for {}: {e}", path.display()),
    }

    track.display = make_display(&track.title, track.artist.as_deref());
    track
}
