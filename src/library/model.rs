use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub display: String,
    pub properties: AudioProperties,
}

/// Stream properties reported by the container, when known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioProperties {
    pub format: Option<String>,
    pub bitrate_kbps: Option<u32>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u8>,
}

impl Track {
    /// A track with nothing but its path; the title comes from the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        Self {
            display: title.clone(),
            path,
            title,
            artist: None,
            album: None,
            duration: None,
            properties: AudioProperties::default(),
        }
    }
}
