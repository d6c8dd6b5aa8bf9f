use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::library::{self, CoverArt, Track};

/// Pivot pages, in tab order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Play,
    List,
    Settings,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Play, Page::List, Page::Settings];

    pub fn label(self) -> &'static str {
        match self {
            Page::Play => "Play",
            Page::List => "List",
            Page::Settings => "Settings",
        }
    }
}

/// Playback rates offered by the speed menu.
pub const SPEED_OPTIONS: [f32; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

pub fn speed_label(rate: f32) -> String {
    format!("{rate}×")
}

/// Format a `Duration` as `H:MM:SS`.
pub fn format_hms(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// The file the play page is showing: its metadata and artwork.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub track: Track,
    pub cover: CoverArt,
}

impl NowPlaying {
    /// Probe `path` and resolve its cover. Never fails; unreadable files get
    /// filename metadata and the placeholder.
    pub fn open(path: &Path) -> Self {
        Self {
            track: library::probe(path),
            cover: library::resolve_cover(path),
        }
    }

    pub fn title(&self) -> &str {
        &self.track.title
    }

    /// Artist and album joined for the subtitle line.
    pub fn subtitle(&self) -> String {
        let parts: Vec<&str> = [self.track.artist.as_deref(), self.track.album.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        parts.join(" · ")
    }

    /// Rows of the properties window.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        let t = &self.track;
        let p = &t.properties;
        let unknown = || "Unknown".to_string();
        vec![
            ("Path", t.path.display().to_string()),
            ("Title", t.title.clone()),
            ("Artist", t.artist.clone().unwrap_or_else(unknown)),
            ("Album", t.album.clone().unwrap_or_else(unknown)),
            ("Duration", t.duration.map(format_hms).unwrap_or_else(unknown)),
            ("Format", p.format.clone().unwrap_or_else(unknown)),
            (
                "Bitrate",
                p.bitrate_kbps
                    .map(|b| format!("{b} kbps"))
                    .unwrap_or_else(unknown),
            ),
            (
                "Sample rate",
                p.sample_rate
                    .map(|r| format!("{r} Hz"))
                    .unwrap_or_else(unknown),
            ),
            (
                "Channels",
                p.channels.map(|c| c.to_string()).unwrap_or_else(unknown),
            ),
        ]
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient banner shown above the pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: String,
    pub expires_at: Instant,
}

/// How long a notice stays up.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);
const MAX_NOTICES: usize = 3;

#[derive(Debug, Default)]
pub struct Notices {
    items: VecDeque<Notice>,
}

impl Notices {
    pub fn push(&mut self, level: NoticeLevel, title: impl Into<String>, text: impl Into<String>) {
        self.push_at(level, title, text, Instant::now());
    }

    pub fn push_at(
        &mut self,
        level: NoticeLevel,
        title: impl Into<String>,
        text: impl Into<String>,
        now: Instant,
    ) {
        if self.items.len() == MAX_NOTICES {
            self.items.pop_front();
        }
        self.items.push_back(Notice {
            level,
            title: title.into(),
            text: text.into(),
            expires_at: now + NOTICE_TTL,
        });
    }

    /// Drop expired notices. Returns true if any are still visible.
    pub fn prune(&mut self, now: Instant) -> bool {
        self.items.retain(|n| n.expires_at > now);
        !self.items.is_empty()
    }

    pub fn dismiss(&mut self, index: usize) {
        self.items.remove(index);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
