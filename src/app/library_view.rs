//! State of the List page: the scanned tracks, the filter box and the
//! selection.

use std::path::{Path, PathBuf};

use crate::library::Track;

#[derive(Debug, Default)]
pub struct LibraryView {
    tracks: Vec<Track>,
    /// Folder the current list was scanned from.
    folder: Option<PathBuf>,
    pub selected: Option<usize>,
    pub filter_query: String,
    lower_titles: Option<Vec<String>>,
}

impl LibraryView {
    pub fn new(tracks: Vec<Track>, folder: Option<PathBuf>) -> Self {
        let mut view = Self::default();
        view.replace(tracks, folder);
        view
    }

    /// Swap in a fresh scan. Selection is kept only if the same file is
    /// still present.
    pub fn replace(&mut self, tracks: Vec<Track>, folder: Option<PathBuf>) {
        let previous = self.selected_track().map(|t| t.path.clone());

        // Larger libraries get precomputed lowercase titles so filtering does
        // not lowercase every title on every keystroke.
        self.lower_titles = (tracks.len() > 100).then(|| {
            tracks
                .iter()
                .map(|t| t.display.to_ascii_lowercase())
                .collect()
        });
        self.tracks = tracks;
        self.folder = folder;
        self.selected = previous.and_then(|p| self.index_of(&p));
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// True when the list was not scanned from `folder`.
    pub fn is_stale(&self, folder: &Path) -> bool {
        self.folder.as_deref() != Some(folder)
    }

    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.tracks.iter().position(|t| t.path == path)
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.selected.and_then(|i| self.tracks.get(i))
    }

    pub fn select(&mut self, idx: usize) {
        if idx < self.tracks.len() {
            self.selected = Some(idx);
        }
    }

    /// Indices of the tracks matching the filter, in list order.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim();
        if query.is_empty() {
            return (0..self.tracks.len()).collect();
        }

        match self.lower_titles.as_deref() {
            Some(lower_titles) => {
                let query_lower = query.to_ascii_lowercase();
                (0..self.tracks.len())
                    .filter(|&i| fuzzy_match_positions_lower(&lower_titles[i], &query_lower).is_some())
                    .collect()
            }
            None => (0..self.tracks.len())
                .filter(|&i| fuzzy_match_positions(&self.tracks[i].display, query).is_some())
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn uses_lower_titles(&self) -> bool {
        self.lower_titles.is_some()
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter_query = query.into();
        self.ensure_selected_visible();
    }

    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
    }

    /// Move the selection to the next visible track, wrapping around.
    pub fn next(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        let pos = self
            .selected
            .and_then(|s| display.iter().position(|&i| i == s));
        self.selected = Some(match pos {
            Some(p) => display[(p + 1) % display.len()],
            None => display[0],
        });
    }

    /// Move the selection to the previous visible track, wrapping around.
    pub fn prev(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        let last = display[display.len() - 1];
        let pos = self
            .selected
            .and_then(|s| display.iter().position(|&i| i == s));
        self.selected = Some(match pos {
            Some(0) | None => last,
            Some(p) => display[p - 1],
        });
    }

    // A selection hidden by the filter moves to the first visible track.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        match self.selected {
            Some(s) if display.contains(&s) => {}
            Some(_) => self.selected = display.first().copied(),
            None => {}
        }
    }
}

/// Subsequence match: the char positions in `title` that match `query`
/// (ASCII case-insensitive), or `None`.
pub fn fuzzy_match_positions(title: &str, query: &str) -> Option<Vec<usize>> {
    let mut positions = Vec::new();
    let mut title_iter = title.chars().enumerate();

    for qc in query.chars() {
        let qc = qc.to_ascii_lowercase();
        let (ti, _) = title_iter.find(|(_, tc)| tc.to_ascii_lowercase() == qc)?;
        positions.push(ti);
    }
    Some(positions)
}

fn fuzzy_match_positions_lower(title_lower: &str, query_lower: &str) -> Option<Vec<usize>> {
    let mut positions = Vec::new();
    let mut title_iter = title_lower.chars().enumerate();

    for qc in query_lower.chars() {
        let (ti, _) = title_iter.find(|(_, tc)| *tc == qc)?;
        positions.push(ti);
    }
    Some(positions)
}
