//! Audio-related small types and handles.
//!
//! This module defines the commands accepted by the audio thread, the
//! notifications it emits, and the playback snapshot it shares with the UI.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

/// Transport state of the current source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Whether the current source is usable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MediaStatus {
    #[default]
    NoMedia,
    Loaded,
    EndOfMedia,
    InvalidMedia,
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source. `duration_hint` is used when the decoder
    /// cannot tell the length up-front.
    SetSource {
        path: PathBuf,
        duration_hint: Option<Duration>,
    },
    Play,
    Pause,
    /// Pause when playing, play otherwise.
    TogglePlay,
    /// Stop and rewind to the start.
    Stop,
    /// Jump to an absolute position.
    SetPosition(Duration),
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i32),
    /// Volume in percent; clamped to 100.
    SetVolume(u8),
    SetMuted(bool),
    SetPlaybackRate(f32),
    /// Restart from the beginning when the source ends.
    SetLooping(bool),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Change notifications re-emitted by the player.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    SourceChanged(Option<PathBuf>),
    DurationChanged(Duration),
    PositionChanged(Duration),
    StateChanged(PlaybackState),
    StatusChanged(MediaStatus),
    VolumeChanged(u8),
    MutedChanged(bool),
    PlaybackRateChanged(f32),
    /// The source ended and was restarted because looping is on.
    Looped,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    pub source: Option<PathBuf>,
    pub position: Duration,
    /// Zero when unknown.
    pub duration: Duration,
    pub state: PlaybackState,
    pub status: MediaStatus,
    pub volume: u8,
    pub muted: bool,
    pub rate: f32,
    pub looping: bool,
}

impl PlaybackInfo {
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Time left in the current source, saturating at zero.
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.position)
    }
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            source: None,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            state: PlaybackState::Stopped,
            status: MediaStatus::NoMedia,
            volume: 100,
            muted: false,
            rate: 1.0,
            looping: false,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Slowest and fastest accepted playback rates.
pub const MIN_RATE: f32 = 0.25;
pub const MAX_RATE: f32 = 4.0;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no audio output device: {0}")]
    Output(String),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("seek failed: {0}")]
    Seek(String),
}
