//! The seam between the engine and the actual audio output.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::sink::create_sink_at;
use super::types::MediaError;

/// Output operations the engine relies on.
///
/// `open` leaves the source paused at zero. `play` after `stop` (or after the
/// source drained) starts again from zero.
pub trait Backend {
    fn open(&mut self, path: &Path) -> Result<Option<Duration>, MediaError>;
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, position: Duration) -> Result<(), MediaError>;
    fn position(&self) -> Duration;
    /// True once a started source has nothing left to play.
    fn finished(&self) -> bool;
    /// Linear gain, 0.0..=1.0.
    fn set_gain(&mut self, gain: f32);
    fn set_speed(&mut self, speed: f32);
}

pub struct RodioBackend {
    stream: OutputStream,
    sink: Option<Sink>,
    path: Option<PathBuf>,
    // Where the current sink started inside the file; `get_pos` counts from there.
    offset: Duration,
    gain: f32,
    speed: f32,
}

impl RodioBackend {
    pub fn open_default() -> Result<Self, MediaError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| MediaError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped; we log ourselves.
        stream.log_on_drop(false);
        Ok(Self {
            stream,
            sink: None,
            path: None,
            offset: Duration::ZERO,
            gain: 1.0,
            speed: 1.0,
        })
    }

    fn load_at(&mut self, start_at: Duration) -> Result<Option<Duration>, MediaError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(None);
        };
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let (sink, total) = create_sink_at(&self.stream, path, start_at)?;
        sink.set_volume(self.gain);
        sink.set_speed(self.speed);
        self.sink = Some(sink);
        self.offset = start_at;
        Ok(total)
    }
}

impl Backend for RodioBackend {
    fn open(&mut self, path: &Path) -> Result<Option<Duration>, MediaError> {
        self.path = Some(path.to_path_buf());
        let loaded = self.load_at(Duration::ZERO);
        if loaded.is_err() {
            self.path = None;
        }
        loaded
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let drained = self.sink.as_ref().is_none_or(|s| s.empty());
        if drained {
            self.load_at(Duration::ZERO)?;
        }
        if let Some(s) = &self.sink {
            s.play();
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };
        match sink.try_seek(position) {
            Ok(()) => {
                self.offset = Duration::ZERO;
                return Ok(());
            }
            Err(e) => log::debug!("try_seek failed ({e}), reopening at {position:?}"),
        }

        // Not every decoder can seek; rebuild the sink and skip into the file.
        let was_paused = sink.is_paused();
        self.load_at(position)
            .map_err(|e| MediaError::Seek(e.to_string()))?;
        if !was_paused {
            if let Some(s) = &self.sink {
                s.play();
            }
        }
        Ok(())
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |s| self.offset + s.get_pos())
    }

    fn finished(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| s.empty())
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
        if let Some(s) = &self.sink {
            s.set_volume(self.gain);
        }
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        if let Some(s) = &self.sink {
            s.set_speed(speed);
        }
    }
}
