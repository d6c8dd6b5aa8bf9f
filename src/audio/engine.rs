//! Player state machine driven by `AudioCmd`s.
//!
//! The engine owns the backend, keeps the authoritative `PlaybackInfo`,
//! mirrors it into the shared handle and emits a `MediaEvent` for every
//! observable change.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use super::backend::Backend;
use super::types::{
    AudioCmd, MAX_RATE, MIN_RATE, MediaEvent, MediaStatus, PlaybackHandle, PlaybackInfo,
    PlaybackState,
};

pub struct Engine<B: Backend> {
    backend: B,
    info: PlaybackInfo,
    shared: PlaybackHandle,
    events: Sender<MediaEvent>,
}

impl<B: Backend> Engine<B> {
    pub fn new(backend: B, shared: PlaybackHandle, events: Sender<MediaEvent>) -> Self {
        let info = shared.lock().map(|i| i.clone()).unwrap_or_default();
        let mut engine = Self {
            backend,
            info,
            shared,
            events,
        };
        engine.apply_gain();
        engine.backend.set_speed(engine.info.rate);
        engine
    }

    #[cfg(test)]
    pub fn info(&self) -> &PlaybackInfo {
        &self.info
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Apply one command. The thread loop additionally exits after `Quit`.
    pub fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::SetSource {
                path,
                duration_hint,
            } => self.set_source(path, duration_hint),
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::TogglePlay => {
                if self.info.is_playing() {
                    self.pause();
                } else {
                    self.play();
                }
            }
            AudioCmd::Stop => self.stop(),
            AudioCmd::SetPosition(pos) => self.set_position(pos),
            AudioCmd::SeekBy(secs) => {
                let cur = self.info.position;
                let delta = Duration::from_secs(u64::from(secs.unsigned_abs()));
                let target = if secs < 0 {
                    cur.saturating_sub(delta)
                } else {
                    cur + delta
                };
                self.set_position(target);
            }
            AudioCmd::SetVolume(v) => self.set_volume(v),
            AudioCmd::SetMuted(m) => self.set_muted(m),
            AudioCmd::SetPlaybackRate(r) => self.set_rate(r),
            AudioCmd::SetLooping(l) => {
                self.info.looping = l;
                self.publish();
            }
            AudioCmd::Quit { fade_out_ms } => self.shutdown(fade_out_ms),
        }
    }

    /// Periodic update: refresh the position and handle end of media.
    pub fn tick(&mut self) {
        if self.info.state != PlaybackState::Playing {
            return;
        }

        let pos = self.backend.position();
        let known = !self.info.duration.is_zero();
        let ended = self.backend.finished() || (known && pos >= self.info.duration);

        if !ended {
            if pos != self.info.position {
                self.info.position = pos;
                self.emit(MediaEvent::PositionChanged(pos));
                self.publish();
            }
            return;
        }

        if self.info.looping {
            log::debug!("end of media, looping");
            self.backend.stop();
            if let Err(e) = self.backend.play() {
                self.fail(e.to_string());
                return;
            }
            self.info.position = Duration::ZERO;
            self.emit(MediaEvent::Looped);
            self.emit(MediaEvent::PositionChanged(Duration::ZERO));
        } else {
            log::debug!("end of media");
            self.backend.stop();
            if known {
                self.info.position = self.info.duration;
                self.emit(MediaEvent::PositionChanged(self.info.duration));
            }
            self.set_state(PlaybackState::Stopped);
            self.set_status(MediaStatus::EndOfMedia);
        }
        self.publish();
    }

    /// Fade out over `fade_out_ms` and stop.
    pub fn shutdown(&mut self, fade_out_ms: u64) {
        if self.info.is_playing() && fade_out_ms > 0 {
            let steps: u64 = 20;
            let step_ms = (fade_out_ms / steps).max(1);
            let start = self.gain();
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                self.backend.set_gain(start * (1.0 - t));
                thread::sleep(Duration::from_millis(step_ms));
            }
        }
        self.backend.stop();
        // Update shared state so UI/MPRIS don't keep showing Playing.
        self.set_state(PlaybackState::Stopped);
        self.publish();
    }

    fn set_source(&mut self, path: PathBuf, duration_hint: Option<Duration>) {
        self.backend.stop();
        self.set_state(PlaybackState::Stopped);
        self.info.position = Duration::ZERO;

        match self.backend.open(&path) {
            Ok(total) => {
                let duration = total.or(duration_hint).unwrap_or(Duration::ZERO);
                log::info!("loaded {}", path.display());
                self.info.source = Some(path.clone());
                self.emit(MediaEvent::SourceChanged(Some(path)));
                self.info.duration = duration;
                self.emit(MediaEvent::DurationChanged(duration));
                self.emit(MediaEvent::PositionChanged(Duration::ZERO));
                self.set_status(MediaStatus::Loaded);
            }
            Err(e) => {
                log::warn!("cannot play {}: {e}", path.display());
                self.info.source = None;
                self.emit(MediaEvent::SourceChanged(None));
                self.info.duration = Duration::ZERO;
                self.emit(MediaEvent::DurationChanged(Duration::ZERO));
                self.set_status(MediaStatus::InvalidMedia);
                self.emit(MediaEvent::Error(e.to_string()));
            }
        }
        self.publish();
    }

    fn play(&mut self) {
        if self.info.source.is_none() || self.info.state == PlaybackState::Playing {
            return;
        }
        if let Err(e) = self.backend.play() {
            self.fail(e.to_string());
            return;
        }
        if self.info.status == MediaStatus::EndOfMedia {
            self.info.position = Duration::ZERO;
            self.emit(MediaEvent::PositionChanged(Duration::ZERO));
            self.set_status(MediaStatus::Loaded);
        }
        self.set_state(PlaybackState::Playing);
        self.publish();
    }

    fn pause(&mut self) {
        if self.info.state != PlaybackState::Playing {
            return;
        }
        self.backend.pause();
        self.info.position = self.backend.position();
        self.set_state(PlaybackState::Paused);
        self.publish();
    }

    fn stop(&mut self) {
        if self.info.state == PlaybackState::Stopped && self.info.position.is_zero() {
            return;
        }
        self.backend.stop();
        self.info.position = Duration::ZERO;
        self.emit(MediaEvent::PositionChanged(Duration::ZERO));
        self.set_state(PlaybackState::Stopped);
        self.publish();
    }

    fn set_position(&mut self, pos: Duration) {
        if self.info.source.is_none() {
            return;
        }
        let pos = if self.info.duration.is_zero() {
            pos
        } else {
            pos.min(self.info.duration)
        };

        // A stopped source has no sink to seek; load it paused first.
        if self.info.state == PlaybackState::Stopped {
            if let Err(e) = self.backend.play() {
                self.fail(e.to_string());
                return;
            }
            self.backend.pause();
            self.set_state(PlaybackState::Paused);
            if self.info.status == MediaStatus::EndOfMedia {
                self.set_status(MediaStatus::Loaded);
            }
        }

        if let Err(e) = self.backend.seek(pos) {
            log::warn!("{e}");
            self.emit(MediaEvent::Error(e.to_string()));
            return;
        }
        self.info.position = pos;
        self.emit(MediaEvent::PositionChanged(pos));
        self.publish();
    }

    fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(100);
        if volume == self.info.volume {
            return;
        }
        self.info.volume = volume;
        self.apply_gain();
        self.emit(MediaEvent::VolumeChanged(volume));
        self.publish();
    }

    fn set_muted(&mut self, muted: bool) {
        if muted == self.info.muted {
            return;
        }
        self.info.muted = muted;
        self.apply_gain();
        self.emit(MediaEvent::MutedChanged(muted));
        self.publish();
    }

    fn set_rate(&mut self, rate: f32) {
        if !rate.is_finite() {
            return;
        }
        let rate = rate.clamp(MIN_RATE, MAX_RATE);
        if (rate - self.info.rate).abs() < f32::EPSILON {
            return;
        }
        self.info.rate = rate;
        self.backend.set_speed(rate);
        self.emit(MediaEvent::PlaybackRateChanged(rate));
        self.publish();
    }

    fn gain(&self) -> f32 {
        if self.info.muted {
            0.0
        } else {
            f32::from(self.info.volume) / 100.0
        }
    }

    fn apply_gain(&mut self) {
        let gain = self.gain();
        self.backend.set_gain(gain);
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.info.state != state {
            self.info.state = state;
            self.emit(MediaEvent::StateChanged(state));
        }
    }

    fn set_status(&mut self, status: MediaStatus) {
        if self.info.status != status {
            self.info.status = status;
            self.emit(MediaEvent::StatusChanged(status));
        }
    }

    fn fail(&mut self, msg: String) {
        log::warn!("playback error: {msg}");
        self.backend.stop();
        self.set_state(PlaybackState::Stopped);
        self.set_status(MediaStatus::InvalidMedia);
        self.emit(MediaEvent::Error(msg));
        self.publish();
    }

    fn emit(&self, event: MediaEvent) {
        // The UI may already be gone during shutdown.
        let _ = self.events.send(event);
    }

    fn publish(&self) {
        if let Ok(mut shared) = self.shared.lock() {
            *shared = self.info.clone();
        }
    }
}
