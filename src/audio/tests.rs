use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::backend::Backend;
use super::engine::Engine;
use super::types::*;

/// In-memory backend: time only moves when a test says so.
#[derive(Default)]
struct FakeBackend {
    path: Option<PathBuf>,
    total: Option<Duration>,
    reject_open: bool,
    loaded: bool,
    playing: bool,
    pos: Duration,
    drained: bool,
    gain: f32,
    speed: f32,
    plays: usize,
}

impl FakeBackend {
    fn with_total(total: Duration) -> Self {
        Self {
            total: Some(total),
            ..Self::default()
        }
    }

    fn advance_to(&mut self, pos: Duration) {
        self.pos = pos;
        if self.total.is_some_and(|t| pos >= t) {
            self.drained = true;
            self.playing = false;
        }
    }
}

impl Backend for FakeBackend {
    fn open(&mut self, path: &Path) -> Result<Option<Duration>, MediaError> {
        if self.reject_open {
            return Err(MediaError::Decode {
                path: path.to_path_buf(),
                reason: "unsupported".into(),
            });
        }
        self.path = Some(path.to_path_buf());
        self.loaded = true;
        self.playing = false;
        self.pos = Duration::ZERO;
        self.drained = false;
        Ok(self.total)
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if !self.loaded || self.drained {
            self.loaded = true;
            self.drained = false;
            self.pos = Duration::ZERO;
        }
        self.playing = true;
        self.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.loaded = false;
        self.pos = Duration::ZERO;
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        self.pos = position;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.pos
    }

    fn finished(&self) -> bool {
        self.drained
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}

fn engine_with(backend: FakeBackend) -> (Engine<FakeBackend>, PlaybackHandle, Receiver<MediaEvent>) {
    let shared: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
    let (tx, rx) = mpsc::channel();
    (Engine::new(backend, shared.clone(), tx), shared, rx)
}

fn loaded_engine(total_secs: u64) -> (Engine<FakeBackend>, PlaybackHandle, Receiver<MediaEvent>) {
    let (mut engine, shared, rx) = engine_with(FakeBackend::with_total(Duration::from_secs(total_secs)));
    engine.handle(AudioCmd::SetSource {
        path: PathBuf::from("song.mp3"),
        duration_hint: None,
    });
    drain(&rx);
    (engine, shared, rx)
}

fn drain(rx: &Receiver<MediaEvent>) -> Vec<MediaEvent> {
    rx.try_iter().collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn set_source_announces_path_duration_and_status() {
    let (mut engine, shared, rx) = engine_with(FakeBackend::with_total(Duration::from_secs(200)));
    engine.handle(AudioCmd::SetSource {
        path: PathBuf::from("a.flac"),
        duration_hint: None,
    });

    let events = drain(&rx);
    assert!(events.contains(&MediaEvent::SourceChanged(Some(PathBuf::from("a.flac")))));
    assert!(events.contains(&MediaEvent::DurationChanged(Duration::from_secs(200))));
    assert!(events.contains(&MediaEvent::StatusChanged(MediaStatus::Loaded)));

    let info = shared.lock().unwrap().clone();
    assert_eq!(info.source, Some(PathBuf::from("a.flac")));
    assert_eq!(info.duration, Duration::from_secs(200));
    assert_eq!(info.state, PlaybackState::Stopped);
}

#[test]
fn duration_hint_used_when_decoder_does_not_know() {
    let (mut engine, _shared, _rx) = engine_with(FakeBackend::default());
    engine.handle(AudioCmd::SetSource {
        path: PathBuf::from("stream.ogg"),
        duration_hint: Some(Duration::from_secs(42)),
    });
    assert_eq!(engine.info().duration, Duration::from_secs(42));
}

#[test]
fn invalid_source_reports_error_and_blocks_play() {
    let backend = FakeBackend {
        reject_open: true,
        ..FakeBackend::default()
    };
    let (mut engine, _shared, rx) = engine_with(backend);
    engine.handle(AudioCmd::SetSource {
        path: PathBuf::from("broken.wma"),
        duration_hint: None,
    });

    let events = drain(&rx);
    assert!(events.contains(&MediaEvent::StatusChanged(MediaStatus::InvalidMedia)));
    assert!(events.iter().any(|e| matches!(e, MediaEvent::Error(_))));
    assert_eq!(engine.info().source, None);

    engine.handle(AudioCmd::Play);
    assert_eq!(engine.info().state, PlaybackState::Stopped);
    assert_eq!(engine.backend().plays, 0);
}

#[test]
fn volume_maps_to_linear_gain_and_clamps() {
    let (mut engine, shared, rx) = loaded_engine(60);

    engine.handle(AudioCmd::SetVolume(30));
    assert!(approx(engine.backend().gain, 0.3));
    assert_eq!(shared.lock().unwrap().volume, 30);
    assert_eq!(drain(&rx), vec![MediaEvent::VolumeChanged(30)]);

    engine.handle(AudioCmd::SetVolume(30));
    assert!(drain(&rx).is_empty());

    engine.handle(AudioCmd::SetVolume(250));
    assert_eq!(engine.info().volume, 100);
    assert!(approx(engine.backend().gain, 1.0));
}

#[test]
fn muting_twice_restores_previous_level() {
    let (mut engine, _shared, rx) = loaded_engine(60);
    engine.handle(AudioCmd::SetVolume(45));
    drain(&rx);

    engine.handle(AudioCmd::SetMuted(true));
    assert!(approx(engine.backend().gain, 0.0));
    assert_eq!(engine.info().volume, 45);

    engine.handle(AudioCmd::SetMuted(false));
    assert!(approx(engine.backend().gain, 0.45));
    assert_eq!(
        drain(&rx),
        vec![MediaEvent::MutedChanged(true), MediaEvent::MutedChanged(false)]
    );
}

#[test]
fn volume_change_while_muted_stays_silent() {
    let (mut engine, _shared, _rx) = loaded_engine(60);
    engine.handle(AudioCmd::SetMuted(true));
    engine.handle(AudioCmd::SetVolume(80));
    assert!(approx(engine.backend().gain, 0.0));

    engine.handle(AudioCmd::SetMuted(false));
    assert!(approx(engine.backend().gain, 0.8));
}

#[test]
fn toggle_play_alternates_states() {
    let (mut engine, _shared, rx) = loaded_engine(60);

    engine.handle(AudioCmd::TogglePlay);
    assert_eq!(engine.info().state, PlaybackState::Playing);
    engine.handle(AudioCmd::TogglePlay);
    assert_eq!(engine.info().state, PlaybackState::Paused);

    let states: Vec<_> = drain(&rx)
        .into_iter()
        .filter_map(|e| match e {
            MediaEvent::StateChanged(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(states, vec![PlaybackState::Playing, PlaybackState::Paused]);
}

#[test]
fn tick_publishes_position_while_playing() {
    let (mut engine, shared, rx) = loaded_engine(60);
    engine.handle(AudioCmd::Play);
    drain(&rx);

    engine.backend_mut().advance_to(Duration::from_secs(5));
    engine.tick();

    assert_eq!(shared.lock().unwrap().position, Duration::from_secs(5));
    assert_eq!(
        drain(&rx),
        vec![MediaEvent::PositionChanged(Duration::from_secs(5))]
    );
}

#[test]
fn end_of_media_without_loop_stops_at_duration() {
    let (mut engine, _shared, rx) = loaded_engine(10);
    engine.handle(AudioCmd::Play);
    drain(&rx);

    engine.backend_mut().advance_to(Duration::from_secs(10));
    engine.tick();

    let info = engine.info();
    assert_eq!(info.state, PlaybackState::Stopped);
    assert_eq!(info.status, MediaStatus::EndOfMedia);
    assert_eq!(info.position, Duration::from_secs(10));
    assert!(!drain(&rx).contains(&MediaEvent::Looped));

    // Play after the end starts over.
    engine.handle(AudioCmd::Play);
    assert_eq!(engine.info().position, Duration::ZERO);
    assert_eq!(engine.info().status, MediaStatus::Loaded);
    assert_eq!(engine.info().state, PlaybackState::Playing);
}

#[test]
fn end_of_media_with_loop_restarts_from_zero() {
    let (mut engine, _shared, rx) = loaded_engine(10);
    engine.handle(AudioCmd::SetLooping(true));
    engine.handle(AudioCmd::Play);
    drain(&rx);

    engine.backend_mut().advance_to(Duration::from_secs(10));
    engine.tick();

    let info = engine.info();
    assert_eq!(info.state, PlaybackState::Playing);
    assert_eq!(info.status, MediaStatus::Loaded);
    assert_eq!(info.position, Duration::ZERO);
    assert_eq!(engine.backend().plays, 2);
    assert!(engine.backend().playing);

    let events = drain(&rx);
    assert!(events.contains(&MediaEvent::Looped));
    assert!(events.contains(&MediaEvent::PositionChanged(Duration::ZERO)));
}

#[test]
fn set_position_clamps_to_duration() {
    let (mut engine, _shared, _rx) = loaded_engine(10);
    engine.handle(AudioCmd::Play);

    engine.handle(AudioCmd::SetPosition(Duration::from_secs(60)));
    assert_eq!(engine.info().position, Duration::from_secs(10));
    assert_eq!(engine.backend().pos, Duration::from_secs(10));
}

#[test]
fn seek_by_saturates_at_zero() {
    let (mut engine, _shared, _rx) = loaded_engine(120);
    engine.handle(AudioCmd::Play);
    engine.handle(AudioCmd::SetPosition(Duration::from_secs(5)));

    engine.handle(AudioCmd::SeekBy(-10));
    assert_eq!(engine.info().position, Duration::ZERO);

    engine.handle(AudioCmd::SeekBy(30));
    assert_eq!(engine.info().position, Duration::from_secs(30));
}

#[test]
fn seeking_a_stopped_source_leaves_it_paused() {
    let (mut engine, _shared, _rx) = loaded_engine(120);
    engine.handle(AudioCmd::SetPosition(Duration::from_secs(40)));

    assert_eq!(engine.info().state, PlaybackState::Paused);
    assert_eq!(engine.info().position, Duration::from_secs(40));
    assert!(!engine.backend().playing);

    engine.handle(AudioCmd::Play);
    assert_eq!(engine.backend().pos, Duration::from_secs(40));
}

#[test]
fn stop_rewinds() {
    let (mut engine, _shared, _rx) = loaded_engine(120);
    engine.handle(AudioCmd::Play);
    engine.handle(AudioCmd::SetPosition(Duration::from_secs(40)));
    engine.handle(AudioCmd::Stop);

    assert_eq!(engine.info().state, PlaybackState::Stopped);
    assert_eq!(engine.info().position, Duration::ZERO);
}

#[test]
fn playback_rate_is_clamped_and_forwarded() {
    let (mut engine, _shared, rx) = loaded_engine(60);

    engine.handle(AudioCmd::SetPlaybackRate(1.5));
    assert!(approx(engine.backend().speed, 1.5));

    engine.handle(AudioCmd::SetPlaybackRate(10.0));
    assert!(approx(engine.info().rate, MAX_RATE));

    engine.handle(AudioCmd::SetPlaybackRate(f32::NAN));
    assert!(approx(engine.info().rate, MAX_RATE));

    assert_eq!(
        drain(&rx),
        vec![
            MediaEvent::PlaybackRateChanged(1.5),
            MediaEvent::PlaybackRateChanged(MAX_RATE),
        ]
    );
}

#[test]
fn shutdown_marks_stopped() {
    let (mut engine, shared, _rx) = loaded_engine(60);
    engine.handle(AudioCmd::Play);
    engine.shutdown(0);

    assert_eq!(shared.lock().unwrap().state, PlaybackState::Stopped);
    assert!(!engine.backend().playing);
}

#[test]
fn remaining_saturates() {
    let info = PlaybackInfo {
        position: Duration::from_secs(90),
        duration: Duration::from_secs(60),
        ..PlaybackInfo::default()
    };
    assert_eq!(info.remaining(), Duration::ZERO);
}
