use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, MediaEvent, PlaybackHandle, PlaybackInfo};

/// Handle to the audio thread: commands in, snapshot and events out.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<MediaEvent>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(initial_volume: u8) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events_rx) = mpsc::channel::<MediaEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, playback_info.clone(), events_tx);

        let player = Self {
            tx,
            events: events_rx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        };
        player.set_volume(initial_volume);
        player
    }

    /// Copy of the latest published playback state.
    pub fn snapshot(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Drain every notification emitted since the last call.
    pub fn poll_events(&mut self) -> Vec<MediaEvent> {
        let mut out = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(ev) => out.push(ev),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    pub fn set_source(&self, path: PathBuf, duration_hint: Option<Duration>) {
        let _ = self.send(AudioCmd::SetSource {
            path,
            duration_hint,
        });
    }

    pub fn play(&self) {
        let _ = self.send(AudioCmd::Play);
    }

    pub fn pause(&self) {
        let _ = self.send(AudioCmd::Pause);
    }

    pub fn toggle_play(&self) {
        let _ = self.send(AudioCmd::TogglePlay);
    }

    pub fn stop(&self) {
        let _ = self.send(AudioCmd::Stop);
    }

    pub fn set_volume(&self, volume: u8) {
        let _ = self.send(AudioCmd::SetVolume(volume));
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
