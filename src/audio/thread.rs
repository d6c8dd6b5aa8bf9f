use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use super::backend::RodioBackend;
use super::engine::Engine;
use super::types::{AudioCmd, MediaEvent, PlaybackHandle};

/// How often the position is refreshed and end of media is checked.
const TICK: Duration = Duration::from_millis(100);

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    events: Sender<MediaEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // The output stream is not `Send`; it has to be opened on this thread.
        let backend = match RodioBackend::open_default() {
            Ok(b) => b,
            Err(e) => {
                log::error!("{e}");
                let _ = events.send(MediaEvent::Error(e.to_string()));
                return;
            }
        };

        let mut engine = Engine::new(backend, playback_info, events);
        let mut last_tick = Instant::now();

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    engine.shutdown(fade_out_ms);
                    break;
                }
                Ok(cmd) => engine.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            // Keep ticking even while commands arrive back to back (slider drags).
            if last_tick.elapsed() >= TICK {
                engine.tick();
                last_tick = Instant::now();
            }
        }
        log::debug!("audio thread finished");
    })
}
