//! Audio playback: a dedicated thread running the player engine over rodio.
//!
//! The UI talks to it through `AudioPlayer` and observes it through the
//! shared `PlaybackInfo` snapshot and the `MediaEvent` stream.

mod backend;
mod engine;
mod player;
mod sink;
mod thread;
mod types;

pub use backend::{Backend, RodioBackend};
pub use engine::Engine;
pub use player::AudioPlayer;
pub use types::*;

#[cfg(test)]
mod tests;
