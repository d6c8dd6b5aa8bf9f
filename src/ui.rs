//! egui front end: the window, its pivot pages and the play bar.
//!
//! Pages never touch the audio thread or the OS directly. They push
//! `Intent`s, and the window carries them out after drawing.

use std::path::PathBuf;

use crate::app::{Action, NoticeLevel};
use crate::audio::AudioCmd;

mod artwork;
mod list_page;
mod play_bar;
mod play_page;
mod settings_page;
mod theme;
mod window;

pub use window::MuseApp;

#[derive(Debug)]
pub enum Intent {
    Audio(AudioCmd),
    Action(Action),
    /// Load and play this file.
    OpenTrack(PathBuf),
    /// Hand the current file to the OS "open with" chooser.
    Share,
    Rescan,
    /// Appearance settings changed.
    Restyle,
    Notice(NoticeLevel, String, String),
}
