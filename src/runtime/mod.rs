use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crate::audio::AudioPlayer;
use crate::config::ConfigStore;
use crate::mpris::ControlCmd;
use crate::ui::MuseApp;

mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (settings, path) = settings::load_settings();
    startup::check_for_updates(&settings);

    let native_options = startup::native_options(&settings);
    let dpi_scale = settings.main_window.dpi_scale;
    let audio_player = AudioPlayer::new(settings.audio.initial_volume);
    let store = ConfigStore::new(settings, path);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    // An audio file may be passed on the command line.
    let initial = env::args_os().nth(1).map(PathBuf::from);

    eframe::run_native(
        "MusePlayer",
        native_options,
        Box::new(move |cc| {
            startup::apply_zoom(&cc.egui_ctx, dpi_scale);
            let app = MuseApp::new(store, audio_player, mpris, control_rx).with_initial_file(initial);
            Ok(Box::new(app))
        }),
    )?;

    log::debug!("window closed");
    Ok(())
}
