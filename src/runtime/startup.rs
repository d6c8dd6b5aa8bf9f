use eframe::egui::{self, ViewportBuilder};

use crate::config::{DpiScale, Settings};

const INITIAL_SIZE: [f32; 2] = [730.0, 330.0];
const MIN_SIZE: [f32; 2] = [560.0, 300.0];

pub fn native_options(settings: &Settings) -> eframe::NativeOptions {
    // Always transparent so acrylic can be switched on without a restart.
    let viewport = ViewportBuilder::default()
        .with_title("MusePlayer")
        .with_app_id("museplayer")
        .with_inner_size(INITIAL_SIZE)
        .with_min_inner_size(MIN_SIZE)
        .with_transparent(true);

    if settings.main_window.enable_acrylic_background {
        log::debug!("acrylic background enabled");
    }

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

/// Fixed DPI scales become the egui zoom factor; `auto` keeps the OS scale.
pub fn apply_zoom(ctx: &egui::Context, scale: DpiScale) {
    if let Some(factor) = scale.factor() {
        ctx.set_zoom_factor(factor);
    }
}

/// The flag is stored and honoured here, but there is no release feed to
/// query, so an enabled check only logs.
pub fn check_for_updates(settings: &Settings) {
    if settings.update.check_update_at_startup {
        log::info!("update check enabled; no update source configured");
    }
}
