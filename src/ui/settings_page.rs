//! The Settings page: one card per setting, each writing straight through
//! `ConfigStore`.

use eframe::egui::{self, RichText};

use crate::app::NoticeLevel;
use crate::config::{
    Change, ConfigStore, DEFAULT_THEME_COLOR, DpiScale, SettingsError, ThemeMode,
    parse_hex_color,
};

use super::Intent;
use super::theme::Palette;

const CARD_GAP: f32 = 6.0;

#[derive(Default)]
pub struct SettingsPage {
    /// Color being edited in the picker before it is committed.
    custom_color: Option<[u8; 3]>,
}

impl SettingsPage {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        store: &mut ConfigStore,
        palette: &Palette,
        intents: &mut Vec<Intent>,
    ) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                section(ui, "Personalization");
                self.personalization(ui, store, palette, intents);

                section(ui, "Music");
                let folder = store.settings().folders.music.display().to_string();
                card(ui, palette, "Music folder", &folder, |ui| {
                    if ui.button("Choose folder").clicked() {
                        pick_music_folder(store, intents);
                    }
                });

                section(ui, "Window");
                let mut acrylic = store.settings().main_window.enable_acrylic_background;
                card(ui, palette, "Acrylic background", "Translucent window background", |ui| {
                    if ui.checkbox(&mut acrylic, "").changed() {
                        report(store.set_acrylic(acrylic), intents, Some(Intent::Restyle));
                    }
                });

                let current = store.settings().main_window.dpi_scale;
                let mut picked = None;
                card(ui, palette, "Interface zoom", "Change the size of widgets and fonts", |ui| {
                    egui::ComboBox::from_id_salt("settings.dpi")
                        .selected_text(current.label())
                        .show_ui(ui, |ui| {
                            for scale in DpiScale::ALL {
                                if ui.selectable_label(scale == current, scale.label()).clicked() {
                                    picked = Some(scale);
                                }
                            }
                        });
                });
                if let Some(scale) = picked {
                    report(store.set_dpi_scale(scale), intents, None);
                }

                section(ui, "Software update");
                let mut check = store.settings().update.check_update_at_startup;
                card(ui, palette, "Check for updates at startup", "New versions are more stable and have more features", |ui| {
                    if ui.checkbox(&mut check, "").changed() {
                        report(store.set_check_update_at_startup(check), intents, None);
                    }
                });

                section(ui, "About");
                let version = format!("Version {}", env!("CARGO_PKG_VERSION"));
                card(ui, palette, "MusePlayer", &version, |ui| {
                    if let Some(path) = store.path() {
                        ui.label(RichText::new(path.display().to_string()).weak())
                            .on_hover_text("Settings file");
                    }
                });
            });
    }

    fn personalization(
        &mut self,
        ui: &mut egui::Ui,
        store: &mut ConfigStore,
        palette: &Palette,
        intents: &mut Vec<Intent>,
    ) {
        let mode = store.settings().appearance.theme_mode;
        let mut picked_mode = mode;
        card(ui, palette, "Application theme", "Change the appearance of your application", |ui| {
            for m in ThemeMode::ALL {
                ui.radio_value(&mut picked_mode, m, m.label());
            }
        });
        if picked_mode != mode {
            report(store.set_theme_mode(picked_mode), intents, Some(Intent::Restyle));
        }

        let stored = parse_hex_color(&store.settings().appearance.theme_color);
        let default = parse_hex_color(DEFAULT_THEME_COLOR);
        let is_default = stored == default && self.custom_color.is_none();

        let mut commit = None;
        card(ui, palette, "Theme color", "Change the theme color of your application", |ui| {
            ui.vertical(|ui| {
                if ui.radio(is_default, "Default color").clicked() && !is_default {
                    self.custom_color = None;
                    commit = default;
                }
                let custom = ui.radio(!is_default, "Custom color").clicked();
                if custom && is_default {
                    self.custom_color = stored.or(default);
                }
                if !is_default || self.custom_color.is_some() {
                    let mut rgb = self.custom_color.or(stored).or(default).unwrap_or([0, 0x9f, 0xaa]);
                    ui.horizontal(|ui| {
                        ui.label("Choose color");
                        let resp = ui.color_edit_button_srgb(&mut rgb);
                        if resp.changed() {
                            self.custom_color = Some(rgb);
                            commit = Some(rgb);
                        }
                    });
                }
            });
        });
        if let Some(rgb) = commit {
            report(store.set_theme_color(rgb), intents, Some(Intent::Restyle));
        }
    }
}

fn pick_music_folder(store: &mut ConfigStore, intents: &mut Vec<Intent>) {
    let current = store.settings().folders.music.clone();
    let Some(folder) = rfd::FileDialog::new()
        .set_title("Choose folder")
        .set_directory(&current)
        .pick_folder()
    else {
        return;
    };
    if folder == current {
        return;
    }
    match store.set_music_folder(&folder) {
        Ok(Change::Unchanged) => {}
        Ok(_) => intents.push(Intent::Rescan),
        Err(SettingsError::Invalid(msg)) => intents.push(Intent::Notice(
            NoticeLevel::Warning,
            "Invalid folder".into(),
            msg,
        )),
        Err(e) => report(Err(e), intents, Some(Intent::Rescan)),
    }
}

/// Turn the outcome of a settings mutation into follow-ups and notices.
fn report(result: Result<Change, SettingsError>, intents: &mut Vec<Intent>, on_applied: Option<Intent>) {
    match result {
        Ok(Change::Unchanged) => {}
        Ok(Change::Applied) => intents.extend(on_applied),
        Ok(Change::RestartRequired) => intents.push(Intent::Notice(
            NoticeLevel::Success,
            "Updated successfully".into(),
            "Configuration takes effect after restart".into(),
        )),
        Err(e) => {
            log::error!("{e}");
            // The new value is live even though it was not saved.
            intents.extend(on_applied);
            intents.push(Intent::Notice(
                NoticeLevel::Error,
                "Settings not saved".into(),
                e.to_string(),
            ));
        }
    }
}

fn section(ui: &mut egui::Ui, title: &str) {
    ui.add_space(CARD_GAP * 2.0);
    ui.label(RichText::new(title).size(13.0).strong());
    ui.add_space(CARD_GAP);
}

fn card(
    ui: &mut egui::Ui,
    palette: &Palette,
    title: &str,
    description: &str,
    control: impl FnOnce(&mut egui::Ui),
) {
    egui::Frame::new()
        .fill(palette.card)
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(14, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(title);
                    ui.label(RichText::new(description).small().color(palette.weak_text));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), control);
            });
        });
    ui.add_space(CARD_GAP);
}
