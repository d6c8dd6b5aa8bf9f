//! The Play page: command bar, cover art with title, and the play bar.

use std::io;
use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, CornerRadius, RichText};

use crate::app::{Action, NowPlaying, SPEED_OPTIONS, speed_label};
use crate::audio::{AudioCmd, PlaybackInfo};

use super::Intent;
use super::artwork::Artwork;
use super::play_bar::PlayBar;

const COVER_SIZE: f32 = 112.0;

#[derive(Default)]
pub struct PlayPage {
    play_bar: PlayBar,
    artwork: Artwork,
    show_info: bool,
}

pub struct PlayView<'a> {
    pub now: Option<&'a NowPlaying>,
    pub info: &'a PlaybackInfo,
    pub skip: (u32, u32),
    pub dark: bool,
    pub accent: Color32,
    pub resource_dirs: &'a [PathBuf],
}

impl PlayPage {
    pub fn show(&mut self, ui: &mut egui::Ui, view: &PlayView<'_>, intents: &mut Vec<Intent>) {
        self.command_bar(ui, view, intents);
        ui.separator();

        let ctx = ui.ctx().clone();
        ui.horizontal(|ui| {
            let texture = self.artwork.texture(
                &ctx,
                view.now.map(|n| n.track.path.as_path()),
                view.now.map(|n| &n.cover),
                view.dark,
                view.accent,
                view.resource_dirs,
            );
            ui.add(
                egui::Image::new((texture.id(), egui::vec2(COVER_SIZE, COVER_SIZE)))
                    .corner_radius(CornerRadius::same(10)),
            );

            ui.vertical(|ui| {
                match view.now {
                    Some(now) => {
                        ui.label(RichText::new(now.title()).size(18.0).strong());
                        let subtitle = now.subtitle();
                        if !subtitle.is_empty() {
                            ui.label(RichText::new(subtitle).weak());
                        }
                    }
                    None => {
                        ui.label(RichText::new("No file open").size(18.0).strong());
                        ui.label(RichText::new("Open a file with Ctrl+O").weak());
                    }
                }
                ui.add_space(8.0);
                self.play_bar.show(ui, view.info, view.skip, intents);
            });
        });

        if let Some(now) = view.now {
            self.info_window(&ctx, now);
        }
    }

    fn command_bar(&mut self, ui: &mut egui::Ui, view: &PlayView<'_>, intents: &mut Vec<Intent>) {
        let loaded = view.now.is_some();
        ui.horizontal(|ui| {
            if ui.button("📂 Open").on_hover_text("Open file (Ctrl+O)").clicked() {
                intents.push(Intent::Action(Action::OpenFile));
            }
            ui.separator();

            let mut looping = view.info.looping;
            if ui.toggle_value(&mut looping, "🔁 Loop").changed() {
                intents.push(Intent::Audio(AudioCmd::SetLooping(looping)));
            }

            egui::ComboBox::from_id_salt("play.speed")
                .selected_text(format!("⏱ {}", speed_label(view.info.rate)))
                .width(92.0)
                .show_ui(ui, |ui| {
                    for rate in SPEED_OPTIONS {
                        let selected = (view.info.rate - rate).abs() < f32::EPSILON;
                        if ui.selectable_label(selected, speed_label(rate)).clicked() && !selected {
                            intents.push(Intent::Audio(AudioCmd::SetPlaybackRate(rate)));
                        }
                    }
                });
            ui.separator();

            ui.add_enabled_ui(loaded, |ui| {
                if ui.button("ℹ Properties").clicked() {
                    self.show_info = true;
                }
                if ui.button("↗ Share").on_hover_text("Open with…").clicked() {
                    intents.push(Intent::Share);
                }
            });
        });
    }

    fn info_window(&mut self, ctx: &egui::Context, now: &NowPlaying) {
        egui::Window::new("Properties")
            .open(&mut self.show_info)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("play.properties")
                    .num_columns(2)
                    .spacing([16.0, 6.0])
                    .striped(true)
                    .show(ui, |ui| {
                        for (key, value) in now.properties() {
                            ui.label(RichText::new(key).strong());
                            ui.add(egui::Label::new(value).wrap());
                            ui.end_row();
                        }
                    });
            });
    }
}

/// Offer `path` to the OS: the "Open with" chooser on Windows, the default
/// handler elsewhere.
pub fn share(path: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        let system_root = std::env::var_os("SystemRoot").unwrap_or_else(|| "C:\\Windows".into());
        let open_with = PathBuf::from(system_root).join("System32").join("OpenWith.exe");
        std::process::Command::new(open_with).arg(path).spawn().map(|_| ())
    }
    #[cfg(not(windows))]
    {
        open::that(path)
    }
}
