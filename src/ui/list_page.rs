use std::path::Path;

use eframe::egui::{self, Key, RichText};

use crate::app::{LibraryView, format_hms};

use super::Intent;

const ROW_HEIGHT: f32 = 24.0;

#[derive(Default)]
pub struct ListPage {
    scroll_to_selected: bool,
}

impl ListPage {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        library: &mut LibraryView,
        playing: Option<&Path>,
        intents: &mut Vec<Intent>,
    ) {
        ui.horizontal(|ui| {
            let mut query = library.filter_query.clone();
            let edit = ui.add(
                egui::TextEdit::singleline(&mut query)
                    .hint_text("Filter")
                    .desired_width(220.0),
            );
            if edit.changed() {
                library.set_filter(query);
            }
            if !library.filter_query.is_empty() && ui.small_button("✖").clicked() {
                library.clear_filter();
            }
            if ui.button("⟳ Rescan").clicked() {
                intents.push(Intent::Rescan);
            }
            if let Some(folder) = library.folder() {
                ui.label(RichText::new(folder.display().to_string()).weak());
            }
        });
        ui.separator();

        if library.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No audio files in the music folder").weak());
            });
            return;
        }

        self.keyboard(ui, library, intents);

        let visible = library.display_indices();
        let scroll_to = self.scroll_to_selected.then_some(library.selected).flatten();
        self.scroll_to_selected = false;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show_rows(ui, ROW_HEIGHT, visible.len(), |ui, rows| {
                for &idx in &visible[rows] {
                    let track = &library.tracks()[idx];
                    let is_playing = playing == Some(track.path.as_path());
                    let mut text = RichText::new(&track.display);
                    if is_playing {
                        text = text.strong();
                    }

                    let resp = ui
                        .horizontal(|ui| {
                            let marker = if is_playing { "▶" } else { " " };
                            ui.label(marker);
                            let row = ui.selectable_label(library.selected == Some(idx), text);
                            if let Some(d) = track.duration {
                                ui.label(RichText::new(format_hms(d)).weak());
                            }
                            row
                        })
                        .inner;

                    if scroll_to == Some(idx) {
                        resp.scroll_to_me(None);
                    }
                    if resp.clicked() {
                        intents.push(Intent::OpenTrack(track.path.clone()));
                        library.select(idx);
                    }
                }
            });
    }

    // Arrow keys move the selection, Enter plays it.
    fn keyboard(&mut self, ui: &egui::Ui, library: &mut LibraryView, intents: &mut Vec<Intent>) {
        if ui.ctx().wants_keyboard_input() {
            return;
        }
        let (down, up, enter) = ui.input(|i| {
            (
                i.key_pressed(Key::ArrowDown),
                i.key_pressed(Key::ArrowUp),
                i.key_pressed(Key::Enter),
            )
        });
        if down {
            library.next();
            self.scroll_to_selected = true;
        }
        if up {
            library.prev();
            self.scroll_to_selected = true;
        }
        if enter {
            if let Some(track) = library.selected_track() {
                intents.push(Intent::OpenTrack(track.path.clone()));
            }
        }
    }
}
