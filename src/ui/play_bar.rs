//! Transport controls: seek slider with elapsed/remaining time, skip and
//! play/pause buttons, and the volume flyout.

use std::time::Duration;

use eframe::egui::{self, Align2, RichText};

use crate::app::format_hms;
use crate::audio::{AudioCmd, PlaybackInfo};

use super::Intent;

#[derive(Default)]
pub struct PlayBar {
    /// Slider value while the user drags it; the engine is told on release.
    seeking: Option<f32>,
    volume_open: bool,
}

impl PlayBar {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        info: &PlaybackInfo,
        skip: (u32, u32),
        intents: &mut Vec<Intent>,
    ) {
        let loaded = info.source.is_some();
        let send = |intents: &mut Vec<Intent>, cmd| intents.push(Intent::Audio(cmd));

        ui.add_enabled_ui(loaded, |ui| {
            self.seek_row(ui, info, intents);
        });

        ui.horizontal(|ui| {
            let (back, forward) = skip;
            let side = 40.0;
            let center = 3.0 * side + 2.0 * ui.spacing().item_spacing.x;
            ui.add_space(((ui.available_width() - center) / 2.0 - side).max(0.0));

            ui.add_enabled_ui(loaded, |ui| {
                if ui
                    .add_sized([side, side], egui::Button::new("⏪"))
                    .on_hover_text(format!("Back {back} s"))
                    .clicked()
                {
                    send(intents, AudioCmd::SeekBy(-(back as i32)));
                }

                let icon = if info.is_playing() { "⏸" } else { "▶" };
                if ui
                    .add_sized([side, side], egui::Button::new(RichText::new(icon).size(18.0)))
                    .on_hover_text("Play/Pause (Space)")
                    .clicked()
                {
                    send(intents, AudioCmd::TogglePlay);
                }

                if ui
                    .add_sized([side, side], egui::Button::new("⏩"))
                    .on_hover_text(format!("Forward {forward} s"))
                    .clicked()
                {
                    send(intents, AudioCmd::SeekBy(forward as i32));
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let icon = volume_icon(info);
                let button = ui.add_sized([side, side], egui::Button::new(icon).selected(self.volume_open));
                if button.clicked() {
                    self.volume_open = !self.volume_open;
                }
                if self.volume_open {
                    self.volume_flyout(ui, &button, info, intents);
                }
            });
        });
    }

    fn seek_row(&mut self, ui: &mut egui::Ui, info: &PlaybackInfo, intents: &mut Vec<Intent>) {
        let max = info.duration.as_secs_f32().max(0.0);
        let mut pos = self
            .seeking
            .unwrap_or_else(|| info.position.as_secs_f32())
            .min(max);

        let shown = Duration::from_secs_f32(pos);
        let remaining = match self.seeking {
            Some(_) => info.duration.saturating_sub(shown),
            None => info.remaining(),
        };

        ui.horizontal(|ui| {
            let elapsed_label = format_hms(shown);
            let remaining_label = format_hms(remaining);
            let label_w = 64.0;
            ui.add_sized([label_w, 20.0], egui::Label::new(elapsed_label));

            ui.spacing_mut().slider_width =
                (ui.available_width() - label_w - ui.spacing().item_spacing.x).max(40.0);
            let resp = ui.add(egui::Slider::new(&mut pos, 0.0..=max).show_value(false));

            if resp.dragged() {
                self.seeking = Some(pos);
            }
            if resp.drag_stopped() || (resp.changed() && !resp.dragged()) {
                self.seeking = None;
                intents.push(Intent::Audio(AudioCmd::SetPosition(Duration::from_secs_f32(
                    pos,
                ))));
            }

            ui.add_sized([label_w, 20.0], egui::Label::new(remaining_label));
        });
    }

    fn volume_flyout(
        &mut self,
        ui: &mut egui::Ui,
        anchor: &egui::Response,
        info: &PlaybackInfo,
        intents: &mut Vec<Intent>,
    ) {
        let area = egui::Area::new(ui.id().with("volume.flyout"))
            .order(egui::Order::Foreground)
            .pivot(Align2::RIGHT_BOTTOM)
            .fixed_pos(anchor.rect.right_top() - egui::vec2(0.0, 6.0))
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui
                            .button(volume_icon(info))
                            .on_hover_text(if info.muted { "Unmute" } else { "Mute" })
                            .clicked()
                        {
                            intents.push(Intent::Audio(AudioCmd::SetMuted(!info.muted)));
                        }

                        let mut volume = info.volume;
                        ui.spacing_mut().slider_width = 140.0;
                        if ui
                            .add(egui::Slider::new(&mut volume, 0..=100).show_value(false))
                            .changed()
                        {
                            intents.push(Intent::Audio(AudioCmd::SetVolume(volume)));
                        }
                        ui.add_sized([28.0, 20.0], egui::Label::new(volume.to_string()));
                    });
                });
            });

        // Close on a click anywhere else.
        let clicked_outside = ui.input(|i| i.pointer.any_pressed())
            && !area.response.contains_pointer()
            && !anchor.contains_pointer();
        if clicked_outside || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.volume_open = false;
        }
    }
}

fn volume_icon(info: &PlaybackInfo) -> &'static str {
    if info.muted || info.volume == 0 {
        "🔇"
    } else if info.volume < 50 {
        "🔉"
    } else {
        "🔊"
    }
}
