//! Top-level window: pivot navigation, notices, global shortcuts, and the
//! glue between pages, the audio thread and the MPRIS bridge.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, Event, RichText, ViewportCommand};

use crate::app::{
    Action, LibraryView, NoticeLevel, Notices, NowPlaying, Page, shortcut_action,
};
use crate::audio::{AudioPlayer, MediaEvent, PlaybackInfo, PlaybackState};
use crate::config::{ConfigStore, SUPPORTED_EXTENSIONS};
use crate::library;
use crate::mpris::{ControlCmd, MprisHandle};

use super::Intent;
use super::list_page::ListPage;
use super::play_page::{PlayPage, PlayView, share};
use super::settings_page::SettingsPage;
use super::theme::{self, Look, Palette};

const REPAINT_PLAYING: Duration = Duration::from_millis(100);
const REPAINT_IDLE: Duration = Duration::from_millis(250);

pub struct MuseApp {
    store: ConfigStore,
    audio: AudioPlayer,
    mpris: MprisHandle,
    control_rx: Receiver<ControlCmd>,

    page: Page,
    play_page: PlayPage,
    list_page: ListPage,
    settings_page: SettingsPage,

    library: LibraryView,
    now: Option<NowPlaying>,
    info: PlaybackInfo,
    notices: Notices,
    /// Increases with every opened file; feeds the MPRIS track id.
    track_serial: u64,

    resource_dirs: Vec<PathBuf>,
    palette: Option<(bool, Palette)>,
    look: Option<Look>,
    title: String,
}

impl MuseApp {
    pub fn new(
        store: ConfigStore,
        audio: AudioPlayer,
        mpris: MprisHandle,
        control_rx: Receiver<ControlCmd>,
    ) -> Self {
        Self {
            store,
            info: audio.snapshot(),
            audio,
            mpris,
            control_rx,
            page: Page::default(),
            play_page: PlayPage::default(),
            list_page: ListPage::default(),
            settings_page: SettingsPage::default(),
            library: LibraryView::default(),
            now: None,
            notices: Notices::default(),
            track_serial: 0,
            resource_dirs: theme::resource_dirs(),
            palette: None,
            look: None,
            title: String::new(),
        }
    }

    /// Open `path` from the command line before the first frame.
    pub fn with_initial_file(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.open_track(&p);
        }
        self
    }

    fn drain_control(&mut self, ctx: &egui::Context) {
        while let Ok(cmd) = self.control_rx.try_recv() {
            log::debug!("MPRIS: {cmd:?}");
            match cmd {
                ControlCmd::Raise => ctx.send_viewport_cmd(ViewportCommand::Focus),
                ControlCmd::Quit => ctx.send_viewport_cmd(ViewportCommand::Close),
                ControlCmd::Play => self.audio.play(),
                ControlCmd::Pause => self.audio.pause(),
                ControlCmd::PlayPause => self.audio.toggle_play(),
                ControlCmd::Stop => self.audio.stop(),
            }
        }
    }

    fn drain_audio(&mut self) {
        for event in self.audio.poll_events() {
            match event {
                MediaEvent::Error(msg) => {
                    self.notices
                        .push(NoticeLevel::Error, "Cannot play this file", msg);
                }
                MediaEvent::StateChanged(state) => self.mpris.set_playback(state),
                MediaEvent::SourceChanged(Some(path)) => {
                    let track = self.now.as_ref().map(|n| &n.track).filter(|t| t.path == path);
                    self.mpris.set_track_metadata(Some(self.track_serial), track);
                }
                MediaEvent::SourceChanged(None) => self.mpris.set_track_metadata(None, None),
                MediaEvent::Looped => log::debug!("looped"),
                _ => {}
            }
        }
        self.info = self.audio.snapshot();
    }

    fn look(&mut self, ctx: &egui::Context) -> Look {
        let settings = self.store.settings();
        let dark = theme::is_dark(settings.appearance.theme_mode, ctx.system_theme());
        let palette = match self.palette {
            Some((d, p)) if d == dark => p,
            _ => {
                let p = theme::load_palette(dark, &self.resource_dirs);
                self.palette = Some((dark, p));
                p
            }
        };
        Look {
            dark,
            accent: theme::accent_color(&settings.appearance),
            acrylic: settings.main_window.enable_acrylic_background,
            palette,
        }
    }

    fn restyle(&mut self, ctx: &egui::Context) -> Look {
        let look = self.look(ctx);
        if self.look != Some(look) {
            look.apply(ctx);
            self.look = Some(look);
        }
        look
    }

    fn shortcuts(&mut self, ctx: &egui::Context, intents: &mut Vec<Intent>) {
        let typing = ctx.wants_keyboard_input();
        let actions: Vec<Action> = ctx.input_mut(|i| {
            let pressed: Vec<_> = i
                .events
                .iter()
                .filter_map(|e| match e {
                    Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } => Some((*modifiers, *key)),
                    _ => None,
                })
                .collect();
            pressed
                .into_iter()
                .filter(|(m, _)| !typing || m.command)
                .filter_map(|(m, k)| {
                    let action = shortcut_action(m, k)?;
                    i.consume_key(m, k).then_some(action)
                })
                .collect()
        });
        intents.extend(actions.into_iter().map(Intent::Action));
    }

    fn run_action(&mut self, action: Action) {
        match action {
            Action::OpenFile => self.pick_file(),
            Action::TogglePlay => self.audio.toggle_play(),
            Action::ShowPage(page) => self.page = page,
        }
    }

    fn pick_file(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Open file")
            .set_directory(&self.store.settings().folders.music)
            .add_filter("Audio files", &SUPPORTED_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file();
        if let Some(path) = picked {
            self.open_track(&path);
        }
    }

    fn open_track(&mut self, path: &Path) {
        if !path.is_file() {
            self.notices.push(
                NoticeLevel::Warning,
                "File not found",
                path.display().to_string(),
            );
            return;
        }
        let now = NowPlaying::open(path);
        log::info!("opening {}", path.display());

        self.track_serial += 1;
        self.audio.set_source(path.to_path_buf(), now.track.duration);
        self.audio.play();
        self.now = Some(now);
    }

    fn rescan(&mut self) {
        let settings = self.store.settings();
        let folder = settings.folders.music.clone();
        let tracks = library::scan(&folder, &settings.library);
        log::info!("{} tracks in {}", tracks.len(), folder.display());
        self.library.replace(tracks, Some(folder));
    }

    fn apply(&mut self, ctx: &egui::Context, intents: Vec<Intent>) {
        for intent in intents {
            match intent {
                Intent::Audio(cmd) => {
                    let _ = self.audio.send(cmd);
                }
                Intent::Action(action) => self.run_action(action),
                Intent::OpenTrack(path) => self.open_track(&path),
                Intent::Share => {
                    let Some(now) = &self.now else { continue };
                    if let Err(e) = share(&now.track.path) {
                        log::warn!("share failed: {e}");
                        self.notices
                            .push(NoticeLevel::Error, "Cannot open with", e.to_string());
                    }
                }
                Intent::Rescan => self.rescan(),
                Intent::Restyle => {
                    self.palette = None;
                    self.restyle(ctx);
                }
                Intent::Notice(level, title, text) => self.notices.push(level, title, text),
            }
        }
    }

    fn pivot(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for page in Page::ALL {
                ui.selectable_value(&mut self.page, page, RichText::new(page.label()).size(15.0));
            }
        });
    }

    fn show_notices(&mut self, ui: &mut egui::Ui) {
        let mut dismissed = None;
        for (idx, notice) in self.notices.iter().enumerate() {
            let fill = notice_color(notice.level);
            egui::Frame::new()
                .fill(theme::with_alpha(fill, 48))
                .stroke(egui::Stroke::new(1.0, fill))
                .corner_radius(egui::CornerRadius::same(6))
                .inner_margin(egui::Margin::symmetric(10, 6))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&notice.title).strong());
                        ui.label(&notice.text);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("✖").clicked() {
                                dismissed = Some(idx);
                            }
                        });
                    });
                });
        }
        if let Some(idx) = dismissed {
            self.notices.dismiss(idx);
        }
    }
}

fn notice_color(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => Color32::from_rgb(0x00, 0x78, 0xd4),
        NoticeLevel::Success => Color32::from_rgb(0x0f, 0x7b, 0x0f),
        NoticeLevel::Warning => Color32::from_rgb(0xc1, 0x9c, 0x00),
        NoticeLevel::Error => Color32::from_rgb(0xc4, 0x2b, 0x1c),
    }
}

impl eframe::App for MuseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_control(ctx);
        self.drain_audio();
        let look = self.restyle(ctx);

        let mut intents = Vec::new();
        self.shortcuts(ctx, &mut intents);

        if self.page == Page::List && self.library.is_stale(&self.store.settings().folders.music) {
            self.rescan();
        }
        let has_notices = self.notices.prune(Instant::now());

        egui::TopBottomPanel::top("pivot").show(ctx, |ui| {
            ui.add_space(4.0);
            self.pivot(ui);
            if has_notices {
                self.show_notices(ui);
            }
            ui.add_space(2.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Play => {
                let audio = &self.store.settings().audio;
                let view = PlayView {
                    now: self.now.as_ref(),
                    info: &self.info,
                    skip: (audio.skip_back_seconds, audio.skip_forward_seconds),
                    dark: look.dark,
                    accent: look.accent,
                    resource_dirs: &self.resource_dirs,
                };
                self.play_page.show(ui, &view, &mut intents);
            }
            Page::List => {
                let playing = self.info.source.as_deref();
                self.list_page
                    .show(ui, &mut self.library, playing, &mut intents);
            }
            Page::Settings => {
                self.settings_page
                    .show(ui, &mut self.store, &look.palette, &mut intents);
            }
        });

        self.apply(ctx, intents);

        let title = match &self.now {
            Some(now) => format!("{} - MusePlayer", now.title()),
            None => "MusePlayer".to_string(),
        };
        if title != self.title {
            ctx.send_viewport_cmd(ViewportCommand::Title(title.clone()));
            self.title = title;
        }

        let next = if self.info.state == PlaybackState::Playing || has_notices {
            REPAINT_PLAYING
        } else {
            REPAINT_IDLE
        };
        ctx.request_repaint_after(next);
    }

    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        if self.store.settings().main_window.enable_acrylic_background {
            Color32::TRANSPARENT.to_normalized_gamma_f32()
        } else {
            visuals.panel_fill.to_normalized_gamma_f32()
        }
    }
}

impl Drop for MuseApp {
    fn drop(&mut self) {
        let fade = self.store.settings().audio.quit_fade_out_ms;
        self.audio.quit_softly(Duration::from_millis(fade));
        // Nothing is playing any more; tell the desktop.
        self.mpris.set_playback(PlaybackState::Stopped);
    }
}
