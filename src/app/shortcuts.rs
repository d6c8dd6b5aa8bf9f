use eframe::egui::{Key, KeyboardShortcut, Modifiers};

use super::model::Page;

/// What a global shortcut does.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    OpenFile,
    TogglePlay,
    ShowPage(Page),
}

/// Window-wide shortcuts. `COMMAND` is Ctrl, or Cmd on macOS.
pub const SHORTCUTS: [(KeyboardShortcut, Action); 6] = [
    (
        KeyboardShortcut::new(Modifiers::COMMAND, Key::O),
        Action::OpenFile,
    ),
    (
        KeyboardShortcut::new(Modifiers::NONE, Key::Space),
        Action::TogglePlay,
    ),
    (
        KeyboardShortcut::new(Modifiers::COMMAND, Key::Comma),
        Action::ShowPage(Page::Settings),
    ),
    (
        KeyboardShortcut::new(Modifiers::COMMAND, Key::Num1),
        Action::ShowPage(Page::Play),
    ),
    (
        KeyboardShortcut::new(Modifiers::COMMAND, Key::Num2),
        Action::ShowPage(Page::List),
    ),
    (
        KeyboardShortcut::new(Modifiers::COMMAND, Key::Num3),
        Action::ShowPage(Page::Settings),
    ),
];

/// Look up the action bound to `key` pressed with exactly `modifiers`.
pub fn shortcut_action(modifiers: Modifiers, key: Key) -> Option<Action> {
    SHORTCUTS
        .iter()
        .find(|(sc, _)| sc.logical_key == key && modifiers.matches_exact(sc.modifiers))
        .map(|(_, action)| *action)
}
