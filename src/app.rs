//! Application model shared by the window and its pages.
//!
//! Nothing in here draws; the `ui` module renders these types and turns
//! clicks and key presses into calls on them.

mod library_view;
mod model;
mod shortcuts;

pub use library_view::LibraryView;
pub use model::*;
pub use shortcuts::{Action, SHORTCUTS, shortcut_action};
