//! Configuration loader, schema types and the live settings store.
//!
//! This module exposes the configuration schema, helpers to load it from disk
//! and the environment, and `ConfigStore`, which writes every change back.

mod error;
mod load;
mod schema;
mod store;

pub use error::SettingsError;
pub use load::{default_config_path, resolve_config_path, validate_music_folder};
pub use schema::*;
pub use store::{Change, ConfigStore, save_settings};

#[cfg(test)]
mod tests;
