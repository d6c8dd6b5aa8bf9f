use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use super::store::{Change, ConfigStore, save_settings};
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_muse_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("MUSE_CONFIG_PATH", "/tmp/muse-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/muse-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("museplayer")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("museplayer")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r##"
[folders]
music = "/srv/music"

[main_window]
enable_acrylic_background = true
dpi_scale = "1.25"

[update]
check_update_at_startup = false

[appearance]
theme_mode = "dark"
theme_color = "#ff8800"

[audio]
initial_volume = 55
quit_fade_out_ms = 0

[library]
extensions = ["flac"]
recursive = false
"##,
    )
    .unwrap();

    let _g1 = EnvGuard::remove("MUSE__AUDIO__INITIAL_VOLUME");

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.folders.music, std::path::PathBuf::from("/srv/music"));
    assert!(s.main_window.enable_acrylic_background);
    assert_eq!(s.main_window.dpi_scale, DpiScale::X125);
    assert_eq!(s.main_window.dpi_scale.factor(), Some(1.25));
    assert!(!s.update.check_update_at_startup);
    assert_eq!(s.appearance.theme_mode, ThemeMode::Dark);
    assert_eq!(s.appearance.theme_color, "#ff8800");
    assert_eq!(s.audio.initial_volume, 55);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    // Untouched fields keep their defaults.
    assert_eq!(s.audio.skip_back_seconds, 10);
    assert_eq!(s.library.extensions, vec!["flac".to_string()]);
    assert!(!s.library.recursive);
}

#[test]
fn settings_missing_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::remove("MUSE__AUDIO__INITIAL_VOLUME");

    let s = Settings::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(s, Settings::default());
    assert_eq!(s.main_window.dpi_scale, DpiScale::Auto);
    assert!(s.update.check_update_at_startup);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
initial_volume = 80
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MUSE__AUDIO__INITIAL_VOLUME", "12");

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.audio.initial_volume, 12);
}

#[test]
fn unsupported_dpi_scale_keeps_the_rest_of_the_file() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("MUSE__MAIN_WINDOW__DPI_SCALE");
    let _g2 = EnvGuard::remove("MUSE__AUDIO__INITIAL_VOLUME");

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[folders]
music = "/srv/music"

[main_window]
enable_acrylic_background = true
dpi_scale = 3
"#,
    )
    .unwrap();

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.folders.music, std::path::PathBuf::from("/srv/music"));
    assert!(s.main_window.enable_acrylic_background);
    assert_eq!(s.main_window.dpi_scale, DpiScale::Auto);
}

#[test]
fn numeric_dpi_scale_from_env_is_accepted() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("MUSE__MAIN_WINDOW__DPI_SCALE", "1.5");
    let _g2 = EnvGuard::remove("MUSE__AUDIO__INITIAL_VOLUME");

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[folders]
music = "/srv/music"

[main_window]
dpi_scale = "1.25"
"#,
    )
    .unwrap();

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.main_window.dpi_scale, DpiScale::X150);
    assert_eq!(s.folders.music, std::path::PathBuf::from("/srv/music"));
}

#[test]
fn mistyped_field_falls_back_alone() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("MUSE__AUDIO__INITIAL_VOLUME");

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
initial_volume = "loud"
quit_fade_out_ms = 0
skip_forward_seconds = 15

[appearance]
theme_mode = "dark"
"#,
    )
    .unwrap();

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.audio.initial_volume, AudioSettings::default().initial_volume);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.audio.skip_forward_seconds, 15);
    assert_eq!(s.appearance.theme_mode, ThemeMode::Dark);
}

#[test]
fn dpi_scale_accepts_numbers_and_strings() {
    assert_eq!(DpiScale::parse("auto"), Some(DpiScale::Auto));
    assert_eq!(DpiScale::parse("Auto"), Some(DpiScale::Auto));
    assert_eq!(DpiScale::parse("2"), Some(DpiScale::X200));
    assert_eq!(DpiScale::parse(" 1.0 "), Some(DpiScale::X100));
    assert_eq!(DpiScale::parse("1.3"), None);
    assert_eq!(DpiScale::from_factor(1.75), Some(DpiScale::X175));
    assert_eq!(DpiScale::from_factor(3.0), None);
}

#[test]
fn validate_and_correct_repair_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not-yet").join("music");

    let mut s = Settings::default();
    s.folders.music = missing.clone();
    s.appearance.theme_color = "teal".to_string();
    s.audio.initial_volume = 250;

    let err = s.validate().unwrap_err();
    assert!(err.contains("folders.music"));
    assert!(err.contains("theme_color"));
    assert!(err.contains("initial_volume"));

    assert!(s.correct());
    assert!(missing.is_dir());
    assert_eq!(s.folders.music, missing);
    assert_eq!(s.appearance.theme_color, DEFAULT_THEME_COLOR);
    assert_eq!(s.audio.initial_volume, 100);
    assert!(s.validate().is_ok());
    assert!(!s.correct());
}

#[test]
fn music_folder_change_survives_reload() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("cfg").join("config.toml");
    let music = dir.path().join("tunes");
    std::fs::create_dir_all(&music).unwrap();

    let mut store = ConfigStore::new(Settings::default(), Some(cfg_path.clone()));
    assert_eq!(store.set_music_folder(&music).unwrap(), Change::Applied);
    assert_eq!(store.set_music_folder(&music).unwrap(), Change::Unchanged);

    let reloaded = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(reloaded.folders.music, music);
}

#[test]
fn music_folder_rejects_non_directories() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("song.mp3");
    std::fs::write(&file, b"x").unwrap();

    let mut store = ConfigStore::new(Settings::default(), None);
    assert!(store.set_music_folder(&file).is_err());
    assert!(store.set_music_folder(&dir.path().join("missing")).is_err());
    assert_eq!(store.settings().folders.music, FolderSettings::default().music);
}

#[test]
fn dpi_scale_change_requires_restart() {
    let mut store = ConfigStore::new(Settings::default(), None);
    assert_eq!(
        store.set_dpi_scale(DpiScale::X150).unwrap(),
        Change::RestartRequired
    );
    assert_eq!(store.set_dpi_scale(DpiScale::X150).unwrap(), Change::Unchanged);
    assert_eq!(store.set_acrylic(true).unwrap(), Change::Applied);
    assert_eq!(store.set_theme_mode(ThemeMode::Dark).unwrap(), Change::Applied);
    assert_eq!(
        store.set_theme_color([0x00, 0x9f, 0xaa]).unwrap(),
        Change::Unchanged
    );
}

#[test]
fn saved_document_round_trips_every_section() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("MUSE__AUDIO__INITIAL_VOLUME");
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");

    let mut s = Settings::default();
    s.main_window.dpi_scale = DpiScale::X175;
    s.appearance.theme_mode = ThemeMode::Auto;
    s.library.max_depth = Some(3);
    save_settings(&s, &cfg_path).unwrap();

    let text = std::fs::read_to_string(&cfg_path).unwrap();
    assert!(text.contains("dpi_scale = \"1.75\""));
    assert!(text.contains("theme_mode = \"auto\""));

    assert_eq!(Settings::load_from(Some(&cfg_path)).unwrap(), s);
}

#[test]
fn hex_colors_parse_and_format() {
    assert_eq!(parse_hex_color("#009faa"), Some([0x00, 0x9f, 0xaa]));
    assert_eq!(parse_hex_color("FF8800"), Some([0xff, 0x88, 0x00]));
    assert_eq!(parse_hex_color("#fff"), None);
    assert_eq!(parse_hex_color("#gg0000"), None);
    assert_eq!(format_hex_color([1, 2, 255]), "#0102ff");
}
