use super::*;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

fn make_track() -> Track {
    let mut track = Track::from_path("/tmp/music/test.mp3");
    track.title = "Test Title".to_string();
    track.artist = Some("Test Artist".to_string());
    track.album = Some("Test Album".to_string());
    track.duration = Some(Duration::from_micros(1_234_567));
    track.display = "Test Artist - Test Title".to_string();
    track
}

fn handle_with_state() -> (MprisHandle, Arc<Mutex<SharedState>>, Receiver<()>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
    };
    (handle, state, notify_rx)
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let (handle, state, notify) = handle_with_state();

    let track = make_track();
    handle.set_track_metadata(Some(7), Some(&track));
    assert!(notify.try_recv().is_ok());

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert!(s.url.as_deref().unwrap().starts_with("file://"));
        assert!(s.url.as_deref().unwrap().contains("test.mp3"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn set_playback_notifies_only_on_change() {
    let (handle, state, notify) = handle_with_state();

    handle.set_playback(PlaybackState::Playing);
    assert!(notify.try_recv().is_ok());
    assert_eq!(state.lock().unwrap().playback, PlaybackState::Playing);

    handle.set_playback(PlaybackState::Playing);
    assert!(notify.try_recv().is_err());
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    for (playback, expected) in [
        (PlaybackState::Stopped, "Stopped"),
        (PlaybackState::Playing, "Playing"),
        (PlaybackState::Paused, "Paused"),
    ] {
        state.lock().unwrap().playback = playback;
        assert_eq!(iface.playback_status(), expected);
    }
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    assert!(iface.metadata().is_empty());

    {
        let mut s = state.lock().unwrap();
        s.title = Some("Title".to_string());
        s.artist = vec!["Artist".to_string()];
        s.album = Some("Album".to_string());
        s.url = Some("file:///tmp/test.mp3".to_string());
        s.length_micros = Some(42);
        s.track_id = track_object_path(1);
    }

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn player_methods_forward_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let player = PlayerIface {
        tx: tx.clone(),
        state,
    };
    let root = RootIface { tx };

    player.play();
    player.pause();
    player.play_pause();
    player.stop();
    root.raise();
    root.quit();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Play,
            ControlCmd::Pause,
            ControlCmd::PlayPause,
            ControlCmd::Stop,
            ControlCmd::Raise,
            ControlCmd::Quit,
        ]
    );
}

#[test]
fn file_url_is_absolute() {
    let track = Track::from_path(PathBuf::from("/no/such/dir/x.ogg"));
    assert_eq!(file_url(&track), "file:///no/such/dir/x.ogg");
}
