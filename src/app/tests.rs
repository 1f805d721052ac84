use std::sync::{Arc, Mutex};

use super::*;
use crate::audio::{PlaybackStatus, StatusHandle};
use crate::catalog::default_album;

fn app() -> App {
    App::new(
        default_album().catalog(),
        "Royal 419".to_string(),
        "The Prince of Nigeria".to_string(),
    )
}

#[test]
fn selection_wraps_both_ways() {
    let mut app = app();
    assert_eq!(app.selected, 0);

    app.select_previous();
    assert_eq!(app.selected, app.catalog.len() - 1);

    app.select_next();
    assert_eq!(app.selected, 0);

    app.select_next();
    assert_eq!(app.selected, 1);
    assert_eq!(app.selected_track().unwrap().id, "urgent-opportunity");
}

#[test]
fn playback_state_is_derived_from_status() {
    let mut app = app();
    let status: StatusHandle = Arc::new(Mutex::new(PlaybackStatus::default()));
    app.set_status_handle(status.clone());

    app.refresh_from_status();
    assert_eq!(app.playback, PlaybackState::Stopped);

    {
        let mut s = status.lock().unwrap();
        s.track = app.catalog.get(2).cloned();
        s.playing = true;
    }
    app.refresh_from_status();
    assert_eq!(app.playback, PlaybackState::Playing);

    {
        let mut s = status.lock().unwrap();
        s.playing = false;
    }
    app.refresh_from_status();
    assert_eq!(app.playback, PlaybackState::Paused);
}

#[test]
fn cursor_follows_playing_track_unless_disabled() {
    let mut app = app();
    let status: StatusHandle = Arc::new(Mutex::new(PlaybackStatus::default()));
    app.set_status_handle(status.clone());

    {
        let mut s = status.lock().unwrap();
        s.track = app.catalog.get(3).cloned();
        s.playing = true;
    }

    app.refresh_from_status();
    assert_eq!(app.selected, 3);

    app.follow_playback_off();
    app.select_next();
    assert_eq!(app.selected, 4);

    app.refresh_from_status();
    assert_eq!(app.selected, 4, "free-roam cursor must not snap back");

    app.follow_playback_on();
    app.refresh_from_status();
    assert_eq!(app.selected, 3);
}

#[test]
fn missing_status_handle_reads_as_stopped() {
    let mut app = app();
    app.refresh_from_status();
    assert_eq!(app.playback, PlaybackState::Stopped);
    assert!(app.has_tracks());
}
