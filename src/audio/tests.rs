use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::catalog::{Album, AlbumTrack, Catalog, Track};

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Load { session: u64, url: String },
    Start,
    Pause,
    Stop,
    Seek(Duration),
    SetVolume(f32),
}

#[derive(Default)]
struct Shared {
    ops: Vec<Op>,
    pending: Vec<MediaEvent>,
}

/// Records every backend call and replays injected events on `poll`.
#[derive(Clone, Default)]
struct FakeBackend {
    shared: Arc<Mutex<Shared>>,
}

impl FakeBackend {
    fn handle(&self) -> Arc<Mutex<Shared>> {
        self.shared.clone()
    }
}

impl MediaBackend for FakeBackend {
    fn load(&mut self, session: SessionId, url: &str) {
        self.shared.lock().unwrap().ops.push(Op::Load {
            session: session.0,
            url: url.to_string(),
        });
    }

    fn start(&mut self) {
        self.shared.lock().unwrap().ops.push(Op::Start);
    }

    fn pause(&mut self) {
        self.shared.lock().unwrap().ops.push(Op::Pause);
    }

    fn stop(&mut self) {
        self.shared.lock().unwrap().ops.push(Op::Stop);
    }

    fn seek(&mut self, position: Duration) {
        self.shared.lock().unwrap().ops.push(Op::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.shared.lock().unwrap().ops.push(Op::SetVolume(volume));
    }

    fn poll(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.shared.lock().unwrap().pending)
    }
}

fn push_event(handle: &Arc<Mutex<Shared>>, event: MediaEvent) {
    handle.lock().unwrap().pending.push(event);
}

fn ops(handle: &Arc<Mutex<Shared>>) -> Vec<Op> {
    handle.lock().unwrap().ops.clone()
}

fn load_count(handle: &Arc<Mutex<Shared>>) -> usize {
    ops(handle)
        .iter()
        .filter(|op| matches!(op, Op::Load { .. }))
        .count()
}

fn last_load(handle: &Arc<Mutex<Shared>>) -> Option<(u64, String)> {
    ops(handle).into_iter().rev().find_map(|op| match op {
        Op::Load { session, url } => Some((session, url)),
        _ => None,
    })
}

fn album_track(id: &str, title: &str) -> AlbumTrack {
    AlbumTrack {
        id: id.to_string(),
        title: title.to_string(),
        duration: "3:20".to_string(),
    }
}

fn three_track_catalog() -> Catalog {
    let album = Album {
        title: "Test".to_string(),
        artist: "Tester".to_string(),
        tracks: vec![
            album_track("a", "Alpha"),
            album_track("b", "Beta"),
            album_track("c", "Gamma"),
        ],
    };
    let mut catalog = album.catalog();
    for track in catalog.tracks_mut() {
        track.audio_url = format!("https://cdn.test/{}.mp3", track.id);
    }
    catalog
}

fn controller_with(catalog: Catalog) -> (PlaybackController<FakeBackend>, Arc<Mutex<Shared>>) {
    let backend = FakeBackend::default();
    let handle = backend.handle();
    (PlaybackController::new(catalog, backend, 0.8), handle)
}

fn track(catalog: &Catalog, id: &str) -> Track {
    catalog.by_id(id).unwrap().clone()
}

/// Report the live session's load as ready with the given duration.
fn ready(
    controller: &mut PlaybackController<FakeBackend>,
    handle: &Arc<Mutex<Shared>>,
    duration_secs: u64,
) {
    let (session, _) = last_load(handle).unwrap();
    push_event(
        handle,
        MediaEvent::Ready {
            session: SessionId(session),
            duration: Some(Duration::from_secs(duration_secs)),
        },
    );
    controller.pump();
}

#[test]
fn stacked_loads_settle_on_the_last_track() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    controller.play_track(track(&catalog, "b"));

    let (live_session, url) = last_load(&handle).unwrap();
    assert!(url.ends_with("/b.mp3"));

    // The superseded load reports ready late; it must not start anything.
    push_event(
        &handle,
        MediaEvent::Ready {
            session: SessionId(live_session - 1),
            duration: Some(Duration::from_secs(100)),
        },
    );
    controller.pump();
    assert!(controller.status().loading);
    assert!(!controller.status().playing);
    assert!(!ops(&handle).contains(&Op::Start));

    push_event(
        &handle,
        MediaEvent::Ready {
            session: SessionId(live_session),
            duration: Some(Duration::from_secs(200)),
        },
    );
    controller.pump();

    let status = controller.status();
    assert!(!status.loading);
    assert!(status.playing);
    assert_eq!(status.track.as_ref().unwrap().id, "b");
    assert_eq!(
        ops(&handle).iter().filter(|op| **op == Op::Start).count(),
        1
    );
}

#[test]
fn next_does_not_wrap_on_the_last_track() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "c"));
    ready(&mut controller, &handle, 200);
    let loads = load_count(&handle);

    controller.play_next();

    assert_eq!(load_count(&handle), loads);
    assert_eq!(controller.status().track.as_ref().unwrap().id, "c");
    assert!(controller.status().playing);
}

#[test]
fn previous_does_not_wrap_on_the_first_track() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    ready(&mut controller, &handle, 200);
    let loads = load_count(&handle);

    controller.play_previous();

    assert_eq!(load_count(&handle), loads);
    assert_eq!(controller.status().track.as_ref().unwrap().id, "a");
}

#[test]
fn previous_before_threshold_moves_to_prior_track() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "b"));
    ready(&mut controller, &handle, 200);

    let (session, _) = last_load(&handle).unwrap();
    push_event(
        &handle,
        MediaEvent::Position {
            session: SessionId(session),
            position: Duration::from_secs_f64(2.9),
        },
    );
    controller.pump();

    controller.play_previous();

    let (_, url) = last_load(&handle).unwrap();
    assert!(url.ends_with("/a.mp3"));
    assert_eq!(controller.status().track.as_ref().unwrap().id, "a");
}

#[test]
fn previous_past_threshold_restarts_current_track() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "b"));
    ready(&mut controller, &handle, 200);
    let loads = load_count(&handle);

    let (session, _) = last_load(&handle).unwrap();
    push_event(
        &handle,
        MediaEvent::Position {
            session: SessionId(session),
            position: Duration::from_secs_f64(3.1),
        },
    );
    controller.pump();

    controller.play_previous();

    assert_eq!(load_count(&handle), loads);
    assert!(ops(&handle).contains(&Op::Seek(Duration::ZERO)));
    assert_eq!(controller.status().track.as_ref().unwrap().id, "b");
    assert_eq!(controller.status().position, Duration::ZERO);
    assert!(controller.status().playing);
}

#[test]
fn volume_clamps_and_persists_across_loads() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.set_volume(-5.0);
    assert_eq!(controller.status().volume, 0.0);
    controller.set_volume(5.0);
    assert_eq!(controller.status().volume, 1.0);
    controller.set_volume(0.42);
    assert_eq!(controller.status().volume, 0.42);

    controller.play_track(track(&catalog, "a"));
    ready(&mut controller, &handle, 200);

    // The fresh resource gets the stored volume re-applied.
    let reapplied = ops(&handle)
        .iter()
        .filter(|op| **op == Op::SetVolume(0.42))
        .count();
    assert!(reapplied >= 2);
    assert_eq!(controller.status().volume, 0.42);
}

#[test]
fn seek_clamps_to_known_duration() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    ready(&mut controller, &handle, 200);

    controller.seek(250.0);
    assert_eq!(controller.status().position, Duration::from_secs(200));
    assert!(ops(&handle).contains(&Op::Seek(Duration::from_secs(200))));

    controller.seek(-10.0);
    assert_eq!(controller.status().position, Duration::ZERO);

    // Seeking never flips the playing flag.
    assert!(controller.status().playing);
}

#[test]
fn seek_before_duration_known_clamps_to_zero_only() {
    let catalog = three_track_catalog();
    let (mut controller, _handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    controller.seek(42.0);
    assert_eq!(controller.status().position, Duration::from_secs(42));

    controller.seek(-1.0);
    assert_eq!(controller.status().position, Duration::ZERO);
}

#[test]
fn album_plays_through_and_settles_at_the_end() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    ready(&mut controller, &handle, 180);
    assert!(controller.status().playing);
    assert_eq!(controller.status().track.as_ref().unwrap().id, "a");

    controller.play_next();
    assert!(controller.status().loading);
    ready(&mut controller, &handle, 180);
    assert_eq!(controller.status().track.as_ref().unwrap().id, "b");

    // Natural end of the middle track auto-advances.
    let (session, _) = last_load(&handle).unwrap();
    push_event(
        &handle,
        MediaEvent::Ended {
            session: SessionId(session),
        },
    );
    controller.pump();
    assert!(controller.status().loading);
    let (_, url) = last_load(&handle).unwrap();
    assert!(url.ends_with("/c.mp3"));

    ready(&mut controller, &handle, 180);
    assert!(controller.status().playing);
    assert_eq!(controller.status().track.as_ref().unwrap().id, "c");

    // Natural end of the last track: nothing follows, the track stays.
    let (session, _) = last_load(&handle).unwrap();
    push_event(
        &handle,
        MediaEvent::Ended {
            session: SessionId(session),
        },
    );
    controller.pump();

    let status = controller.status();
    assert!(!status.playing);
    assert!(!status.loading);
    assert_eq!(status.track.as_ref().unwrap().id, "c");
    assert_eq!(status.position, status.duration);
}

#[test]
fn ended_from_a_superseded_session_is_discarded() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    ready(&mut controller, &handle, 200);
    let (stale_session, _) = last_load(&handle).unwrap();

    controller.play_track(track(&catalog, "b"));

    push_event(
        &handle,
        MediaEvent::Ended {
            session: SessionId(stale_session),
        },
    );
    controller.pump();

    // The stale end must not auto-advance past the in-flight load.
    assert!(controller.status().loading);
    assert_eq!(controller.status().track.as_ref().unwrap().id, "b");
    let (_, url) = last_load(&handle).unwrap();
    assert!(url.ends_with("/b.mp3"));
}

#[test]
fn empty_audio_url_reports_configuration_error() {
    // Catalog without resolved URLs, as when storage is unconfigured.
    let catalog = Album {
        title: "Test".to_string(),
        artist: "Tester".to_string(),
        tracks: vec![album_track("a", "Alpha")],
    }
    .catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));

    assert_eq!(load_count(&handle), 0);
    let status = controller.status();
    assert!(!status.loading);
    assert!(!status.playing);
    assert!(status.track.is_none());
    assert_eq!(
        status.error,
        Some(PlaybackError::Configuration {
            track_id: "a".to_string()
        })
    );
}

#[test]
fn failed_load_settles_without_playing() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    let (session, _) = last_load(&handle).unwrap();
    push_event(
        &handle,
        MediaEvent::Failed {
            session: SessionId(session),
        },
    );
    controller.pump();

    let status = controller.status();
    assert!(!status.loading);
    assert!(!status.playing);
    // The attempted track stays visible.
    assert_eq!(status.track.as_ref().unwrap().id, "a");
    assert_eq!(
        status.error,
        Some(PlaybackError::Load {
            track_id: "a".to_string()
        })
    );
}

#[test]
fn rejected_start_leaves_not_playing() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    let (session, _) = last_load(&handle).unwrap();

    // Ready without a decoder duration: the printed label fills in.
    push_event(
        &handle,
        MediaEvent::Ready {
            session: SessionId(session),
            duration: None,
        },
    );
    controller.pump();
    assert_eq!(controller.status().duration, Duration::from_secs(200));

    push_event(
        &handle,
        MediaEvent::Rejected {
            session: SessionId(session),
        },
    );
    controller.pump();

    let status = controller.status();
    assert!(!status.playing);
    assert!(!status.loading);
    assert_eq!(status.error, Some(PlaybackError::Rejected));
}

#[test]
fn pause_during_load_cancels_queued_start() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    controller.pause();
    ready(&mut controller, &handle, 200);

    assert!(!controller.status().playing);
    assert!(!ops(&handle).contains(&Op::Start));

    controller.play();
    assert!(controller.status().playing);
    assert!(ops(&handle).contains(&Op::Start));
}

#[test]
fn play_during_load_queues_the_start_intent() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    controller.pause();
    controller.play();

    // Still loading: nothing audible yet.
    assert!(!ops(&handle).contains(&Op::Start));

    ready(&mut controller, &handle, 200);
    assert!(controller.status().playing);
    assert_eq!(
        ops(&handle).iter().filter(|op| **op == Op::Start).count(),
        1
    );
}

#[test]
fn ended_still_advances_after_a_racing_pause() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    ready(&mut controller, &handle, 200);
    controller.pause();

    // The track ran out right as the user paused; the end of the live
    // session must still advance.
    let (session, _) = last_load(&handle).unwrap();
    push_event(
        &handle,
        MediaEvent::Ended {
            session: SessionId(session),
        },
    );
    controller.pump();

    assert!(controller.status().loading);
    let (_, url) = last_load(&handle).unwrap();
    assert!(url.ends_with("/b.mp3"));
}

#[test]
fn position_events_update_status() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog.clone());

    controller.play_track(track(&catalog, "a"));
    ready(&mut controller, &handle, 200);

    let (session, _) = last_load(&handle).unwrap();
    push_event(
        &handle,
        MediaEvent::Position {
            session: SessionId(session),
            position: Duration::from_secs(5),
        },
    );
    controller.pump();
    assert_eq!(controller.status().position, Duration::from_secs(5));
}

#[test]
fn toggle_play_without_a_track_is_a_noop() {
    let catalog = three_track_catalog();
    let (mut controller, handle) = controller_with(catalog);

    controller.toggle_play();

    let status = controller.status();
    assert!(status.track.is_none());
    assert!(!status.playing);
    assert!(!ops(&handle).iter().any(|op| matches!(op, Op::Start)));
}
