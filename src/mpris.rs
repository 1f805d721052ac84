use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::warn;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::app::PlaybackState;
use crate::catalog::Track;

#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<u64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    album_title: String,
    album_artist: String,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    /// Publish metadata for the given track, or clear it with `None`.
    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&Track>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        match track {
            Some(track) => {
                s.title = Some(track.title.clone());
                s.artist = vec![self.album_artist.clone()];
                s.album = Some(self.album_title.clone());
                s.url = if track.audio_url.is_empty() {
                    None
                } else {
                    Some(track.audio_url.clone())
                };
                s.length_micros = track.duration_hint().map(|d| d.as_micros() as u64);
                s.track_id = index.and_then(|i| {
                    ObjectPath::try_from(format!("/org/mpris/MediaPlayer2/track/{i}"))
                        .ok()
                        .map(Into::into)
                });
            }
            None => {
                s.title = None;
                s.artist = Vec::new();
                s.album = None;
                s.url = None;
                s.length_micros = None;
                s.track_id = None;
            }
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "jewelbox"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        // NOTE: This returns a &'static str; we map state into static strings.
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(track_id) = &s.track_id {
            if let Ok(v) = OwnedValue::try_from(Value::from(track_id.clone().into_inner())) {
                map.insert("mpris:trackid".to_string(), v);
            }
        }
        if let Some(title) = &s.title {
            if let Ok(v) = OwnedValue::try_from(Value::from(title.clone())) {
                map.insert("xesam:title".to_string(), v);
            }
        }
        if !s.artist.is_empty() {
            if let Ok(v) = OwnedValue::try_from(Value::from(s.artist.clone())) {
                map.insert("xesam:artist".to_string(), v);
            }
        }
        if let Some(album) = &s.album {
            if let Ok(v) = OwnedValue::try_from(Value::from(album.clone())) {
                map.insert("xesam:album".to_string(), v);
            }
        }
        if let Some(url) = &s.url {
            if let Ok(v) = OwnedValue::try_from(Value::from(url.clone())) {
                map.insert("xesam:url".to_string(), v);
            }
        }
        if let Some(length) = s.length_micros {
            if let Ok(v) = OwnedValue::try_from(Value::from(length as i64)) {
                map.insert("mpris:length".to_string(), v);
            }
        }

        map
    }
}

pub fn spawn_mpris(
    tx: Sender<ControlCmd>,
    album_title: String,
    album_artist: String,
) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection
                .request_name("org.mpris.MediaPlayer2.jewelbox")
                .await
            {
                warn!("MPRIS: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
                warn!("MPRIS: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!("MPRIS: failed to register player iface: {e}");
                return;
            }

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle {
        state,
        album_title,
        album_artist,
    }
}
