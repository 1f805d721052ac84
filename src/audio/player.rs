use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::AudioSettings;

use super::thread::spawn_audio_thread;
use super::types::{PlaybackStatus, PlayerCmd, StatusHandle};

pub struct AudioPlayer {
    tx: Sender<PlayerCmd>,
    status: StatusHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(catalog: Catalog, audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let status: StatusHandle =
            Arc::new(Mutex::new(PlaybackStatus::new(audio_settings.volume)));

        let join = spawn_audio_thread(catalog, rx, status.clone(), audio_settings);

        Self {
            tx,
            status,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), mpsc::SendError<PlayerCmd>> {
        self.tx.send(cmd)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(PlayerCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
