use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::AudioSettings;

use super::controller::PlaybackController;
use super::sink::RodioBackend;
use super::types::{PlayerCmd, StatusHandle};

/// Scheduler tick: commands are awaited at most this long before the
/// backend is polled for progress.
const TICK: Duration = Duration::from_millis(100);

pub(super) fn spawn_audio_thread(
    catalog: Catalog,
    rx: Receiver<PlayerCmd>,
    status: StatusHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let backend = RodioBackend::new();
        let mut controller = PlaybackController::new(catalog, backend, audio_settings.volume);
        publish(&status, &controller);

        loop {
            match rx.recv_timeout(TICK) {
                Ok(PlayerCmd::Quit { fade_out_ms }) => {
                    controller.backend_mut().fade_out(fade_out_ms);
                    // Settle the published state so observers don't keep
                    // showing Playing after the fade.
                    controller.pause();
                    publish(&status, &controller);
                    break;
                }
                Ok(cmd) => {
                    apply(&mut controller, cmd);
                    controller.pump();
                    publish(&status, &controller);
                }
                Err(RecvTimeoutError::Timeout) => {
                    controller.pump();
                    publish(&status, &controller);
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("audio thread stopped");
    })
}

fn apply(controller: &mut PlaybackController<RodioBackend>, cmd: PlayerCmd) {
    match cmd {
        PlayerCmd::PlayTrack(track) => controller.play_track(track),
        PlayerCmd::Play => controller.play(),
        PlayerCmd::Pause => controller.pause(),
        PlayerCmd::TogglePlay => controller.toggle_play(),
        PlayerCmd::Seek(seconds) => controller.seek(seconds),
        PlayerCmd::SetVolume(volume) => controller.set_volume(volume),
        PlayerCmd::Next => controller.play_next(),
        PlayerCmd::Prev => controller.play_previous(),
        // Handled by the loop before dispatch.
        PlayerCmd::Quit { .. } => {}
    }
}

fn publish(status: &StatusHandle, controller: &PlaybackController<RodioBackend>) {
    if let Ok(mut shared) = status.lock() {
        *shared = controller.status().clone();
    }
}
