//! Playback state machine.
//!
//! Serializes every transition through one owned media backend: at most one
//! track is active, the most recent `play_track` always wins, and readiness
//! or errors from superseded loads are dropped by session id.

use std::time::Duration;

use crate::catalog::{Catalog, Track};

use super::backend::{MediaBackend, MediaEvent, SessionId};
use super::types::{PlaybackError, PlaybackStatus};

/// Going "previous" within the first seconds of a track moves to the prior
/// track; past this point it restarts the current one, the way a CD player
/// treats the back button.
const RESTART_THRESHOLD: Duration = Duration::from_secs(3);

pub struct PlaybackController<B> {
    catalog: Catalog,
    backend: B,
    status: PlaybackStatus,
    /// Monotonic session counter; 0 means no load has been issued yet.
    session: u64,
    /// Start audibly once the in-flight load reports ready.
    pending_start: bool,
}

impl<B: MediaBackend> PlaybackController<B> {
    pub fn new(catalog: Catalog, mut backend: B, volume: f32) -> Self {
        let volume = clamp_volume(volume);
        backend.set_volume(volume);
        Self {
            catalog,
            backend,
            status: PlaybackStatus::new(volume),
            session: 0,
            pending_start: false,
        }
    }

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub(super) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Drain backend events and fold them into the status.
    pub fn pump(&mut self) {
        for event in self.backend.poll() {
            self.handle_event(event);
        }
    }

    /// Load and play `track`, superseding any current playback. The previous
    /// position is discarded; there is no resume-on-return.
    pub fn play_track(&mut self, track: Track) {
        if track.audio_url.is_empty() {
            self.status.error = Some(PlaybackError::Configuration { track_id: track.id });
            return;
        }

        self.backend.stop();
        self.session += 1;
        self.pending_start = true;
        self.status.loading = true;
        self.status.playing = false;
        self.status.position = Duration::ZERO;
        self.status.duration = Duration::ZERO;
        self.status.error = None;
        let url = track.audio_url.clone();
        self.status.track = Some(track);
        self.backend.load(SessionId(self.session), &url);
    }

    /// Start or resume playback. During a load this queues the intent
    /// instead of acting on a not-yet-ready resource.
    pub fn play(&mut self) {
        if self.status.track.is_none() {
            return;
        }
        if self.status.loading {
            self.pending_start = true;
            return;
        }
        if self.status.playing {
            return;
        }
        self.backend.start();
        self.status.playing = true;
    }

    /// Pause. While already paused this is a no-op; during a load it cancels
    /// the queued start.
    pub fn pause(&mut self) {
        if self.status.loading {
            self.pending_start = false;
            return;
        }
        if !self.status.playing {
            return;
        }
        self.backend.pause();
        self.status.playing = false;
    }

    pub fn toggle_play(&mut self) {
        if self.status.playing || (self.status.loading && self.pending_start) {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek to an absolute position in seconds, clamped to `[0, duration]`
    /// when the duration is known and to `>= 0` otherwise. Never changes
    /// whether playback is running.
    pub fn seek(&mut self, seconds: f64) {
        let mut target = seconds.max(0.0);
        if self.status.duration > Duration::ZERO {
            target = target.min(self.status.duration.as_secs_f64());
        }
        let position = Duration::from_secs_f64(target);
        self.status.position = position;
        self.backend.seek(position);
    }

    /// Set the volume, clamped to `[0, 1]`. Applied immediately and
    /// re-applied to every subsequently loaded resource.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = clamp_volume(volume);
        self.status.volume = volume;
        self.backend.set_volume(volume);
    }

    /// Play the album successor. No-op on the last track; never wraps.
    pub fn play_next(&mut self) {
        let next = self
            .status
            .track
            .as_ref()
            .and_then(|t| self.catalog.next_after(&t.id))
            .cloned();
        if let Some(track) = next {
            self.play_track(track);
        }
    }

    /// Past the restart threshold, restart the current track from zero
    /// (this counts as "previous" and does not move the index). Otherwise
    /// play the album predecessor. No-op on the first track; never wraps.
    pub fn play_previous(&mut self) {
        if self.status.track.is_none() {
            return;
        }
        if self.status.position > RESTART_THRESHOLD {
            self.seek(0.0);
            return;
        }
        let previous = self
            .status
            .track
            .as_ref()
            .and_then(|t| self.catalog.previous_before(&t.id))
            .cloned();
        if let Some(track) = previous {
            self.play_track(track);
        }
    }

    fn handle_event(&mut self, event: MediaEvent) {
        if event.session() != SessionId(self.session) {
            // A superseded load; its late events must not touch the live session.
            return;
        }

        match event {
            MediaEvent::Ready { duration, .. } => {
                self.status.loading = false;
                self.status.duration = duration
                    .or_else(|| self.status.track.as_ref().and_then(Track::duration_hint))
                    .unwrap_or(Duration::ZERO);
                // The backend resource was rebuilt; volume is the one value
                // that must carry over.
                self.backend.set_volume(self.status.volume);
                if self.pending_start {
                    self.pending_start = false;
                    self.backend.start();
                    self.status.playing = true;
                }
            }
            MediaEvent::Failed { .. } => {
                // The attempted track stays visible so the UI can show what failed.
                self.status.loading = false;
                self.status.playing = false;
                self.pending_start = false;
                self.status.error = self
                    .status
                    .track
                    .as_ref()
                    .map(|t| PlaybackError::Load {
                        track_id: t.id.clone(),
                    });
            }
            MediaEvent::Rejected { .. } => {
                self.status.playing = false;
                self.pending_start = false;
                self.status.error = Some(PlaybackError::Rejected);
            }
            MediaEvent::Position { position, .. } => {
                // The backend clock can overshoot slightly near the end.
                self.status.position = if self.status.duration > Duration::ZERO {
                    position.min(self.status.duration)
                } else {
                    position
                };
            }
            MediaEvent::Ended { .. } => {
                let next = self
                    .status
                    .track
                    .as_ref()
                    .and_then(|t| self.catalog.next_after(&t.id))
                    .cloned();
                match next {
                    Some(track) => self.play_track(track),
                    None => {
                        // End of the album: the last track stays on display.
                        self.status.playing = false;
                        self.pending_start = false;
                        self.status.position = self.status.duration;
                    }
                }
            }
        }
    }
}

fn clamp_volume(volume: f32) -> f32 {
    volume.min(1.0).max(0.0)
}
