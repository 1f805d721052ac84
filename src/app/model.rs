//! Application model types: `App` and `PlaybackState`.
//!
//! The `App` struct holds the album catalog, the selected track and
//! playback related flags used by the UI and runtime.

use crate::audio::{PlaybackStatus, StatusHandle};
use crate::catalog::{Catalog, Track};

/// The coarse playback state of the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// The main application model.
pub struct App {
    pub catalog: Catalog,
    pub album_title: String,
    pub album_artist: String,
    pub selected: usize,
    pub playback: PlaybackState,
    pub status_handle: Option<StatusHandle>,

    pub follow_playback: bool,
    pub show_visualizer: bool,
}

impl App {
    /// Create a new `App` for the provided album catalog.
    pub fn new(catalog: Catalog, album_title: String, album_artist: String) -> Self {
        Self {
            catalog,
            album_title,
            album_artist,
            selected: 0,
            playback: PlaybackState::Stopped,
            status_handle: None,
            follow_playback: true,
            show_visualizer: true,
        }
    }

    /// Attach the shared status handle used to observe playback progress.
    pub fn set_status_handle(&mut self, handle: StatusHandle) {
        self.status_handle = Some(handle);
    }

    /// Return true if the album contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.catalog.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.catalog.get(self.selected)
    }

    /// Move the cursor to the next track, wrapping at the end of the list.
    pub fn select_next(&mut self) {
        if self.catalog.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.catalog.len();
    }

    /// Move the cursor to the previous track, wrapping at the start.
    pub fn select_previous(&mut self) {
        if self.catalog.is_empty() {
            return;
        }
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.catalog.len() - 1);
    }

    /// Enable following playback (cursor follows the playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Disable follow-playback; the cursor roams freely.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    pub fn toggle_visualizer(&mut self) {
        self.show_visualizer = !self.show_visualizer;
    }

    /// Clone the shared playback status, or a default when none is attached.
    pub fn status_snapshot(&self) -> PlaybackStatus {
        self.status_handle
            .as_ref()
            .and_then(|h| h.lock().ok().map(|s| s.clone()))
            .unwrap_or_default()
    }

    /// Derive the coarse playback state and follow the playing track with
    /// the cursor when enabled.
    pub fn refresh_from_status(&mut self) {
        let status = self.status_snapshot();

        self.playback = match &status.track {
            None => PlaybackState::Stopped,
            Some(_) if status.playing => PlaybackState::Playing,
            Some(_) => PlaybackState::Paused,
        };

        if self.follow_playback {
            if let Some(track) = &status.track {
                if let Some(pos) = self.catalog.position(&track.id) {
                    self.selected = pos;
                }
            }
        }
    }
}
