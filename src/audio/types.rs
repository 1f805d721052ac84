//! Audio-related small types and handles.
//!
//! This module defines the command enum, the shared playback status and the
//! error taxonomy used by the audio subsystem.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::Track;

#[derive(Debug)]
pub enum PlayerCmd {
    /// Load and play the given track, superseding any current playback.
    PlayTrack(Track),
    /// Start or resume playback of the current track.
    Play,
    /// Pause playback.
    Pause,
    /// Toggle pause/resume.
    TogglePlay,
    /// Seek to an absolute position in seconds (clamped).
    Seek(f64),
    /// Set playback volume (clamped to `[0, 1]`).
    SetVolume(f32),
    /// Skip to the next album track.
    Next,
    /// Go to the previous album track, or restart the current one.
    Prev,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Failures surfaced through `PlaybackStatus::error`.
///
/// None of these crosses the command channel as a panic or an `Err`; every
/// failure settles into readable state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    /// The audio bytes could not be fetched or decoded. Not retried.
    #[error("failed to load audio for {track_id}")]
    Load { track_id: String },
    /// The track has no resolvable audio URL; no playback was attempted.
    #[error("no audio URL configured for {track_id}")]
    Configuration { track_id: String },
    /// The audio output refused playback; the resource itself loaded fine.
    #[error("playback rejected by the audio output")]
    Rejected,
}

#[derive(Debug, Clone)]
/// Runtime playback information shared with the UI.
pub struct PlaybackStatus {
    /// The current (or last attempted) track, if any.
    pub track: Option<Track>,
    /// Whether playback is currently audible.
    pub playing: bool,
    /// Whether a load is in flight. A stuck fetch keeps this true
    /// indefinitely; there is no load timeout.
    pub loading: bool,
    /// Elapsed playback time for the current track.
    pub position: Duration,
    /// Track duration; zero until known.
    pub duration: Duration,
    /// Volume in `[0, 1]`. The one value that survives track changes.
    pub volume: f32,
    /// Most recent playback failure, cleared on the next load.
    pub error: Option<PlaybackError>,
}

impl PlaybackStatus {
    pub fn new(volume: f32) -> Self {
        Self {
            track: None,
            playing: false,
            loading: false,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume,
            error: None,
        }
    }
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self::new(0.8)
    }
}

pub type StatusHandle = Arc<Mutex<PlaybackStatus>>;
