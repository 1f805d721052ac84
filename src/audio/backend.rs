//! Media backend seam.
//!
//! The controller drives exactly one exclusively owned playback resource
//! through this trait and consumes its event stream via `poll`. Events are
//! tagged with the session they belong to; the controller drops events from
//! superseded sessions, which is what makes stacked loads harmless.

use std::time::Duration;

/// Identifies one load/playback session. Every `load` starts a new session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionId(pub u64);

/// Notifications produced by a backend, delivered in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The resource is ready to start. `duration` is present when the
    /// decoder reports one.
    Ready {
        session: SessionId,
        duration: Option<Duration>,
    },
    /// Fetching or decoding the resource failed.
    Failed { session: SessionId },
    /// The output refused to start playback of a loaded resource.
    Rejected { session: SessionId },
    /// Playback progressed to `position`.
    Position {
        session: SessionId,
        position: Duration,
    },
    /// The resource played to its natural end.
    Ended { session: SessionId },
}

impl MediaEvent {
    pub fn session(&self) -> SessionId {
        match self {
            MediaEvent::Ready { session, .. }
            | MediaEvent::Failed { session }
            | MediaEvent::Rejected { session }
            | MediaEvent::Position { session, .. }
            | MediaEvent::Ended { session } => *session,
        }
    }
}

/// One exclusively owned media-playback resource.
///
/// All methods are fire-and-forget; outcomes come back through `poll`.
pub trait MediaBackend {
    /// Begin loading `url` for `session`, discarding any current resource.
    fn load(&mut self, session: SessionId, url: &str);
    /// Start or resume audible playback of the ready resource.
    fn start(&mut self);
    /// Pause audible playback.
    fn pause(&mut self);
    /// Discard the current resource entirely.
    fn stop(&mut self);
    /// Jump to an absolute position.
    fn seek(&mut self, position: Duration);
    /// Apply a volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);
    /// Drain pending events. Called on every scheduler tick.
    fn poll(&mut self) -> Vec<MediaEvent>;
}
