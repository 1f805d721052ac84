//! rodio-backed media resource.
//!
//! Owns the output stream and one `Sink` per loaded track. Audio bytes are
//! fetched on a worker thread and decoded from memory; seeking rebuilds the
//! sink with `Source::skip_duration`; elapsed time is tracked with instants.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::warn;

use super::backend::{MediaBackend, MediaEvent, SessionId};
use super::fetch;

/// Minimum spacing between position events.
const POSITION_INTERVAL: Duration = Duration::from_millis(250);

struct FetchDone {
    session: SessionId,
    result: Result<Arc<[u8]>, fetch::FetchError>,
}

pub(super) struct RodioBackend {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    /// Encoded bytes of the current resource, kept for seek rebuilds.
    bytes: Option<Arc<[u8]>>,
    session: SessionId,
    volume: f32,
    playing: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    done_tx: Sender<FetchDone>,
    done_rx: Receiver<FetchDone>,
    /// Events synthesized outside `poll` (e.g. start rejections).
    queued: Vec<MediaEvent>,
    last_position_emit: Instant,
    ended_emitted: bool,
}

impl RodioBackend {
    pub(super) fn new() -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in
                // debugging, but noisy for a TUI app.
                let mut stream = stream;
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                // Start attempts will be rejected rather than panicking.
                warn!("no audio output device: {e}");
                None
            }
        };

        let (done_tx, done_rx) = mpsc::channel();
        Self {
            stream,
            sink: None,
            bytes: None,
            session: SessionId(0),
            volume: 1.0,
            playing: false,
            started_at: None,
            accumulated: Duration::ZERO,
            done_tx,
            done_rx,
            queued: Vec::new(),
            last_position_emit: Instant::now(),
            ended_emitted: false,
        }
    }

    /// Fade the current sink to silence over `fade_out_ms`, then stop it.
    /// Used on quit so the app does not cut off mid-note.
    pub(super) fn fade_out(&mut self, fade_out_ms: u64) {
        let Some(sink) = self.sink.take() else {
            return;
        };
        if self.playing && fade_out_ms > 0 {
            let steps: u64 = 20;
            let step_ms = (fade_out_ms / steps).max(1);
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                sink.set_volume(self.volume * (1.0 - t));
                thread::sleep(Duration::from_millis(step_ms));
            }
        }
        sink.stop();
        self.playing = false;
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |t| t.elapsed())
    }

    fn reset_clock(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }
}

/// Create a paused `Sink` playing `bytes` from `start_at`.
///
/// `skip_duration` is the seeking primitive; even `Duration::ZERO` is fine.
fn create_sink_at(
    stream: &OutputStream,
    bytes: Arc<[u8]>,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), rodio::decoder::DecoderError> {
    let decoder = Decoder::new(Cursor::new(bytes))?;
    let duration = decoder.total_duration();
    let sink = Sink::connect_new(stream.mixer());
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, duration))
}

impl MediaBackend for RodioBackend {
    fn load(&mut self, session: SessionId, url: &str) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.bytes = None;
        self.playing = false;
        self.reset_clock();
        self.ended_emitted = false;
        self.session = session;

        let url = url.to_string();
        let tx = self.done_tx.clone();
        thread::spawn(move || {
            let result = fetch::fetch_audio(&url);
            if let Err(e) = &result {
                warn!(url = url.as_str(), "audio fetch failed: {e}");
            }
            let _ = tx.send(FetchDone { session, result });
        });
    }

    fn start(&mut self) {
        match &self.sink {
            Some(sink) => {
                sink.play();
                self.playing = true;
                self.started_at = Some(Instant::now());
            }
            None => {
                self.queued.push(MediaEvent::Rejected {
                    session: self.session,
                });
            }
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
        }
        self.playing = false;
    }

    fn stop(&mut self) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.bytes = None;
        self.playing = false;
        self.reset_clock();
        self.ended_emitted = false;
    }

    fn seek(&mut self, position: Duration) {
        let Some(bytes) = self.bytes.clone() else {
            return;
        };
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let Some(stream) = self.stream.as_ref() else {
            return;
        };

        match create_sink_at(stream, bytes, position) {
            Ok((sink, _)) => {
                sink.set_volume(self.volume);
                if self.playing {
                    sink.play();
                    self.started_at = Some(Instant::now());
                } else {
                    self.started_at = None;
                }
                self.accumulated = position;
                self.sink = Some(sink);
                self.ended_emitted = false;
            }
            Err(e) => {
                // The resource decoded once already, so this is unexpected;
                // report it as a lost resource rather than limping along.
                warn!("rebuilding sink for seek failed: {e}");
                self.playing = false;
                self.started_at = None;
                self.accumulated = Duration::ZERO;
                self.queued.push(MediaEvent::Failed {
                    session: self.session,
                });
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn poll(&mut self) -> Vec<MediaEvent> {
        let mut events = std::mem::take(&mut self.queued);

        // Completed fetches. Results for superseded sessions are dropped
        // here; the controller double-checks by session id anyway.
        while let Ok(done) = self.done_rx.try_recv() {
            if done.session != self.session {
                continue;
            }
            match done.result {
                Ok(bytes) => match self.stream.as_ref() {
                    Some(stream) => match create_sink_at(stream, bytes.clone(), Duration::ZERO) {
                        Ok((sink, duration)) => {
                            sink.set_volume(self.volume);
                            self.sink = Some(sink);
                            self.bytes = Some(bytes);
                            self.started_at = None;
                            self.accumulated = Duration::ZERO;
                            events.push(MediaEvent::Ready {
                                session: self.session,
                                duration,
                            });
                        }
                        Err(e) => {
                            warn!("failed to decode audio: {e}");
                            events.push(MediaEvent::Failed {
                                session: self.session,
                            });
                        }
                    },
                    None => {
                        // No output device: the bytes are fine, so report
                        // ready and let the start attempt surface a rejection.
                        self.bytes = Some(bytes);
                        events.push(MediaEvent::Ready {
                            session: self.session,
                            duration: None,
                        });
                    }
                },
                Err(_) => {
                    events.push(MediaEvent::Failed {
                        session: self.session,
                    });
                }
            }
        }

        // Progress and end-of-track: the sink drains to empty when the
        // source is exhausted.
        if let Some(sink) = &self.sink {
            if self.playing {
                if sink.empty() {
                    if !self.ended_emitted {
                        self.ended_emitted = true;
                        self.accumulated = self.elapsed();
                        self.started_at = None;
                        self.playing = false;
                        events.push(MediaEvent::Ended {
                            session: self.session,
                        });
                    }
                } else if self.last_position_emit.elapsed() >= POSITION_INTERVAL {
                    self.last_position_emit = Instant::now();
                    events.push(MediaEvent::Position {
                        session: self.session,
                        position: self.elapsed(),
                    });
                }
            }
        }

        events
    }
}
