use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::audio::StatusHandle;

use super::feed::{BAR_COUNT, VisualizerFeed};

/// Target cadence, roughly 30 ticks per second.
const TICK: Duration = Duration::from_millis(33);

type BarsHandle = Arc<Mutex<[u8; BAR_COUNT]>>;

/// Repeating feed tick tied to the player's lifetime.
///
/// The thread reads only the `playing` flag from the shared status. Missed
/// ticks are skipped rather than queued, so a stalled UI never produces a
/// burst of catch-up frames.
pub struct Visualizer {
    bars: BarsHandle,
    stop: Arc<AtomicBool>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Visualizer {
    pub fn connect(status: StatusHandle) -> Self {
        let bars: BarsHandle = Arc::new(Mutex::new([0; BAR_COUNT]));
        let stop = Arc::new(AtomicBool::new(false));

        let bars_for_thread = bars.clone();
        let stop_for_thread = stop.clone();
        let join = thread::spawn(move || {
            let mut feed = VisualizerFeed::new();
            let mut rng = rand::rng();
            let mut next_tick = Instant::now() + TICK;

            while !stop_for_thread.load(Ordering::Relaxed) {
                let now = Instant::now();
                if next_tick > now {
                    thread::sleep(next_tick - now);
                }
                next_tick += TICK;
                // Skip missed ticks instead of bursting to catch up.
                let now = Instant::now();
                while next_tick < now {
                    next_tick += TICK;
                }

                let playing = status.lock().map(|s| s.playing).unwrap_or(false);
                feed.advance(playing, &mut rng);
                if let Ok(mut shared) = bars_for_thread.lock() {
                    *shared = *feed.bars();
                }
            }
        });

        Self {
            bars,
            stop,
            join: Mutex::new(Some(join)),
        }
    }

    /// Snapshot of the current bar values.
    pub fn bars(&self) -> [u8; BAR_COUNT] {
        self.bars
            .lock()
            .map(|bars| *bars)
            .unwrap_or([0; BAR_COUNT])
    }

    /// Stop ticking and reset all bars to zero. Safe to call repeatedly.
    pub fn disconnect(&self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
        if let Ok(mut bars) = self.bars.lock() {
            *bars = [0; BAR_COUNT];
        }
    }
}

impl Drop for Visualizer {
    fn drop(&mut self) {
        self.disconnect();
    }
}
