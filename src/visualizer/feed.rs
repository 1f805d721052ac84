use rand::Rng;

/// Number of bars in the feed.
pub const BAR_COUNT: usize = 48;
/// The first quarter of the bars models bass emphasis.
const BASS_BARS: usize = BAR_COUNT / 4;
/// Multiplicative fade applied per tick while paused.
const DECAY: f32 = 0.9;
/// Blend weight of the fresh target; the rest keeps the previous value.
const SMOOTHING: f32 = 0.3;
const BASS_BOOST: f32 = 1.5;

/// Simulated amplitude bars in `[0, 255]`.
#[derive(Debug, Clone)]
pub struct VisualizerFeed {
    bars: [u8; BAR_COUNT],
}

impl VisualizerFeed {
    pub fn new() -> Self {
        Self {
            bars: [0; BAR_COUNT],
        }
    }

    pub fn bars(&self) -> &[u8; BAR_COUNT] {
        &self.bars
    }

    pub fn reset(&mut self) {
        self.bars = [0; BAR_COUNT];
    }

    /// Advance one tick. Paused bars fade multiplicatively toward zero;
    /// playing bars chase a fresh random target, bass-weighted at the low
    /// end, blended with the previous value for continuity.
    pub fn advance<R: Rng>(&mut self, playing: bool, rng: &mut R) {
        if !playing {
            for bar in &mut self.bars {
                *bar = (f32::from(*bar) * DECAY) as u8;
            }
            return;
        }

        for (i, bar) in self.bars.iter_mut().enumerate() {
            let boost = if i < BASS_BARS { BASS_BOOST } else { 1.0 };
            let target = (rng.random_range(0.0..120.0) + 60.0) * boost;
            let next = f32::from(*bar) * (1.0 - SMOOTHING) + target * SMOOTHING;
            *bar = next.min(255.0) as u8;
        }
    }

    #[cfg(test)]
    pub(crate) fn fill(&mut self, value: u8) {
        self.bars = [value; BAR_COUNT];
    }
}

impl Default for VisualizerFeed {
    fn default() -> Self {
        Self::new()
    }
}
