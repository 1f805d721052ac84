use std::time::Duration;

/// One catalog entry: metadata plus the resolved audio URL.
///
/// `audio_url` is empty until the storage resolver fills it in; playing a
/// track with an empty URL surfaces a configuration error instead of a
/// playback attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub title: String,
    /// Printed length, `m:ss`, as declared on the album sleeve.
    pub duration_label: String,
    pub audio_url: String,
    /// 1-based, dense, assigned from declaration order.
    pub track_number: u32,
    pub display: String,
}

impl Track {
    /// Parse the `m:ss` label into a `Duration`.
    ///
    /// Used as a stand-in until the decoder reports the actual duration.
    pub fn duration_hint(&self) -> Option<Duration> {
        parse_duration_label(&self.duration_label)
    }
}

/// Parse a `m:ss` duration label. Rejects malformed labels rather than
/// guessing (`None` simply means "duration unknown until decoded").
pub fn parse_duration_label(label: &str) -> Option<Duration> {
    let (minutes, seconds) = label.trim().split_once(':')?;
    let m: u64 = minutes.parse().ok()?;
    if seconds.len() != 2 {
        return None;
    }
    let s: u64 = seconds.parse().ok()?;
    if s >= 60 {
        return None;
    }
    Some(Duration::from_secs(m * 60 + s))
}

/// The ordered track list with id-based lookups.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn by_id(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Position of a track in declaration order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// The catalog successor, or `None` on the last track. Never wraps.
    pub fn next_after(&self, id: &str) -> Option<&Track> {
        let pos = self.position(id)?;
        self.tracks.get(pos + 1)
    }

    /// The catalog predecessor, or `None` on the first track. Never wraps.
    pub fn previous_before(&self, id: &str) -> Option<&Track> {
        let pos = self.position(id)?;
        pos.checked_sub(1).and_then(|p| self.tracks.get(p))
    }
}
