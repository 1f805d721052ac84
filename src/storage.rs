//! Remote object-storage URL resolution.
//!
//! The album audio lives in a public bucket; object keys are derived from
//! the track number and id (`01-international-luv.mp3`). Unconfigured
//! storage is not an error at startup: tracks simply keep an empty audio
//! URL and the player reports a configuration problem when one is played.

use tracing::warn;

use crate::catalog::{Catalog, Track};
use crate::config::StorageSettings;

/// Object key for a track inside the bucket.
pub fn object_key(track: &Track) -> String {
    format!("{:02}-{}.mp3", track.track_number, track.id)
}

/// Whether enough storage configuration is present to build URLs.
pub fn is_configured(settings: &StorageSettings) -> bool {
    !settings.base_url.trim().is_empty() && !settings.bucket.trim().is_empty()
}

/// Fully qualified public URL for a track, or `None` when unconfigured.
pub fn public_url(settings: &StorageSettings, track: &Track) -> Option<String> {
    if !is_configured(settings) {
        return None;
    }
    let base = settings.base_url.trim().trim_end_matches('/');
    let bucket = settings.bucket.trim().trim_matches('/');
    Some(format!("{}/{}/{}", base, bucket, object_key(track)))
}

/// Fill in `audio_url` for every catalog track.
///
/// With unconfigured storage every URL is left empty and a single warning
/// is logged; playback of those tracks settles into a configuration error
/// instead of a fetch attempt.
pub fn apply_audio_urls(catalog: &mut Catalog, settings: &StorageSettings) {
    if !is_configured(settings) {
        warn!(
            bucket = settings.bucket.as_str(),
            "storage not configured; tracks will have no audio URL"
        );
        return;
    }

    for track in catalog.tracks_mut() {
        track.audio_url = public_url(settings, track).unwrap_or_default();
    }
}
