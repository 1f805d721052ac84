use tracing::{info, warn};

use crate::catalog::{Album, Catalog, default_album};
use crate::config;
use crate::storage;

/// Resolve the album (configured file or built-in) and its audio URLs.
pub fn prepare_catalog(settings: &config::Settings) -> (Album, Catalog) {
    let album = match settings.catalog.album_path.as_deref() {
        Some(path) => match Album::load(path) {
            Ok(album) => album,
            Err(e) => {
                warn!("failed to load album file, using built-in album: {e}");
                default_album()
            }
        },
        None => default_album(),
    };

    let mut catalog = album.catalog();
    storage::apply_audio_urls(&mut catalog, &settings.storage);
    info!(
        album = album.title.as_str(),
        tracks = catalog.len(),
        resolved = storage::is_configured(&settings.storage),
        "catalog ready"
    );

    (album, catalog)
}
