use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::model::{Catalog, Track};

/// Album declaration: sleeve metadata plus the ordered track list.
///
/// Loaded from a TOML file when one is configured, otherwise the built-in
/// album is used. Track numbers are not declared; they are assigned densely
/// from declaration order when the catalog is built.
#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub title: String,
    pub artist: String,
    pub tracks: Vec<AlbumTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumTrack {
    pub id: String,
    pub title: String,
    /// Printed length, `m:ss`.
    pub duration: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AlbumError {
    #[error("failed to read album file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse album file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("album has no tracks")]
    Empty,
    #[error("duplicate track id {0:?}")]
    DuplicateId(String),
}

impl Album {
    pub fn load(path: &Path) -> Result<Self, AlbumError> {
        let text = std::fs::read_to_string(path).map_err(|source| AlbumError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let album: Album = toml::from_str(&text)?;
        album.validate()?;
        Ok(album)
    }

    fn validate(&self) -> Result<(), AlbumError> {
        if self.tracks.is_empty() {
            return Err(AlbumError::Empty);
        }
        let mut seen: Vec<&str> = Vec::with_capacity(self.tracks.len());
        for t in &self.tracks {
            if seen.contains(&t.id.as_str()) {
                return Err(AlbumError::DuplicateId(t.id.clone()));
            }
            seen.push(&t.id);
        }
        Ok(())
    }

    /// Build the catalog: dense 1-based numbering and display strings,
    /// audio URLs left empty for the storage resolver to fill in.
    pub fn catalog(&self) -> Catalog {
        let tracks = self
            .tracks
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let track_number = (i + 1) as u32;
                Track {
                    id: t.id.clone(),
                    title: t.title.clone(),
                    duration_label: t.duration.clone(),
                    audio_url: String::new(),
                    track_number,
                    display: format!("{:02}. {}", track_number, t.title),
                }
            })
            .collect();
        Catalog::new(tracks)
    }
}

/// The album this player ships with.
pub fn default_album() -> Album {
    let tracks = [
        ("international-luv", "International Luv (Western Union Mix)", "3:45"),
        ("urgent-opportunity", "Urgent Opportunity", "4:12"),
        ("wire-transferrable-love", "Wire-Transferrable Love", "3:58"),
        ("u-got-the-routing", "U Got the Routing #!", "4:20"),
        ("money-never-lies", "Money Never Lies, but, I might", "3:33"),
        ("beneficiary-dreams", "Beneficiary Dreams", "4:05"),
    ];

    Album {
        title: "Royal 419".to_string(),
        artist: "The Prince of Nigeria".to_string(),
        tracks: tracks
            .into_iter()
            .map(|(id, title, duration)| AlbumTrack {
                id: id.to_string(),
                title: title.to_string(),
                duration: duration.to_string(),
            })
            .collect(),
    }
}
