use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/jewelbox/config.toml` or
/// `~/.config/jewelbox/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `JEWELBOX__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Public base URL of the object storage, e.g.
    /// `https://<project>.supabase.co/storage/v1/object/public`.
    /// Empty means "not configured": tracks get no audio URL and playing
    /// them reports a configuration error instead of fetching.
    pub base_url: String,
    /// Bucket holding the album audio files.
    pub bucket: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            bucket: "royal419-audio".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial playback volume in `[0, 1]`.
    pub volume: f32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the visualizer bars start visible.
    pub show_visualizer: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ ROYAL 419 ~ The Prince of Nigeria ~ ".to_string(),
            show_visualizer: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change applied by `-` / `+`.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Optional TOML album file overriding the built-in album.
    pub album_path: Option<PathBuf>,
}
