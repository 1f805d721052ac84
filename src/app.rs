//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the album catalog,
//! selection and playback related flags.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
