//! Album catalog: track metadata and adjacency lookups.
//!
//! The player serves exactly one album. Tracks are declared in order; that
//! declaration order is what "next" and "previous" mean, independent of the
//! printed track numbers.

mod album;
mod model;

pub use album::*;
pub use model::*;

#[cfg(test)]
mod tests;
