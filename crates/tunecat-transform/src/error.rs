//! Error types for `tunecat-transform`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tunecat_core::Error),

  /// Tracks whose genre name has no identifier in the store. Loading must
  /// stop before any track is written.
  #[error("{count} track(s) could not resolve a genre_id; unmatched genres: {names:?}")]
  UnresolvedGenres { count: usize, names: Vec<String> },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
