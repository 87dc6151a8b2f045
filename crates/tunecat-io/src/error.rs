//! Error type for `tunecat-io`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tunecat_core::Error),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The search API answered with something other than `200 OK`.
  #[error("search for {term:?} returned {status}")]
  Status {
    term:   String,
    status: reqwest::StatusCode,
  },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("json error in {path}: {source}")]
  Json {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("i/o error on {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
    let path = path.into();
    move |source| Self::Io { path, source }
  }

  pub(crate) fn json(path: impl Into<PathBuf>) -> impl FnOnce(serde_json::Error) -> Self {
    let path = path.into();
    move |source| Self::Json { path, source }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
