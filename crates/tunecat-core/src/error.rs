//! Error types for `tunecat-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("column not found: {0:?}")]
  MissingColumn(String),

  #[error("row has {found} cells, frame has {expected} columns")]
  RowLength { expected: usize, found: usize },

  #[error("row {row}, column {column:?}: expected {expected}, found {found}")]
  CellType {
    row:      usize,
    column:   String,
    expected: &'static str,
    found:    &'static str,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
