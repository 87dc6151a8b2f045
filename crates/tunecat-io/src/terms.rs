//! Search terms and the log of terms already used.
//!
//! The term space is every two-letter lowercase combination, `aa` to `zz`.
//! Each scrape run takes the first terms that are not yet in the log, and a
//! term is appended to the log only once it has produced results.

use std::{
  collections::HashSet,
  fs::OpenOptions,
  io::Write as _,
  path::{Path, PathBuf},
};

use crate::{Error, Result};

/// All 676 search terms in lexicographic order.
pub fn all_terms() -> Vec<String> {
  ('a'..='z')
    .flat_map(|a| ('a'..='z').map(move |b| format!("{a}{b}")))
    .collect()
}

/// Plain-text log of used terms, one per line.
#[derive(Debug, Clone)]
pub struct TermLog {
  path: PathBuf,
}

impl TermLog {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  /// Terms recorded so far. A missing log means none.
  pub fn used(&self) -> Result<HashSet<String>> {
    match std::fs::read_to_string(&self.path) {
      Ok(text) => Ok(
        text
          .lines()
          .map(str::trim)
          .filter(|l| !l.is_empty())
          .map(str::to_owned)
          .collect(),
      ),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashSet::new()),
      Err(e) => Err(Error::io(&self.path)(e)),
    }
  }

  /// Up to `n` terms not yet recorded, in term order.
  pub fn pending(&self, n: usize) -> Result<Vec<String>> {
    let used = self.used()?;
    Ok(
      all_terms()
        .into_iter()
        .filter(|t| !used.contains(t))
        .take(n)
        .collect(),
    )
  }

  /// Append `term` to the log, creating the file and its directory if needed.
  pub fn record(&self, term: &str) -> Result<()> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent).map_err(Error::io(parent))?;
    }
    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)
      .map_err(Error::io(&self.path))?;
    writeln!(file, "{term}").map_err(Error::io(&self.path))
  }
}
