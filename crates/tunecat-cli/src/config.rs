//! Pipeline configuration: an optional TOML file layered with `TUNECAT_*`
//! environment variables. Every field has a default, so an empty
//! configuration is valid.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use tunecat_io::scrape::ExtractConfig;
use tunecat_transform::TransformConfig;

/// Where the pipeline reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
  pub raw_dir:      PathBuf,
  pub raw_prefix:   String,
  pub snapshot_dir: PathBuf,
  pub store_path:   PathBuf,
}

impl Default for PathsConfig {
  fn default() -> Self {
    Self {
      raw_dir:      PathBuf::from("data/raw"),
      raw_prefix:   "itunes_".to_owned(),
      snapshot_dir: PathBuf::from("data/clean"),
      store_path:   PathBuf::from("data/tunecat.db"),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
  pub paths:     PathsConfig,
  pub extract:   ExtractConfig,
  pub transform: TransformConfig,
}

impl PipelineConfig {
  /// Read `path` if it exists, then apply environment overrides such as
  /// `TUNECAT_PATHS__STORE_PATH=/tmp/catalog.db`.
  pub fn load(path: &Path) -> Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("TUNECAT")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise PipelineConfig")
  }
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};
  use tunecat_transform::decompose::ConflictPolicy;

  use super::*;

  fn parse(toml: &str) -> PipelineConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = parse("");
    assert_eq!(cfg, PipelineConfig::default());
    assert_eq!(cfg.extract.terms_per_day, 97);
    assert_eq!(cfg.transform.surrogate_key_column, "collectionArtistId");
    assert_eq!(cfg.transform.conflict_policy.artist, ConflictPolicy::Majority);
  }

  #[test]
  fn sections_override_individual_fields() {
    let cfg = parse(
      r#"
      [paths]
      store_path = "/tmp/catalog.db"

      [extract]
      terms_per_day = 5

      [transform]
      fill_text_placeholder = "Unknown"
      conflict_policy = { artist = "first" }
      "#,
    );
    assert_eq!(cfg.paths.store_path, PathBuf::from("/tmp/catalog.db"));
    assert_eq!(cfg.paths.raw_prefix, "itunes_");
    assert_eq!(cfg.extract.terms_per_day, 5);
    assert_eq!(cfg.extract.limit, 200);
    assert_eq!(cfg.transform.fill_text_placeholder, "Unknown");
    assert_eq!(cfg.transform.conflict_policy.artist, ConflictPolicy::First);
    assert_eq!(cfg.transform.conflict_policy.album, ConflictPolicy::First);
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = PipelineConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.paths, PathsConfig::default());
  }
}
