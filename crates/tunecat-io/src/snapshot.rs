//! JSON snapshots between the transform and load steps.
//!
//! `master.json` holds the cleaned master frame with cell types preserved;
//! every normalized table is stored as `<table>.json`. Tracks are stored
//! before genre resolution, so they still name their genre.

use std::{
  fs::File,
  io::{BufReader, BufWriter, Write as _},
  path::PathBuf,
};

use serde::{Serialize, de::DeserializeOwned};
use tunecat_core::{Frame, catalog::Table};
use tunecat_transform::decompose::Decomposition;

use crate::{Error, Result};

pub const MASTER_FILE: &str = "master.json";

fn table_file(table: Table) -> String { format!("{}.json", table.name()) }

/// A directory of snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotDir {
  dir: PathBuf,
}

impl SnapshotDir {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf> {
    std::fs::create_dir_all(&self.dir).map_err(Error::io(&self.dir))?;
    let path = self.dir.join(name);
    let file = File::create(&path).map_err(Error::io(&path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(Error::json(&path))?;
    writer.flush().map_err(Error::io(&path))?;
    tracing::debug!(file = %path.display(), "snapshot written");
    Ok(path)
  }

  fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
    let path = self.dir.join(name);
    let file = File::open(&path).map_err(Error::io(&path))?;
    serde_json::from_reader(BufReader::new(file)).map_err(Error::json(&path))
  }

  pub fn write_master(&self, master: &Frame) -> Result<PathBuf> {
    self.write_json(MASTER_FILE, master)
  }

  pub fn read_master(&self) -> Result<Frame> { self.read_json(MASTER_FILE) }

  /// Write the six normalized tables, one file each.
  pub fn write_tables(&self, tables: &Decomposition) -> Result<()> {
    self.write_json(&table_file(Table::Artist), &tables.artists)?;
    self.write_json(&table_file(Table::Album), &tables.albums)?;
    self.write_json(&table_file(Table::Track), &tables.tracks)?;
    self.write_json(&table_file(Table::Genre), &tables.genres)?;
    self.write_json(&table_file(Table::TrackPrices), &tables.track_prices)?;
    self.write_json(&table_file(Table::AlbumPrices), &tables.album_prices)?;
    tracing::info!(dir = %self.dir.display(), "table snapshots written");
    Ok(())
  }

  pub fn read_tables(&self) -> Result<Decomposition> {
    Ok(Decomposition {
      artists:      self.read_json(&table_file(Table::Artist))?,
      albums:       self.read_json(&table_file(Table::Album))?,
      tracks:       self.read_json(&table_file(Table::Track))?,
      genres:       self.read_json(&table_file(Table::Genre))?,
      track_prices: self.read_json(&table_file(Table::TrackPrices))?,
      album_prices: self.read_json(&table_file(Table::AlbumPrices))?,
    })
  }
}
