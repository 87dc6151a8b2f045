//! Normalized catalog tables: the output of decomposition and the input of
//! the relational store.
//!
//! Each row type knows its target table and its exact, ordered column list via
//! [`TableRow`]. Column names follow the lowercase relational schema.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Value;

// ─── Tables ──────────────────────────────────────────────────────────────────

/// The six tables of the relational schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
  Artist,
  Album,
  Track,
  Genre,
  TrackPrices,
  AlbumPrices,
}

impl Table {
  pub const ALL: [Table; 6] = [
    Table::Artist,
    Table::Album,
    Table::Track,
    Table::Genre,
    Table::TrackPrices,
    Table::AlbumPrices,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Table::Artist => "artist",
      Table::Album => "album",
      Table::Track => "track",
      Table::Genre => "genre",
      Table::TrackPrices => "track_prices",
      Table::AlbumPrices => "album_prices",
    }
  }

  /// Identity tables ignore rows whose key already exists; history tables
  /// take every row.
  pub fn is_identity(self) -> bool {
    matches!(
      self,
      Table::Artist | Table::Album | Table::Track | Table::Genre
    )
  }
}

/// A row type bound to one table and one ordered column list.
pub trait TableRow {
  const TABLE: Table;
  /// Insert columns; the first one is the conflict key of identity tables.
  const COLUMNS: &'static [&'static str];

  /// Cell values in [`TableRow::COLUMNS`] order.
  fn values(&self) -> Vec<Value>;
}

// ─── Artist ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
  pub artist_id:     i64,
  pub artistname:    Option<String>,
  pub artistviewurl: Option<String>,
}

impl TableRow for Artist {
  const TABLE: Table = Table::Artist;
  const COLUMNS: &'static [&'static str] =
    &["artist_id", "artistname", "artistviewurl"];

  fn values(&self) -> Vec<Value> {
    vec![
      self.artist_id.into(),
      self.artistname.clone().into(),
      self.artistviewurl.clone().into(),
    ]
  }
}

// ─── Album ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
  pub collection_id:           i64,
  pub collectionname:          Option<String>,
  pub collectioncensoredname:  Option<String>,
  pub release_date:            Option<NaiveDate>,
  pub collectionexplicitness:  Option<String>,
  pub contentadvisoryrating:   Option<String>,
  pub collectionprice:         Option<f64>,
  pub currency:                Option<String>,
  pub trackcount:              Option<i64>,
  pub disccount:               Option<i64>,
  pub collectionviewurl:       Option<String>,
  pub collectionartistname:    Option<String>,
  pub collectionartistviewurl: Option<String>,
  pub artist_id:               Option<i64>,
}

impl TableRow for Album {
  const TABLE: Table = Table::Album;
  const COLUMNS: &'static [&'static str] = &[
    "collection_id",
    "collectionname",
    "collectioncensoredname",
    "release_date",
    "collectionexplicitness",
    "contentadvisoryrating",
    "collectionprice",
    "currency",
    "trackcount",
    "disccount",
    "collectionviewurl",
    "collectionartistname",
    "collectionartistviewurl",
    "artist_id",
  ];

  fn values(&self) -> Vec<Value> {
    vec![
      self.collection_id.into(),
      self.collectionname.clone().into(),
      self.collectioncensoredname.clone().into(),
      self.release_date.into(),
      self.collectionexplicitness.clone().into(),
      self.contentadvisoryrating.clone().into(),
      self.collectionprice.into(),
      self.currency.clone().into(),
      self.trackcount.into(),
      self.disccount.into(),
      self.collectionviewurl.clone().into(),
      self.collectionartistname.clone().into(),
      self.collectionartistviewurl.clone().into(),
      self.artist_id.into(),
    ]
  }
}

// ─── Track ───────────────────────────────────────────────────────────────────

/// A track as emitted by decomposition, still carrying its genre by name.
///
/// It becomes a [`Track`] once the store has assigned genre identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDraft {
  pub track_id:          i64,
  pub trackname:         Option<String>,
  pub tracknumber:       Option<i64>,
  pub trackprice:        Option<f64>,
  pub discnumber:        Option<i64>,
  pub tracktimemillis:   Option<i64>,
  pub trackexplicitness: Option<String>,
  pub release_date:      Option<NaiveDate>,
  pub trackviewurl:      Option<String>,
  pub is_streamable:     Option<bool>,
  pub kind:              Option<String>,
  pub artist_id:         Option<i64>,
  pub collection_id:     Option<i64>,
  pub primarygenrename:  Option<String>,
}

/// A track with a resolved genre foreign key, ready for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
  #[serde(flatten)]
  pub draft:    TrackDraft,
  pub genre_id: i64,
}

impl TableRow for Track {
  const TABLE: Table = Table::Track;
  const COLUMNS: &'static [&'static str] = &[
    "track_id",
    "trackname",
    "tracknumber",
    "trackprice",
    "discnumber",
    "tracktimemillis",
    "trackexplicitness",
    "release_date",
    "trackviewurl",
    "is_streamable",
    "kind",
    "artist_id",
    "collection_id",
    "genre_id",
  ];

  fn values(&self) -> Vec<Value> {
    let d = &self.draft;
    vec![
      d.track_id.into(),
      d.trackname.clone().into(),
      d.tracknumber.into(),
      d.trackprice.into(),
      d.discnumber.into(),
      d.tracktimemillis.into(),
      d.trackexplicitness.clone().into(),
      d.release_date.into(),
      d.trackviewurl.clone().into(),
      d.is_streamable.into(),
      d.kind.clone().into(),
      d.artist_id.into(),
      d.collection_id.into(),
      self.genre_id.into(),
    ]
  }
}

// ─── Genre ───────────────────────────────────────────────────────────────────

/// A genre name awaiting a store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGenre {
  pub primarygenrename: String,
}

impl TableRow for NewGenre {
  const TABLE: Table = Table::Genre;
  const COLUMNS: &'static [&'static str] = &["primarygenrename"];

  fn values(&self) -> Vec<Value> {
    vec![self.primarygenrename.clone().into()]
  }
}

/// A genre as stored, with its assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
  pub genre_id:         i64,
  pub primarygenrename: String,
}

// ─── Price history ───────────────────────────────────────────────────────────

/// One observed track price on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPrice {
  pub track_id:   i64,
  pub trackprice: f64,
  pub checked_at: NaiveDate,
}

impl TableRow for TrackPrice {
  const TABLE: Table = Table::TrackPrices;
  const COLUMNS: &'static [&'static str] =
    &["track_id", "trackprice", "checked_at"];

  fn values(&self) -> Vec<Value> {
    vec![
      self.track_id.into(),
      self.trackprice.into(),
      self.checked_at.into(),
    ]
  }
}

/// One observed album price on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumPrice {
  pub collection_id:   i64,
  pub collectionprice: f64,
  pub checked_at:      NaiveDate,
}

impl TableRow for AlbumPrice {
  const TABLE: Table = Table::AlbumPrices;
  const COLUMNS: &'static [&'static str] =
    &["collection_id", "collectionprice", "checked_at"];

  fn values(&self) -> Vec<Value> {
    vec![
      self.collection_id.into(),
      self.collectionprice.into(),
      self.checked_at.into(),
    ]
  }
}
