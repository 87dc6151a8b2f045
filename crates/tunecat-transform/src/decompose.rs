//! Relational decomposition of the cleaned master table.
//!
//! ```text
//! master Frame (camelCase)
//!   └─ rename_to_schema()            → lowercase schema names
//!        └─ decompose()              → Decomposition
//!             ├─ artist   collapse by artist_id      (policy, default majority)
//!             ├─ album    collapse by collection_id  (policy, default first)
//!             ├─ track    collapse by track_id       (policy, default first)
//!             ├─ genre    distinct names, first-seen order
//!             └─ prices   one observation per (id, checked_at)
//!
//! store round-trip: insert genre names, read back (genre_id, name)
//!   └─ resolve_genres()              → Vec<Track>, or abort
//! ```
//!
//! Nothing here talks to a store: genre identifiers come in as a plain slice,
//! so the whole module can be exercised with a stub mapping.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tunecat_core::{
  Frame, Row, Value,
  catalog::{
    Album, AlbumPrice, Artist, Genre, NewGenre, TableRow, Track, TrackDraft,
    TrackPrice,
  },
};

use crate::{Error, Result};

// ─── Schema names ────────────────────────────────────────────────────────────

/// Raw API column → relational schema column. Columns not listed keep their
/// name (`checked_at` among them).
pub const SCHEMA_RENAMES: &[(&str, &str)] = &[
  ("artistId", "artist_id"),
  ("artistName", "artistname"),
  ("artistViewUrl", "artistviewurl"),
  ("collectionId", "collection_id"),
  ("collectionName", "collectionname"),
  ("collectionCensoredName", "collectioncensoredname"),
  ("releaseDate", "release_date"),
  ("collectionExplicitness", "collectionexplicitness"),
  ("contentAdvisoryRating", "contentadvisoryrating"),
  ("collectionPrice", "collectionprice"),
  ("trackCount", "trackcount"),
  ("discCount", "disccount"),
  ("collectionViewUrl", "collectionviewurl"),
  ("collectionArtistName", "collectionartistname"),
  ("collectionArtistViewUrl", "collectionartistviewurl"),
  ("trackId", "track_id"),
  ("trackName", "trackname"),
  ("trackNumber", "tracknumber"),
  ("trackPrice", "trackprice"),
  ("discNumber", "discnumber"),
  ("trackTimeMillis", "tracktimemillis"),
  ("trackExplicitness", "trackexplicitness"),
  ("trackViewUrl", "trackviewurl"),
  ("isStreamable", "is_streamable"),
  ("primaryGenreName", "primarygenrename"),
];

const CHECKED_AT: &str = "checked_at";
const GENRE_NAME: &str = "primarygenrename";

/// Track attributes as projected from the master table: the insert columns
/// minus `genre_id`, plus the genre name it is resolved from.
const TRACK_DRAFT_COLUMNS: &[&str] = &[
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
  GENRE_NAME,
];

/// Rename raw API columns to the lowercase relational names, in place.
pub fn rename_to_schema(frame: &mut Frame) {
  for (from, to) in SCHEMA_RENAMES {
    frame.rename(from, to);
  }
}

// ─── Options ─────────────────────────────────────────────────────────────────

/// How to pick attribute values when several master rows share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
  /// Keep the first row seen for the key, nulls included.
  #[default]
  First,
  /// Per attribute, the most frequent non-null value; ties go to the value
  /// seen first.
  Majority,
}

/// Conflict policy per identity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposeOptions {
  pub artist: ConflictPolicy,
  pub album:  ConflictPolicy,
  pub track:  ConflictPolicy,
}

impl Default for DecomposeOptions {
  fn default() -> Self {
    Self {
      artist: ConflictPolicy::Majority,
      album:  ConflictPolicy::First,
      track:  ConflictPolicy::First,
    }
  }
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// The six normalized tables derived from one master snapshot.
///
/// Tracks still reference their genre by name; see [`resolve_genres`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
  pub artists:      Vec<Artist>,
  pub albums:       Vec<Album>,
  pub tracks:       Vec<TrackDraft>,
  pub genres:       Vec<NewGenre>,
  pub track_prices: Vec<TrackPrice>,
  pub album_prices: Vec<AlbumPrice>,
}

// ─── Collapse ────────────────────────────────────────────────────────────────

/// Most frequent non-null value; on a tie, the one encountered first.
fn majority<'a>(values: impl Iterator<Item = &'a Value>) -> Value {
  let mut tally: Vec<(&Value, usize)> = Vec::new();
  for v in values.filter(|v| !v.is_null()) {
    match tally.iter_mut().find(|(seen, _)| *seen == v) {
      Some((_, n)) => *n += 1,
      None => tally.push((v, 1)),
    }
  }

  let mut best: Option<(&Value, usize)> = None;
  for (v, n) in tally {
    if best.is_none_or(|(_, m)| n > m) {
      best = Some((v, n));
    }
  }
  best.map_or(Value::Null, |(v, _)| v.clone())
}

/// Collapse `frame` to one row per non-null integer `key`, in first-seen key
/// order, with `attrs` resolved under `policy`.
fn collapse(
  frame: &Frame,
  key: &str,
  attrs: &[&str],
  policy: ConflictPolicy,
) -> Result<Frame> {
  frame.require(key)?;
  let attr_idx = attrs
    .iter()
    .map(|a| frame.require(a))
    .collect::<tunecat_core::Result<Vec<_>>>()?;

  let mut order: Vec<i64> = Vec::new();
  let mut groups: HashMap<i64, Vec<usize>> = HashMap::new();
  let mut keyless = 0usize;
  for row in frame.rows() {
    match row.int(key)? {
      Some(k) => groups
        .entry(k)
        .or_insert_with(|| {
          order.push(k);
          Vec::new()
        })
        .push(row.index()),
      None => keyless += 1,
    }
  }
  if keyless > 0 {
    tracing::warn!(key, keyless, "rows without a key skipped");
  }

  let mut out = Frame::new(std::iter::once(key).chain(attrs.iter().copied()));
  for k in order {
    let members = &groups[&k];
    let mut cells = Vec::with_capacity(attrs.len() + 1);
    cells.push(Value::Int(k));
    for &a in &attr_idx {
      cells.push(match policy {
        ConflictPolicy::First => frame.cell(members[0], a).clone(),
        ConflictPolicy::Majority => {
          majority(members.iter().map(|&r| frame.cell(r, a)))
        }
      });
    }
    out.push_row(cells)?;
  }
  Ok(out)
}

/// A key column of a collapsed frame; never null by construction.
fn key(row: &Row<'_>, column: &str) -> Result<i64> {
  row.int(column)?.ok_or_else(|| {
    Error::Core(tunecat_core::Error::CellType {
      row:      row.index(),
      column:   column.to_owned(),
      expected: "int",
      found:    "null",
    })
  })
}

// ─── Tables ──────────────────────────────────────────────────────────────────

fn artists(frame: &Frame, policy: ConflictPolicy) -> Result<Vec<Artist>> {
  let table = collapse(
    frame,
    Artist::COLUMNS[0],
    &Artist::COLUMNS[1..],
    policy,
  )?;
  table
    .rows()
    .map(|r| {
      Ok(Artist {
        artist_id:     key(&r, "artist_id")?,
        artistname:    r.text("artistname")?,
        artistviewurl: r.text("artistviewurl")?,
      })
    })
    .collect()
}

fn albums(frame: &Frame, policy: ConflictPolicy) -> Result<Vec<Album>> {
  let table = collapse(frame, Album::COLUMNS[0], &Album::COLUMNS[1..], policy)?;
  table
    .rows()
    .map(|r| {
      Ok(Album {
        collection_id:           key(&r, "collection_id")?,
        collectionname:          r.text("collectionname")?,
        collectioncensoredname:  r.text("collectioncensoredname")?,
        release_date:            r.date("release_date")?,
        collectionexplicitness:  r.text("collectionexplicitness")?,
        contentadvisoryrating:   r.text("contentadvisoryrating")?,
        collectionprice:         r.float("collectionprice")?,
        currency:                r.text("currency")?,
        trackcount:              r.int("trackcount")?,
        disccount:               r.int("disccount")?,
        collectionviewurl:       r.text("collectionviewurl")?,
        collectionartistname:    r.text("collectionartistname")?,
        collectionartistviewurl: r.text("collectionartistviewurl")?,
        artist_id:               r.int("artist_id")?,
      })
    })
    .collect()
}

fn track_drafts(frame: &Frame, policy: ConflictPolicy) -> Result<Vec<TrackDraft>> {
  let table = collapse(
    frame,
    TRACK_DRAFT_COLUMNS[0],
    &TRACK_DRAFT_COLUMNS[1..],
    policy,
  )?;
  table
    .rows()
    .map(|r| {
      Ok(TrackDraft {
        track_id:          key(&r, "track_id")?,
        trackname:         r.text("trackname")?,
        tracknumber:       r.int("tracknumber")?,
        trackprice:        r.float("trackprice")?,
        discnumber:        r.int("discnumber")?,
        tracktimemillis:   r.int("tracktimemillis")?,
        trackexplicitness: r.text("trackexplicitness")?,
        release_date:      r.date("release_date")?,
        trackviewurl:      r.text("trackviewurl")?,
        is_streamable:     r.bool("is_streamable")?,
        kind:              r.text("kind")?,
        artist_id:         r.int("artist_id")?,
        collection_id:     r.int("collection_id")?,
        primarygenrename:  r.text(GENRE_NAME)?,
      })
    })
    .collect()
}

/// Distinct non-null genre names in first-seen order.
fn genre_names(frame: &Frame) -> Result<Vec<NewGenre>> {
  let mut seen = HashSet::new();
  let mut genres = Vec::new();
  for row in frame.rows() {
    if let Some(name) = row.text(GENRE_NAME)?
      && seen.insert(name.clone())
    {
      genres.push(NewGenre { primarygenrename: name });
    }
  }
  Ok(genres)
}

/// `(id, price, checked_at)` observations: rows with any null are excluded,
/// then the first observation per `(id, checked_at)` wins.
fn price_history(
  frame: &Frame,
  id_column: &str,
  price_column: &str,
) -> Result<Vec<(i64, f64, NaiveDate)>> {
  let mut seen = HashSet::new();
  let mut history = Vec::new();
  for row in frame.rows() {
    let (Some(id), Some(price), Some(day)) = (
      row.int(id_column)?,
      row.float(price_column)?,
      row.date(CHECKED_AT)?,
    ) else {
      continue;
    };
    if seen.insert((id, day)) {
      history.push((id, price, day));
    }
  }
  Ok(history)
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Split a schema-named master frame into the six normalized tables.
pub fn decompose(frame: &Frame, options: &DecomposeOptions) -> Result<Decomposition> {
  let out = Decomposition {
    artists:      artists(frame, options.artist)?,
    albums:       albums(frame, options.album)?,
    tracks:       track_drafts(frame, options.track)?,
    genres:       genre_names(frame)?,
    track_prices: price_history(frame, "track_id", "trackprice")?
      .into_iter()
      .map(|(track_id, trackprice, checked_at)| TrackPrice {
        track_id,
        trackprice,
        checked_at,
      })
      .collect(),
    album_prices: price_history(frame, "collection_id", "collectionprice")?
      .into_iter()
      .map(|(collection_id, collectionprice, checked_at)| AlbumPrice {
        collection_id,
        collectionprice,
        checked_at,
      })
      .collect(),
  };

  tracing::info!(
    artists = out.artists.len(),
    albums = out.albums.len(),
    tracks = out.tracks.len(),
    genres = out.genres.len(),
    track_prices = out.track_prices.len(),
    album_prices = out.album_prices.len(),
    "master table decomposed"
  );
  Ok(out)
}

/// Rename a raw-named master frame to the schema and decompose it.
pub fn decompose_master(mut master: Frame, options: &DecomposeOptions) -> Result<Decomposition> {
  rename_to_schema(&mut master);
  decompose(&master, options)
}

/// Attach store-assigned genre identifiers to track drafts by genre name.
///
/// Every track must match. If any does not (including a track without a
/// genre name), nothing is returned and the error lists the unmatched names.
pub fn resolve_genres(drafts: Vec<TrackDraft>, genres: &[Genre]) -> Result<Vec<Track>> {
  let ids: HashMap<&str, i64> = genres
    .iter()
    .map(|g| (g.primarygenrename.as_str(), g.genre_id))
    .collect();

  let mut tracks = Vec::with_capacity(drafts.len());
  let mut unmatched = 0usize;
  let mut names: Vec<String> = Vec::new();

  for draft in drafts {
    let genre_id = draft
      .primarygenrename
      .as_deref()
      .and_then(|n| ids.get(n))
      .copied();
    match genre_id {
      Some(genre_id) => tracks.push(Track { draft, genre_id }),
      None => {
        unmatched += 1;
        let name = draft
          .primarygenrename
          .unwrap_or_else(|| "<null>".to_owned());
        if !names.contains(&name) {
          names.push(name);
        }
      }
    }
  }

  if unmatched > 0 {
    tracing::error!(unmatched, ?names, "tracks without a genre_id; aborting");
    return Err(Error::UnresolvedGenres { count: unmatched, names });
  }
  Ok(tracks)
}
