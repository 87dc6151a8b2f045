//! Loading a [`Decomposition`] into a [`CatalogStore`].
//!
//! Order: genre names first, then the genre round-trip, then the identity
//! tables parent-first, then both price histories. Genre resolution happens
//! before anything but genres is written, so an unresolvable track leaves the
//! store without partial artist/album/track data.

use serde::Serialize;
use tunecat_core::{
  catalog::Table,
  store::{CatalogStore, insert_all},
};

use crate::{
  Error, Result,
  decompose::{Decomposition, resolve_genres},
};

/// Rows written per table by one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
  pub genres:       usize,
  pub artists:      usize,
  pub albums:       usize,
  pub tracks:       usize,
  pub track_prices: usize,
  pub album_prices: usize,
}

impl LoadSummary {
  pub fn get(&self, table: Table) -> usize {
    match table {
      Table::Artist => self.artists,
      Table::Album => self.albums,
      Table::Track => self.tracks,
      Table::Genre => self.genres,
      Table::TrackPrices => self.track_prices,
      Table::AlbumPrices => self.album_prices,
    }
  }
}

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}

/// Write every table of `tables` to `store`.
pub async fn load_catalog<S: CatalogStore>(
  store: &S,
  tables: Decomposition,
) -> Result<LoadSummary> {
  let mut summary = LoadSummary {
    genres: insert_all(store, &tables.genres).await.map_err(store_err)?,
    ..LoadSummary::default()
  };

  let genres = store.genres().await.map_err(store_err)?;
  tracing::debug!(known = genres.len(), "genre identifiers read back");
  let tracks = resolve_genres(tables.tracks, &genres)?;

  summary.artists = insert_all(store, &tables.artists).await.map_err(store_err)?;
  summary.albums = insert_all(store, &tables.albums).await.map_err(store_err)?;
  summary.tracks = insert_all(store, &tracks).await.map_err(store_err)?;
  summary.track_prices =
    insert_all(store, &tables.track_prices).await.map_err(store_err)?;
  summary.album_prices =
    insert_all(store, &tables.album_prices).await.map_err(store_err)?;

  for table in Table::ALL {
    tracing::info!(table = table.name(), rows = summary.get(table), "table loaded");
  }
  Ok(summary)
}
