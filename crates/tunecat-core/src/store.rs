//! The `CatalogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tunecat-store-sqlite`).
//! The load step depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  Value,
  catalog::{Genre, Table, TableRow},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the relational store the catalog is loaded into.
///
/// Identifiers of genres are assigned by the store, not by the pipeline, so
/// loading is a round-trip: insert genre names, then read back
/// [`CatalogStore::genres`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `rows` into `table`; each row holds one value per entry of
  /// `columns`, in the same order.
  ///
  /// For identity tables ([`Table::is_identity`]) a row whose first column
  /// collides with an existing key is silently ignored. History tables take
  /// every row. Returns the number of rows actually written.
  fn insert_rows(
    &self,
    table: Table,
    columns: &'static [&'static str],
    rows: Vec<Vec<Value>>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// The current `(genre_id, genre_name)` assignments.
  fn genres(
    &self,
  ) -> impl Future<Output = Result<Vec<Genre>, Self::Error>> + Send + '_;
}

/// Insert typed rows through [`CatalogStore::insert_rows`] using the row
/// type's own table and column list.
pub async fn insert_all<S, R>(store: &S, rows: &[R]) -> Result<usize, S::Error>
where
  S: CatalogStore,
  R: TableRow,
{
  let values = rows.iter().map(TableRow::values).collect();
  store.insert_rows(R::TABLE, R::COLUMNS, values).await
}
