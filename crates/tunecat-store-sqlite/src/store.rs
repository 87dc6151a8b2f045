//! [`SqliteStore`]: the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use tunecat_core::{
  Value,
  catalog::{Genre, Table, TrackPrice},
  store::CatalogStore,
};

use crate::{
  Error, Result,
  encode::{RawGenre, decode_date, encode_value},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tunecat catalog backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of rows currently in `table`.
  pub async fn count(&self, table: Table) -> Result<usize> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.name());
    let n: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |r| r.get(0))?))
      .await?;
    Ok(usize::try_from(n).unwrap_or_default())
  }

  /// Every recorded price of one track, oldest first.
  pub async fn track_price_history(&self, track_id: i64) -> Result<Vec<TrackPrice>> {
    let raws: Vec<(i64, f64, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT track_id, trackprice, checked_at FROM track_prices
           WHERE track_id = ?1 ORDER BY checked_at, rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![track_id], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(track_id, trackprice, checked_at)| {
        Ok(TrackPrice {
          track_id,
          trackprice,
          checked_at: decode_date(&checked_at)?,
        })
      })
      .collect()
  }
}

/// `INSERT` statement for `table`. Identity tables skip rows whose first
/// column already exists.
fn insert_sql(table: Table, columns: &[&str]) -> String {
  let placeholders = (1..=columns.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  let mut sql = format!(
    "INSERT INTO {} ({}) VALUES ({placeholders})",
    table.name(),
    columns.join(", "),
  );
  if table.is_identity() {
    sql.push_str(&format!(" ON CONFLICT ({}) DO NOTHING", columns[0]));
  }
  sql
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  async fn insert_rows(
    &self,
    table: Table,
    columns: &'static [&'static str],
    rows: Vec<Vec<Value>>,
  ) -> Result<usize> {
    if rows.is_empty() {
      return Ok(0);
    }
    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
      return Err(Error::RowWidth {
        table: table.name(),
        row,
        expected: columns.len(),
        found: r.len(),
      });
    }

    let sql = insert_sql(table, columns);
    let total = rows.len();
    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut written = 0usize;
        {
          let mut stmt = tx.prepare(&sql)?;
          for row in rows {
            written +=
              stmt.execute(rusqlite::params_from_iter(row.into_iter().map(encode_value)))?;
          }
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;

    if written < total {
      tracing::debug!(
        table = table.name(),
        skipped = total - written,
        "rows with existing keys ignored"
      );
    }
    Ok(written)
  }

  async fn genres(&self) -> Result<Vec<Genre>> {
    let raws: Vec<RawGenre> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT genre_id, primarygenrename FROM genre ORDER BY genre_id")?;
        let rows = stmt
          .query_map([], |r| {
            Ok(RawGenre {
              genre_id:         r.get(0)?,
              primarygenrename: r.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawGenre::into_genre).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identity_tables_ignore_conflicts() {
    assert_eq!(
      insert_sql(Table::Genre, &["primarygenrename"]),
      "INSERT INTO genre (primarygenrename) VALUES (?1) \
       ON CONFLICT (primarygenrename) DO NOTHING"
    );
    assert_eq!(
      insert_sql(Table::TrackPrices, &["track_id", "trackprice", "checked_at"]),
      "INSERT INTO track_prices (track_id, trackprice, checked_at) VALUES (?1, ?2, ?3)"
    );
  }
}
