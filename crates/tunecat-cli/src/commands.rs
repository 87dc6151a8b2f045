//! One function per subcommand. Each step reads its inputs from disk and
//! writes its outputs to disk, so steps can be run separately.

use anyhow::{Context as _, Result, bail};
use chrono::Utc;
use tunecat_core::Frame;
use tunecat_io::{
  client::SearchClient,
  raw::read_raw_dir,
  scrape::{ScrapeOutcome, run_scrape},
  snapshot::SnapshotDir,
};
use tunecat_store_sqlite::SqliteStore;
use tunecat_transform::{
  clean_master,
  columns::COLLECTION_PRICE,
  decompose::{Decomposition, decompose_master},
  load::{LoadSummary, load_catalog},
  report::{describe_numeric, describe_text, null_report, outlier_summary, top_priced_collections},
};

use crate::config::PipelineConfig;

// ─── scrape ──────────────────────────────────────────────────────────────────

pub async fn scrape(cfg: &PipelineConfig) -> Result<ScrapeOutcome> {
  let client = SearchClient::new(cfg.extract.search_config())
    .context("failed to build HTTP client")?;
  let today = Utc::now().date_naive();
  run_scrape(&client, &cfg.extract, &cfg.paths.raw_dir, &cfg.paths.raw_prefix, today)
    .await
    .context("scrape failed")
}

// ─── transform ───────────────────────────────────────────────────────────────

/// Raw CSV files → cleaned master → normalized tables, all snapshotted.
pub fn transform(cfg: &PipelineConfig) -> Result<Decomposition> {
  let raw = read_raw_dir(&cfg.paths.raw_dir, &cfg.paths.raw_prefix)
    .context("failed to read raw files")?;
  if raw.is_empty() {
    bail!(
      "no raw records under {} (prefix {:?})",
      cfg.paths.raw_dir.display(),
      cfg.paths.raw_prefix
    );
  }

  let master = clean_master(raw, &cfg.transform).context("cleaning failed")?;
  let snapshots = SnapshotDir::new(&cfg.paths.snapshot_dir);
  snapshots
    .write_master(&master)
    .context("failed to write master snapshot")?;

  let tables = decompose_master(master, &cfg.transform.conflict_policy)
    .context("decomposition failed")?;
  snapshots
    .write_tables(&tables)
    .context("failed to write table snapshots")?;
  Ok(tables)
}

// ─── load ────────────────────────────────────────────────────────────────────

/// Table snapshots → SQLite store.
pub async fn load(cfg: &PipelineConfig) -> Result<LoadSummary> {
  let tables = SnapshotDir::new(&cfg.paths.snapshot_dir)
    .read_tables()
    .context("failed to read table snapshots; run `tunecat transform` first")?;
  load_tables(cfg, tables).await
}

async fn load_tables(cfg: &PipelineConfig, tables: Decomposition) -> Result<LoadSummary> {
  let store_path = &cfg.paths.store_path;
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  load_catalog(&store, tables).await.context("load aborted")
}

// ─── run ─────────────────────────────────────────────────────────────────────

pub async fn run(cfg: &PipelineConfig) -> Result<LoadSummary> {
  let tables = transform(cfg)?;
  load_tables(cfg, tables).await
}

// ─── report ──────────────────────────────────────────────────────────────────

/// Render the null report and numeric statistics of the master snapshot.
pub fn report(cfg: &PipelineConfig) -> Result<String> {
  let master = SnapshotDir::new(&cfg.paths.snapshot_dir)
    .read_master()
    .context("failed to read master snapshot; run `tunecat transform` first")?;
  render_report(&master)
}

/// Collections listed in the price-outlier section.
const TOP_COLLECTIONS: usize = 20;

fn render_report(master: &Frame) -> Result<String> {
  use std::fmt::Write as _;

  let mut out = String::new();
  let _ = writeln!(out, "rows: {}  columns: {}", master.len(), master.columns().len());
  let _ = writeln!(out, "\n{:<28} {:>8} {:>8}  kind", "column", "nulls", "null %");
  for r in null_report(master) {
    let _ = writeln!(
      out,
      "{:<28} {:>8} {:>8.2}  {}",
      r.column, r.nulls, r.null_pct, r.value_kind
    );
  }
  let _ = writeln!(out);
  for (column, summary) in describe_numeric(master) {
    let _ = writeln!(out, "{column}: {summary}");
  }
  let _ = writeln!(out);
  for (column, summary) in describe_text(master) {
    let _ = writeln!(out, "{column}: {summary}");
  }

  let _ = writeln!(out, "\n{:<28} {:>8} {:>8}", "column", "outliers", "%");
  for r in outlier_summary(master) {
    let _ = writeln!(out, "{:<28} {:>8} {:>8.2}", r.column, r.outliers, r.outlier_pct);
  }

  let top = top_priced_collections(master, COLLECTION_PRICE, TOP_COLLECTIONS)
    .context("failed to rank collection price outliers")?;
  let _ = writeln!(out, "\ncollections above the {COLLECTION_PRICE} outlier fence: {}", top.len());
  for c in top {
    let _ = writeln!(
      out,
      "{:>10.2}  {} / {}",
      c.mean_price, c.collection_name, c.artist_name
    );
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use tunecat_core::catalog::Table;

  use super::*;
  use crate::config::PathsConfig;

  const HEADER: &str = "wrapperType,kind,artistId,collectionId,trackId,artistName,\
collectionName,trackName,artistViewUrl,collectionViewUrl,trackViewUrl,collectionPrice,\
trackPrice,releaseDate,collectionExplicitness,trackExplicitness,discCount,discNumber,\
trackCount,trackNumber,trackTimeMillis,country,currency,primaryGenreName,isStreamable,\
collectionCensoredName,contentAdvisoryRating,collectionArtistName,collectionArtistViewUrl,\
collectionArtistId,checked_at";

  fn config(root: &Path) -> PipelineConfig {
    PipelineConfig {
      paths: PathsConfig {
        raw_dir:      root.join("raw"),
        raw_prefix:   "itunes_".to_owned(),
        snapshot_dir: root.join("clean"),
        store_path:   root.join("db").join("tunecat.db"),
      },
      ..PipelineConfig::default()
    }
  }

  fn write_raw(root: &Path, name: &str, rows: &[&str]) {
    let dir = root.join("raw");
    std::fs::create_dir_all(&dir).unwrap();
    let body = std::iter::once(HEADER).chain(rows.iter().copied()).collect::<Vec<_>>();
    std::fs::write(dir.join(name), body.join("\n") + "\n").unwrap();
  }

  fn sample(root: &Path) {
    write_raw(root, "itunes_2024-05-01.csv", &[
      "track,song,1,10,100,Beyoncé,Lemonade,Formation,https://a/1,https://c/10,https://t/100,\
11.99,1.29,2016-04-23T07:00:00Z,notExplicit,notExplicit,1,1,12,1,206000,USA,USD,Pop,true,\
Lemonade,,,,,2024-05-01",
      "track,song,1,10,101,Beyonce,Lemonade,Sorry,https://a/1,https://c/10,https://t/101,\
11.99,-1,2016-04-23T07:00:00Z,notExplicit,explicit,1,1,12,2,232000,USA,USD,Pop,TRUE,\
Lemonade,Explicit,,,,2024-05-01",
      "track,song,2,20,200,Adele,25,Hello,https://a/2,https://c/20,https://t/200,\
10.99,1.29,2015-10-23,notExplicit,notExplicit,1,1,11,1,295000,USA,USD,Pop,true,\
25,,,,,2024-05-01",
    ]);
    write_raw(root, "itunes_2024-05-02.csv", &[
      "track,song,1,10,100,Beyoncé,Lemonade,Formation,https://a/1,https://c/10,https://t/100,\
9.99,0.99,2016-04-23T07:00:00Z,notExplicit,notExplicit,1,1,12,1,206000,USA,USD,Pop,true,\
Lemonade,,,,,2024-05-02",
      ",,3,30,300,#¿NOMBRE?,123,09-may,,,,,,2020-01-01,,,,,,,1000,,,...,true,,,,,,\
2024-05-02",
      "track,song,4,40,400,Muse,Drones,Dead Inside,https://a/4,https://c/40,https://t/400,\
12.99,1.29,2015-06-05,notExplicit,notExplicit,1,1,12,1,,USA,USD,Rock,true,\
Drones,,,,,2024-05-02",
    ]);
  }

  #[tokio::test]
  async fn run_cleans_and_loads_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    sample(dir.path());

    let summary = run(&cfg).await.unwrap();
    assert_eq!(summary.genres, 1);
    assert_eq!(summary.artists, 2);
    assert_eq!(summary.albums, 2);
    assert_eq!(summary.tracks, 3);
    assert_eq!(summary.track_prices, 4);
    assert_eq!(summary.album_prices, 3);

    let store = SqliteStore::open(&cfg.paths.store_path).await.unwrap();
    assert_eq!(store.count(Table::Track).await.unwrap(), 3);
    let history = store.track_price_history(100).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].trackprice, 0.99);
    // The `-1` sentinel was replaced by the mean of the real track prices.
    let sorry = store.track_price_history(101).await.unwrap();
    assert_eq!(sorry[0].trackprice, 1.19);
  }

  #[tokio::test]
  async fn load_reads_the_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    sample(dir.path());

    let tables = transform(&cfg).unwrap();
    assert_eq!(tables.tracks.len(), 3);

    let first = load(&cfg).await.unwrap();
    let second = load(&cfg).await.unwrap();
    assert_eq!(first.tracks, 3);
    assert_eq!(second.tracks, 0);
    assert_eq!(second.track_prices, 4);
  }

  #[test]
  fn transform_without_raw_files_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = transform(&config(dir.path())).unwrap_err();
    assert!(err.to_string().contains("no raw records"));
  }

  #[test]
  fn report_lists_every_column() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    sample(dir.path());
    transform(&cfg).unwrap();

    let text = report(&cfg).unwrap();
    assert!(text.starts_with("rows: 4  columns: 31"));
    assert!(text.contains("trackPrice: count=4"));
    assert!(text.lines().any(|l| l.starts_with("contentAdvisoryRating")));
    assert!(text.contains("country: count=4 unique=1 top=\"USA\" freq=4"));
    assert!(text.contains(&format!("{:<28} {:>8} {:>8.2}", "trackTimeMillis", 0, 0.0)));
    assert!(text.contains("collections above the collectionPrice outlier fence: 0"));
  }
}
