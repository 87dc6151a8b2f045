//! Daily extraction run.
//!
//! ```text
//! term log ──► pending terms (first N unused)
//!                 └─ for each term: search ─► records (+ checked_at)
//!                                     └─ term recorded only if it had results
//! all records ──► <raw_dir>/<prefix><today>.csv (appended to an earlier
//!                  run of the same day)
//! ```

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tunecat_core::{Frame, Value};

use crate::{
  Result,
  client::{Record, SearchConfig, TermSearch},
  raw::{raw_file_name, read_csv, write_csv},
  terms::TermLog,
};

/// Column added to every scraped record: the UTC day of the observation.
pub const CHECKED_AT: &str = "checked_at";

/// The `[extract]` section of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
  pub api_url:          String,
  pub terms_log:        PathBuf,
  pub terms_per_day:    usize,
  pub limit:            u32,
  pub country:          String,
  pub media:            String,
  pub request_delay_ms: u64,
}

impl Default for ExtractConfig {
  fn default() -> Self {
    Self {
      api_url:          "https://itunes.apple.com/search".to_owned(),
      terms_log:        PathBuf::from("data/terms_used.txt"),
      terms_per_day:    97,
      limit:            200,
      country:          "US".to_owned(),
      media:            "music".to_owned(),
      request_delay_ms: 1000,
    }
  }
}

impl ExtractConfig {
  pub fn search_config(&self) -> SearchConfig {
    SearchConfig {
      api_url: self.api_url.clone(),
      limit:   self.limit,
      country: self.country.clone(),
      media:   self.media.clone(),
    }
  }
}

/// What one run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeOutcome {
  pub terms_tried:        usize,
  pub terms_with_results: usize,
  pub records:            usize,
  /// The CSV written, if any record came back.
  pub file:               Option<PathBuf>,
}

/// Render a JSON field as a raw text cell.
fn json_cell(value: &serde_json::Value) -> Value {
  match value {
    serde_json::Value::Null => Value::Null,
    serde_json::Value::String(s) => Value::Text(s.clone()),
    serde_json::Value::Bool(b) => Value::Text(b.to_string()),
    serde_json::Value::Number(n) => Value::Text(n.to_string()),
    other => Value::Text(other.to_string()),
  }
}

/// Tabulate search records: one column per key in first-seen order, then
/// [`CHECKED_AT`]. Keys missing from a record are `Null`.
pub fn records_to_frame(records: &[Record], checked_at: NaiveDate) -> Frame {
  let mut frame = Frame::default();
  for record in records {
    let indices: Vec<(usize, &serde_json::Value)> = record
      .iter()
      .filter(|(k, _)| k.as_str() != CHECKED_AT)
      .map(|(k, v)| (frame.ensure_column(k), v))
      .collect();
    let checked = frame.ensure_column(CHECKED_AT);

    let mut row = vec![Value::Null; frame.columns().len()];
    for (idx, v) in indices {
      row[idx] = json_cell(v);
    }
    row[checked] = Value::Date(checked_at);
    // Width matches the column list by construction.
    if let Err(e) = frame.push_row(row) {
      tracing::error!(error = %e, "record skipped");
    }
  }

  checked_at_last(frame)
}

/// Move [`CHECKED_AT`] to the last column, even if a later record introduced
/// new keys.
fn checked_at_last(frame: Frame) -> Frame {
  match frame.column_index(CHECKED_AT) {
    Some(idx) if idx + 1 != frame.columns().len() => {
      let mut reordered = Frame::new(
        frame
          .columns()
          .iter()
          .filter(|c| c.as_str() != CHECKED_AT)
          .map(String::as_str)
          .chain([CHECKED_AT]),
      );
      reordered.concat(frame);
      reordered
    }
    _ => frame,
  }
}

/// Run one daily scrape: search every pending term, record the productive
/// ones, and write everything found to a dated CSV under `raw_dir`.
pub async fn run_scrape<S: TermSearch>(
  search: &S,
  config: &ExtractConfig,
  raw_dir: &Path,
  prefix: &str,
  today: NaiveDate,
) -> Result<ScrapeOutcome> {
  let log = TermLog::new(&config.terms_log);
  let pending = log.pending(config.terms_per_day)?;
  if pending.is_empty() {
    tracing::info!(log = %log.path().display(), "every search term has been used");
    return Ok(ScrapeOutcome::default());
  }

  let delay = Duration::from_millis(config.request_delay_ms);
  let mut outcome = ScrapeOutcome::default();
  let mut records: Vec<Record> = Vec::new();

  for (i, term) in pending.iter().enumerate() {
    if i > 0 && !delay.is_zero() {
      tokio::time::sleep(delay).await;
    }
    outcome.terms_tried += 1;

    let term = term.as_str();
    match search.search(term).await {
      Ok(found) if !found.is_empty() => {
        tracing::info!(term, results = found.len(), "search ok");
        outcome.terms_with_results += 1;
        records.extend(found);
        log.record(term)?;
      }
      Ok(_) => tracing::warn!(term, "no results"),
      Err(e) => tracing::warn!(term, error = %e, "search failed; term skipped"),
    }
  }

  if records.is_empty() {
    tracing::warn!(terms = outcome.terms_tried, "no records to write");
    return Ok(outcome);
  }

  let frame = records_to_frame(&records, today);
  let found = frame.len();
  let path = raw_dir.join(raw_file_name(prefix, today));

  // Terms of an earlier run today are already logged; keep their records.
  let mut day_file = if path.is_file() {
    let earlier = read_csv(&path)?;
    tracing::info!(records = earlier.len(), file = %path.display(), "appending to today's file");
    earlier
  } else {
    Frame::default()
  };
  day_file.concat(frame);
  let day_file = checked_at_last(day_file);

  write_csv(&day_file, &path)?;
  tracing::info!(
    records = found,
    total = day_file.len(),
    file = %path.display(),
    "raw records saved"
  );

  outcome.records = found;
  outcome.file = Some(path);
  Ok(outcome)
}

#[cfg(test)]
mod tests {
  use std::{collections::HashMap, future::Future};

  use serde_json::json;

  use super::*;
  use crate::Error;

  fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
  }

  /// Canned answers per term; unknown terms fail like a non-200 response.
  struct StubSearch {
    answers: HashMap<&'static str, Vec<Record>>,
  }

  impl TermSearch for StubSearch {
    fn search(&self, term: &str) -> impl Future<Output = Result<Vec<Record>>> + Send {
      let answer = self.answers.get(term).cloned().ok_or_else(|| Error::Status {
        term:   term.to_owned(),
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
      });
      async move { answer }
    }
  }

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() }

  #[test]
  fn columns_are_the_union_of_keys() {
    let records = [
      record(json!({ "isStreamable": true, "trackId": 1, "trackName": "Song" })),
      record(json!({ "collectionPrice": 9.99, "trackId": 2, "trackName": null })),
    ];
    let frame = records_to_frame(&records, day());
    assert_eq!(frame.columns(), [
      "isStreamable",
      "trackId",
      "trackName",
      "collectionPrice",
      "checked_at"
    ]);
    let second = frame.row(1);
    assert!(second.get("isStreamable").unwrap().is_null());
    assert!(second.get("trackName").unwrap().is_null());
    assert_eq!(second.get("collectionPrice").unwrap(), &Value::Text("9.99".into()));
    assert_eq!(second.date("checked_at").unwrap(), Some(day()));
  }

  #[tokio::test]
  async fn run_records_only_productive_terms() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExtractConfig {
      terms_log: dir.path().join("terms.txt"),
      terms_per_day: 3,
      request_delay_ms: 0,
      ..ExtractConfig::default()
    };
    let search = StubSearch {
      answers: HashMap::from([
        ("aa", vec![record(json!({ "trackId": 1 })), record(json!({ "trackId": 2 }))]),
        ("ab", Vec::new()),
      ]),
    };

    let outcome = run_scrape(&search, &config, &dir.path().join("raw"), "itunes_", day())
      .await
      .unwrap();
    assert_eq!(outcome.terms_tried, 3);
    assert_eq!(outcome.terms_with_results, 1);
    assert_eq!(outcome.records, 2);

    let used = TermLog::new(&config.terms_log).used().unwrap();
    assert_eq!(used.len(), 1);
    assert!(used.contains("aa"));

    let file = outcome.file.unwrap();
    assert!(file.ends_with("itunes_2024-05-01.csv"));
    let back = read_csv(&file).unwrap();
    assert_eq!(back.columns(), ["trackId", "checked_at"]);
    assert_eq!(back.len(), 2);
  }

  #[tokio::test]
  async fn same_day_runs_append_to_the_day_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExtractConfig {
      terms_log: dir.path().join("terms.txt"),
      terms_per_day: 2,
      request_delay_ms: 0,
      ..ExtractConfig::default()
    };
    let search = StubSearch {
      answers: HashMap::from([
        ("aa", vec![record(json!({ "trackId": 1 }))]),
        ("ab", vec![record(json!({ "trackId": 2 }))]),
        ("ac", vec![record(json!({ "trackId": 3, "trackName": "Late" }))]),
        ("ad", vec![record(json!({ "trackId": 4 }))]),
      ]),
    };
    let raw_dir = dir.path().join("raw");

    let first = run_scrape(&search, &config, &raw_dir, "itunes_", day()).await.unwrap();
    let second = run_scrape(&search, &config, &raw_dir, "itunes_", day()).await.unwrap();
    assert_eq!(first.records, 2);
    assert_eq!(second.records, 2);
    assert_eq!(first.file, second.file);

    assert_eq!(TermLog::new(&config.terms_log).used().unwrap().len(), 4);

    let back = read_csv(&second.file.unwrap()).unwrap();
    assert_eq!(back.len(), 4);
    assert_eq!(back.columns(), ["trackId", "trackName", "checked_at"]);
    let ids: Vec<String> = back
      .rows()
      .map(|r| r.text("trackId").unwrap().unwrap())
      .collect();
    assert_eq!(ids, ["1", "2", "3", "4"]);
    assert!(back.rows().all(|r| r.text("checked_at").unwrap().as_deref() == Some("2024-05-01")));
  }

  #[tokio::test]
  async fn nothing_written_without_results() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExtractConfig {
      terms_log: dir.path().join("terms.txt"),
      terms_per_day: 2,
      request_delay_ms: 0,
      ..ExtractConfig::default()
    };
    let search = StubSearch { answers: HashMap::new() };

    let outcome = run_scrape(&search, &config, dir.path(), "itunes_", day())
      .await
      .unwrap();
    assert_eq!(outcome.terms_tried, 2);
    assert_eq!(outcome.file, None);
    assert!(!config.terms_log.exists());
  }
}
