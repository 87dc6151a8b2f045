//! Raw CSV files: writing one scrape run and reading every run back.
//!
//! Cells are kept as text; typing is the transform's job. An empty CSV field
//! is read as `Null` and a `Null` cell is written as an empty field.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tunecat_core::{Frame, Value};

use crate::{Error, Result};

/// `<prefix><YYYY-MM-DD>.csv`
pub fn raw_file_name(prefix: &str, day: NaiveDate) -> String {
  format!("{prefix}{}.csv", day.format("%Y-%m-%d"))
}

/// Every `<prefix>*.csv` file directly under `dir`, sorted by name. A missing
/// directory has no files.
pub fn raw_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
  let entries = match std::fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
    Err(e) => return Err(Error::io(dir)(e)),
  };

  let mut files = Vec::new();
  for entry in entries {
    let path = entry.map_err(Error::io(dir))?.path();
    let matches = path
      .file_name()
      .and_then(|n| n.to_str())
      .is_some_and(|n| n.starts_with(prefix) && n.ends_with(".csv"));
    if matches && path.is_file() {
      files.push(path);
    }
  }
  files.sort();
  Ok(files)
}

/// Read one CSV file with a header row into a text frame.
pub fn read_csv(path: &Path) -> Result<Frame> {
  let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
  let headers = reader.headers()?.clone();
  let mut frame = Frame::new(headers.iter());

  for record in reader.records() {
    let record = record?;
    let row = (0..headers.len())
      .map(|i| {
        record
          .get(i)
          .filter(|s| !s.is_empty())
          .map_or(Value::Null, Value::from)
      })
      .collect();
    frame.push_row(row)?;
  }
  Ok(frame)
}

/// Concatenate every raw file of `dir` into one frame with the union of their
/// columns.
pub fn read_raw_dir(dir: &Path, prefix: &str) -> Result<Frame> {
  let files = raw_files(dir, prefix)?;
  if files.is_empty() {
    tracing::warn!(dir = %dir.display(), prefix, "no raw files found");
    return Ok(Frame::default());
  }

  let mut frame = Frame::default();
  for path in &files {
    let part = read_csv(path)?;
    tracing::debug!(file = %path.display(), rows = part.len(), "raw file read");
    frame.concat(part);
  }
  tracing::info!(files = files.len(), rows = frame.len(), "raw records loaded");
  Ok(frame)
}

/// Write `frame` as CSV with a header row, creating parent directories.
pub fn write_csv(frame: &Frame, path: &Path) -> Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).map_err(Error::io(parent))?;
  }
  let mut writer = csv::Writer::from_path(path)?;
  writer.write_record(frame.columns())?;
  for row in frame.rows() {
    let cells: Vec<String> = frame
      .columns()
      .iter()
      .map(|c| row.get(c).map(ToString::to_string))
      .collect::<tunecat_core::Result<_>>()?;
    writer.write_record(&cells)?;
  }
  writer.flush().map_err(Error::io(path))?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
  }

  #[test]
  fn files_are_matched_by_prefix_and_sorted() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "itunes_2024-05-02.csv", "a\n1\n");
    write(dir.path(), "itunes_2024-05-01.csv", "a\n1\n");
    write(dir.path(), "other.csv", "a\n1\n");
    write(dir.path(), "itunes_notes.txt", "");

    let files = raw_files(dir.path(), "itunes_").unwrap();
    let names: Vec<_> = files
      .iter()
      .map(|p| p.file_name().unwrap().to_str().unwrap())
      .collect();
    assert_eq!(names, vec!["itunes_2024-05-01.csv", "itunes_2024-05-02.csv"]);
  }

  #[test]
  fn runs_are_concatenated_with_column_union() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "itunes_2024-05-01.csv", "trackId,trackName\n1,Song\n2,\n");
    write(dir.path(), "itunes_2024-05-02.csv", "trackId,isStreamable\n3,true\n");

    let frame = read_raw_dir(dir.path(), "itunes_").unwrap();
    assert_eq!(frame.columns(), ["trackId", "trackName", "isStreamable"]);
    assert_eq!(frame.len(), 3);
    assert!(frame.cell(1, 1).is_null());
    assert!(frame.cell(2, 1).is_null());
    assert_eq!(frame.cell(2, 2), &Value::Text("true".into()));
  }

  #[test]
  fn missing_directory_gives_empty_frame() {
    let dir = tempfile::tempdir().unwrap();
    let frame = read_raw_dir(&dir.path().join("absent"), "itunes_").unwrap();
    assert!(frame.is_empty());
    assert!(frame.columns().is_empty());
  }

  #[test]
  fn written_file_reads_back_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let frame = Frame::from_rows(["trackName", "trackPrice", "checked_at"], vec![vec![
      "Song, Part 1".into(),
      Value::Null,
      Value::Date(day),
    ]])
    .unwrap();

    let path = dir.path().join("raw").join(raw_file_name("itunes_", day));
    write_csv(&frame, &path).unwrap();
    assert!(path.ends_with("itunes_2024-05-01.csv"));

    let back = read_csv(&path).unwrap();
    assert_eq!(back.cell(0, 0), &Value::Text("Song, Part 1".into()));
    assert!(back.cell(0, 1).is_null());
    assert_eq!(back.cell(0, 2), &Value::Text("2024-05-01".into()));
  }
}
