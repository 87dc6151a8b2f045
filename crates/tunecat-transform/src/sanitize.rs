//! Free-text sanitizer.
//!
//! Pipeline per cell:
//!   raw value
//!     └─ reject rules (null, corruption marker, numeric artifact,
//!        day-month fragment, symbols only)  → ""
//!          └─ NFKD + ASCII fold → character filter → whitespace collapse
//!               └─ length check (< 2 chars → "")
//!
//! The empty string is the "not usable" sentinel. Rows whose text cells are
//! all the sentinel are dropped afterwards.

use std::sync::LazyLock;

use regex::Regex;
use tunecat_core::{Frame, Value};
use unicode_normalization::UnicodeNormalization;

/// Substrings left behind by spreadsheet errors such as `#¿NOMBRE?` or
/// `#¡VALOR!`. Matched case-insensitively.
const CORRUPTION_MARKERS: &[&str] = &["¿", "¡", "nombre", "valor"];

static NUMERIC_ARTIFACT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\.*\s*\d+(\.\d+)?\s*\.*$").unwrap());

static DAY_MONTH_FRAGMENT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d{1,2}-[a-zA-Z]{3}$").unwrap());

static SYMBOLS_ONLY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[^\w]*$").unwrap());

static DISALLOWED_CHARS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[^\w\s.,'&!?-]").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\s+").unwrap());

// ─── Cells ───────────────────────────────────────────────────────────────────

/// Clean one text value. Returns `""` when nothing usable is left.
pub fn clean_text(raw: &str) -> String {
  let val = raw.trim();

  let lowered = val.to_lowercase();
  if CORRUPTION_MARKERS.iter().any(|m| lowered.contains(m)) {
    return String::new();
  }
  if NUMERIC_ARTIFACT.is_match(val)
    || DAY_MONTH_FRAGMENT.is_match(val)
    || SYMBOLS_ONLY.is_match(val)
  {
    return String::new();
  }

  let folded: String = val.nfkd().filter(char::is_ascii).collect();
  let filtered = DISALLOWED_CHARS.replace_all(&folded, "");
  let collapsed = WHITESPACE_RUN.replace_all(&filtered, " ");
  let cleaned = collapsed.trim();

  if cleaned.chars().count() < 2 {
    return String::new();
  }
  cleaned.to_owned()
}

/// Clean one cell of a text column. Null becomes the empty sentinel; a
/// non-text cell is cleaned through its display form.
pub fn clean_cell(value: &Value) -> Value {
  match value {
    Value::Null => Value::Text(String::new()),
    Value::Text(s) => Value::Text(clean_text(s)),
    other => Value::Text(clean_text(&other.to_string())),
  }
}

// ─── Frames ──────────────────────────────────────────────────────────────────

/// Clean every listed text column of `frame` and drop the rows whose listed
/// text cells all came out empty.
///
/// Listed columns absent from the frame are skipped. Other columns are left
/// untouched. If none of the listed columns exist, no row is dropped.
pub fn sanitize_text<S: AsRef<str>>(mut frame: Frame, text_columns: &[S]) -> Frame {
  let indices: Vec<usize> = text_columns
    .iter()
    .filter_map(|c| {
      let idx = frame.column_index(c.as_ref());
      if idx.is_none() {
        tracing::debug!(column = c.as_ref(), "text column not present; skipped");
      }
      idx
    })
    .collect();

  for &idx in &indices {
    frame.map_column(idx, |cell| *cell = clean_cell(cell));
  }

  if indices.is_empty() {
    return frame;
  }

  let before = frame.len();
  frame.retain_rows(|row| {
    !indices
      .iter()
      .all(|&i| matches!(&row[i], Value::Text(s) if s.is_empty()))
  });
  let dropped = before - frame.len();
  if dropped > 0 {
    tracing::info!(dropped, "dropped rows with no usable text");
  }

  frame
}

#[cfg(test)]
mod tests {
  use super::*;

  // ── Reject rules ──────────────────────────────────────────────────────────

  #[test]
  fn corruption_markers_are_emptied() {
    for raw in ["#¿NOMBRE?", "#¡VALOR!", "¿?", "Mi Nombre", "VALOR total", "hola¡"] {
      assert_eq!(clean_text(raw), "", "{raw:?}");
    }
  }

  #[test]
  fn numeric_artifacts_are_emptied() {
    for raw in ["123", "3235", "111.0", "... 3235 ...", " 42 ", ".7."] {
      assert_eq!(clean_text(raw), "", "{raw:?}");
    }
  }

  #[test]
  fn day_month_fragments_are_emptied() {
    for raw in ["09-may", "10-abr", "1-Jan"] {
      assert_eq!(clean_text(raw), "", "{raw:?}");
    }
    // Not a whole-cell match.
    assert_eq!(clean_text("09-may mix"), "09-may mix");
  }

  #[test]
  fn symbol_only_cells_are_emptied() {
    for raw in ["", "   ", "?", "!", "---", "¿¿"] {
      assert_eq!(clean_text(raw), "", "{raw:?}");
    }
  }

  // ── Normalization ─────────────────────────────────────────────────────────

  #[test]
  fn accents_are_folded_and_case_kept() {
    assert_eq!(clean_text("Beyoncé"), "Beyonce");
    assert_eq!(clean_text("  Sigur Rós  "), "Sigur Ros");
    assert_eq!(clean_text("MÖTLEY CRÜE"), "MOTLEY CRUE");
  }

  #[test]
  fn disallowed_characters_are_stripped() {
    assert_eq!(clean_text("AC/DC"), "ACDC");
    assert_eq!(clean_text("Rock & Roll!"), "Rock & Roll!");
    assert_eq!(clean_text("Don't Stop (Live)"), "Don't Stop Live");
    assert_eq!(clean_text("Hip-Hop/Rap"), "Hip-HopRap");
  }

  #[test]
  fn whitespace_is_collapsed() {
    assert_eq!(clean_text("a   b\t\tc"), "a b c");
  }

  #[test]
  fn short_results_are_emptied() {
    assert_eq!(clean_text("A"), "");
    assert_eq!(clean_text("é"), "");
    // Non-Latin script folds away entirely.
    assert_eq!(clean_text("東京"), "");
    assert_eq!(clean_text("Go"), "Go");
  }

  #[test]
  fn null_cell_becomes_sentinel() {
    assert_eq!(clean_cell(&Value::Null), Value::Text(String::new()));
  }

  // ── Row filter ────────────────────────────────────────────────────────────

  fn raw_frame() -> Frame {
    Frame::from_rows(
      ["trackName", "artistName", "trackPrice"],
      vec![
        vec!["Song".into(), "#¿NOMBRE?".into(), "1.29".into()],
        vec!["123".into(), Value::Null, "0.99".into()],
        vec!["09-may".into(), "Beyoncé".into(), "-1".into()],
      ],
    )
    .unwrap()
  }

  #[test]
  fn rows_with_no_usable_text_are_dropped() {
    let out = sanitize_text(raw_frame(), &["trackName", "artistName"]);
    assert_eq!(out.len(), 2);

    assert_eq!(out.cell(0, 0), &Value::Text("Song".into()));
    assert_eq!(out.cell(0, 1), &Value::Text(String::new()));
    assert_eq!(out.cell(1, 0), &Value::Text(String::new()));
    assert_eq!(out.cell(1, 1), &Value::Text("Beyonce".into()));
  }

  #[test]
  fn non_text_columns_are_untouched() {
    let out = sanitize_text(raw_frame(), &["trackName", "artistName"]);
    assert_eq!(out.cell(0, 2), &Value::Text("1.29".into()));
    assert_eq!(out.cell(1, 2), &Value::Text("-1".into()));
  }

  #[test]
  fn missing_text_columns_are_skipped() {
    let out = sanitize_text(raw_frame(), &["nope"]);
    assert_eq!(out.len(), 3);
    assert_eq!(out.cell(1, 0), &Value::Text("123".into()));
  }
}
