//! Type coercion of loosely typed text columns.
//!
//! Every coercion is null-preserving: a cell that cannot be interpreted
//! becomes `Null`; it never becomes zero, `false`, or an error.

use chrono::NaiveDate;
use tunecat_core::{Frame, Value};

/// Date formats accepted after the time-of-day part has been cut off.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse the date portion of a timestamp-like string (`2005-03-01T08:00:00Z`
/// or `2005-03-01 08:00:00` → `2005-03-01`). Returns `None` when unparsable.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  let date_part = raw
    .trim()
    .split(|c: char| c == 'T' || c.is_whitespace())
    .next()
    .unwrap_or_default();
  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn coerce_date(value: &Value) -> Value {
  match value {
    Value::Date(d) => Value::Date(*d),
    Value::Text(s) => parse_date(s).map_or(Value::Null, Value::Date),
    _ => Value::Null,
  }
}

/// Convert the listed columns to calendar dates. Absent columns are skipped.
pub fn parse_date_columns<S: AsRef<str>>(mut frame: Frame, columns: &[S]) -> Frame {
  for name in columns {
    let Some(idx) = frame.column_index(name.as_ref()) else {
      tracing::debug!(column = name.as_ref(), "date column not present; skipped");
      continue;
    };
    frame.map_column(idx, |cell| *cell = coerce_date(cell));
  }
  frame
}

// ─── Numbers ─────────────────────────────────────────────────────────────────

/// Interpret a cell as a number. Text is parsed after replacing a decimal
/// comma with a point; anything unparsable or non-finite is `None`.
pub fn parse_number(value: &Value) -> Option<f64> {
  let n = match value {
    Value::Int(i) => *i as f64,
    Value::Float(x) => *x,
    Value::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
    _ => return None,
  };
  n.is_finite().then_some(n)
}

/// 2^63: the first magnitude a truncated float can no longer fit in `i64`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Truncate toward zero; `None` outside the `i64` range.
fn truncate_to_i64(n: f64) -> Option<i64> {
  let t = n.trunc();
  (-I64_LIMIT..I64_LIMIT).contains(&t).then_some(t as i64)
}

fn coerce_integer(value: &Value) -> Value {
  match value {
    Value::Int(i) => Value::Int(*i),
    other => Value::from(parse_number(other).and_then(truncate_to_i64)),
  }
}

/// Convert the listed columns to nullable integers, truncating toward zero
/// (`12.9` → `12`, `-3.2` → `-3`). Absent columns are skipped.
pub fn truncate_integer_columns<S: AsRef<str>>(
  mut frame: Frame,
  columns: &[S],
) -> Frame {
  for name in columns {
    let Some(idx) = frame.column_index(name.as_ref()) else {
      tracing::debug!(column = name.as_ref(), "integer column not present; skipped");
      continue;
    };
    frame.map_column(idx, |cell| *cell = coerce_integer(cell));
  }
  frame
}

// ─── Blank pre-pass ──────────────────────────────────────────────────────────

/// Whether a text value is one of the "empty-ish" sentinels: empty,
/// whitespace only, or a textual `nan`.
pub fn is_blank(s: &str) -> bool {
  let t = s.trim();
  t.is_empty() || t.eq_ignore_ascii_case("nan")
}

/// Replace every blank text cell with `Null`, in every column of the frame.
///
/// Table-wide: afterwards every text cell is either meaningful or `Null`.
/// The boolean coercion, the required-field filter and the text fill all
/// rely on that.
pub fn blank_to_null(mut frame: Frame) -> Frame {
  let mut replaced = 0usize;
  frame.map_cells(|cell| {
    if matches!(cell, Value::Text(s) if is_blank(s)) {
      *cell = Value::Null;
      replaced += 1;
    }
  });
  tracing::debug!(replaced, "blank text cells replaced with null");
  frame
}

// ─── Booleans ────────────────────────────────────────────────────────────────

/// `"true"` / `"false"` in any case (surrounding whitespace ignored); anything
/// else is `None`.
pub fn parse_bool(value: &Value) -> Option<bool> {
  match value {
    Value::Bool(b) => Some(*b),
    Value::Text(s) => {
      let t = s.trim();
      if t.eq_ignore_ascii_case("true") {
        Some(true)
      } else if t.eq_ignore_ascii_case("false") {
        Some(false)
      } else {
        None
      }
    }
    _ => None,
  }
}

/// Convert one column to nullable booleans. An absent column is skipped.
///
/// Run [`blank_to_null`] first; this function only touches `column`.
pub fn coerce_boolean_column(mut frame: Frame, column: &str) -> Frame {
  let Some(idx) = frame.column_index(column) else {
    tracing::debug!(column, "boolean column not present; skipped");
    return frame;
  };
  frame.map_column(idx, |cell| *cell = Value::from(parse_bool(cell)));
  frame
}
