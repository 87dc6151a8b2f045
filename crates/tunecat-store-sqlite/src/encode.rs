//! Conversions between catalog cells and SQLite values.

use chrono::NaiveDate;
use rusqlite::types::Value as SqlValue;
use tunecat_core::{Value, catalog::Genre};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Cells ───────────────────────────────────────────────────────────────────

pub fn encode_value(v: Value) -> SqlValue {
  match v {
    Value::Null => SqlValue::Null,
    Value::Text(s) => SqlValue::Text(s),
    Value::Int(i) => SqlValue::Integer(i),
    Value::Float(x) => SqlValue::Real(x),
    Value::Bool(b) => SqlValue::Integer(i64::from(b)),
    Value::Date(d) => SqlValue::Text(encode_date(d)),
  }
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `genre` row exactly as read from SQLite.
pub struct RawGenre {
  pub genre_id:         i64,
  pub primarygenrename: String,
}

impl RawGenre {
  pub fn into_genre(self) -> Genre {
    Genre {
      genre_id:         self.genre_id,
      primarygenrename: self.primarygenrename,
    }
  }
}
