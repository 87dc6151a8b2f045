//! Cell values of a [`Frame`](crate::Frame).
//!
//! Raw CSV data arrives as text; the transform stages progressively replace
//! text cells with typed ones. `Null` is the only representation of a missing
//! value once the blank pre-pass has run.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
  #[default]
  Null,
  Text(String),
  Int(i64),
  Float(f64),
  Bool(bool),
  Date(NaiveDate),
}

impl Value {
  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

  /// Short name of the variant, used in error messages and reports.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Null => "null",
      Self::Text(_) => "text",
      Self::Int(_) => "int",
      Self::Float(_) => "float",
      Self::Bool(_) => "bool",
      Self::Date(_) => "date",
    }
  }

  /// Numeric view of the cell. Integers widen to `f64`; text is not parsed.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Self::Int(i) => Some(*i as f64),
      Self::Float(f) => Some(*f),
      _ => None,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Null => Ok(()),
      Self::Text(s) => f.write_str(s),
      Self::Int(i) => write!(f, "{i}"),
      Self::Float(x) => write!(f, "{x}"),
      Self::Bool(b) => write!(f, "{b}"),
      Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
    }
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<i64> for Value {
  fn from(i: i64) -> Self { Self::Int(i) }
}

impl From<f64> for Value {
  fn from(x: f64) -> Self { Self::Float(x) }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<NaiveDate> for Value {
  fn from(d: NaiveDate) -> Self { Self::Date(d) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn option_none_is_null() {
    let v: Value = Option::<i64>::None.into();
    assert!(v.is_null());
    let v: Value = Some(3_i64).into();
    assert_eq!(v, Value::Int(3));
  }

  #[test]
  fn int_widens_to_f64() {
    assert_eq!(Value::Int(4).as_f64(), Some(4.0));
    assert_eq!(Value::Text("4".into()).as_f64(), None);
  }

  #[test]
  fn tagged_json_keeps_cell_type() {
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let cells = vec![Value::Null, Value::Date(date), Value::Text("2024-05-01".into())];
    let json = serde_json::to_string(&cells).unwrap();
    let back: Vec<Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cells);
  }

  #[test]
  fn display_formats_dates_as_iso() {
    let date = NaiveDate::from_ymd_opt(2005, 3, 1).unwrap();
    assert_eq!(Value::Date(date).to_string(), "2005-03-01");
    assert_eq!(Value::Null.to_string(), "");
  }
}
