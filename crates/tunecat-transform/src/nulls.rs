//! Row- and column-level handling of missing values: the required-field
//! filter and the placeholder fill for descriptive text columns.

use tunecat_core::{Frame, Value};

use crate::Result;

/// Drop every row with a `Null` in any of `required`.
///
/// Unlike the coercers, a required column that does not exist is an error: a
/// silently skipped requirement would let incomplete rows through.
pub fn drop_incomplete_rows<S: AsRef<str>>(
  mut frame: Frame,
  required: &[S],
) -> Result<Frame> {
  let indices = required
    .iter()
    .map(|c| frame.require(c.as_ref()))
    .collect::<tunecat_core::Result<Vec<_>>>()?;

  let before = frame.len();
  frame.retain_rows(|row| indices.iter().all(|&i| !row[i].is_null()));
  let dropped = before - frame.len();
  if dropped > 0 {
    tracing::info!(dropped, "dropped rows missing a required field");
  }
  Ok(frame)
}

/// Replace `Null` in the listed columns with `placeholder`. Absent columns
/// are skipped.
pub fn fill_missing_text<S: AsRef<str>>(
  mut frame: Frame,
  columns: &[S],
  placeholder: &str,
) -> Frame {
  for name in columns {
    let Some(idx) = frame.column_index(name.as_ref()) else {
      continue;
    };
    frame.map_column(idx, |cell| {
      if cell.is_null() {
        *cell = Value::Text(placeholder.to_owned());
      }
    });
  }
  frame
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn frame() -> Frame {
    Frame::from_rows(
      ["collectionId", "trackName"],
      vec![
        vec![Value::Int(1), Value::Null],
        vec![Value::Null, "Song".into()],
        vec![Value::Int(3), "Other".into()],
      ],
    )
    .unwrap()
  }

  #[test]
  fn rows_missing_required_fields_are_dropped() {
    let out = drop_incomplete_rows(frame(), &["collectionId"]).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out.cell(0, 0), &Value::Int(1));
    assert_eq!(out.cell(1, 0), &Value::Int(3));
  }

  #[test]
  fn missing_required_column_is_an_error() {
    let err = drop_incomplete_rows(frame(), &["releaseDate"]).unwrap_err();
    assert!(matches!(
      err,
      Error::Core(tunecat_core::Error::MissingColumn(c)) if c == "releaseDate"
    ));
  }

  #[test]
  fn nulls_in_text_columns_get_placeholder() {
    let out = fill_missing_text(frame(), &["trackName", "absent"], "Sin identificar");
    assert_eq!(out.cell(0, 1), &Value::Text("Sin identificar".into()));
    assert_eq!(out.cell(1, 1), &Value::Text("Song".into()));
    // Other columns keep their nulls.
    assert!(out.cell(1, 0).is_null());
  }
}
