//! Surrogate key assignment.

use tunecat_core::{Frame, Value};

/// Overwrite `column` with `start, start + 1, …, start + n - 1` in current row
/// order, creating the column if needed. Previous contents are ignored.
pub fn assign_surrogate_key(mut frame: Frame, column: &str, start: i64) -> Frame {
  let idx = frame.ensure_column(column);
  let mut next = start;
  frame.map_column(idx, |cell| {
    *cell = Value::Int(next);
    next += 1;
  });
  tracing::debug!(column, start, end = next, "surrogate keys assigned");
  frame
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keys_are_contiguous_from_start() {
    let f = Frame::from_rows(
      ["collectionArtistId"],
      vec![
        vec![Value::Null],
        vec![Value::Int(99)],
        vec!["junk".into()],
        vec![Value::Int(99)],
      ],
    )
    .unwrap();

    let out = assign_surrogate_key(f, "collectionArtistId", 5);
    let keys: Vec<_> = out.column_values(0).cloned().collect();
    assert_eq!(keys, vec![
      Value::Int(5),
      Value::Int(6),
      Value::Int(7),
      Value::Int(8)
    ]);
  }

  #[test]
  fn missing_column_is_created() {
    let f = Frame::from_rows(["a"], vec![vec![Value::Null], vec![Value::Null]]).unwrap();
    let out = assign_surrogate_key(f, "seq", 1);
    assert_eq!(out.columns(), ["a", "seq"]);
    assert_eq!(out.cell(1, 1), &Value::Int(2));
  }

  #[test]
  fn empty_frame_gets_no_keys() {
    let out = assign_surrogate_key(Frame::new(["id"]), "id", 1);
    assert!(out.is_empty());
  }
}
