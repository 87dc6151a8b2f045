//! Price repair and imputation.
//!
//! Order matters: sentinels are nulled first, the mean is taken over what is
//! left, and only then are nulls filled. A sentinel can therefore never pull
//! the mean down.

use tunecat_core::{Frame, Value};

use crate::report::describe;

/// The API's "no price" marker.
const PRICE_SENTINEL: f64 = -1.0;

/// Round to two decimals, ties to even (`0.125` → `0.12`).
pub fn round_cents(x: f64) -> f64 { (x * 100.0).round_ties_even() / 100.0 }

/// Interpret a price cell as a number. Text must parse as a plain decimal;
/// a comma is not a decimal separator here, so `"1,234"` is `None`.
fn parse_price(value: &Value) -> Option<f64> {
  let n = match value {
    Value::Int(i) => *i as f64,
    Value::Float(x) => *x,
    Value::Text(s) => s.trim().parse::<f64>().ok()?,
    _ => return None,
  };
  n.is_finite().then_some(n)
}

/// Interpret a price cell: numeric text or numbers are kept, the `-1`
/// sentinel (as text or as a number) and anything unparsable are `None`.
fn usable_price(value: &Value) -> Option<f64> {
  parse_price(value).filter(|&p| p != PRICE_SENTINEL)
}

/// Normalize one price column in place and return the imputed mean (rounded).
///
/// Returns `None` and leaves the nulls in place when the column has no usable
/// value to average, or when the column does not exist.
pub fn normalize_price_column(frame: &mut Frame, column: &str) -> Option<f64> {
  let Some(idx) = frame.column_index(column) else {
    tracing::warn!(column, "price column not present; skipped");
    return None;
  };

  let prices: Vec<Option<f64>> = frame.column_values(idx).map(usable_price).collect();
  let known: Vec<f64> = prices.iter().flatten().copied().collect();
  let mean = (!known.is_empty()).then(|| known.iter().sum::<f64>() / known.len() as f64);

  if mean.is_none() {
    tracing::warn!(column, "no usable prices; nulls left unfilled");
  }

  let mut filled = 0usize;
  let mut prices = prices.into_iter();
  frame.map_column(idx, |cell| {
    let price = prices.next().flatten();
    if price.is_none() && mean.is_some() {
      filled += 1;
    }
    *cell = Value::from(price.or(mean).map(round_cents));
  });

  if let Some(m) = mean {
    tracing::info!(column, mean = round_cents(m), filled, "prices imputed");
  }
  if let Some(s) = describe(frame.column_values(idx).filter_map(Value::as_f64)) {
    tracing::info!(column, "{s}");
  }

  mean.map(round_cents)
}

/// Normalize every listed price column independently.
pub fn normalize_prices<S: AsRef<str>>(mut frame: Frame, columns: &[S]) -> Frame {
  for column in columns {
    normalize_price_column(&mut frame, column.as_ref());
  }
  frame
}

#[cfg(test)]
mod tests {
  use super::*;

  fn prices(frame: &Frame, col: usize) -> Vec<Value> {
    frame.column_values(col).cloned().collect()
  }

  #[test]
  fn sentinel_and_null_are_imputed_with_clean_mean() {
    let mut f = Frame::from_rows(
      ["trackPrice"],
      vec![
        vec![Value::Float(9.99)],
        vec![Value::Float(-1.0)],
        vec![Value::Null],
        vec![Value::Float(4.99)],
      ],
    )
    .unwrap();

    let mean = normalize_price_column(&mut f, "trackPrice");
    assert_eq!(mean, Some(7.49));
    assert_eq!(prices(&f, 0), vec![
      Value::Float(9.99),
      Value::Float(7.49),
      Value::Float(7.49),
      Value::Float(4.99),
    ]);
  }

  #[test]
  fn text_and_float_sentinels_both_match() {
    let mut f = Frame::from_rows(
      ["collectionPrice"],
      vec![
        vec!["-1".into()],
        vec![Value::Float(-1.0)],
        vec!["-1.00".into()],
        vec!["10".into()],
        vec!["nan".into()],
        vec!["".into()],
      ],
    )
    .unwrap();

    normalize_price_column(&mut f, "collectionPrice");
    assert!(prices(&f, 0).iter().all(|p| *p == Value::Float(10.0)));
  }

  #[test]
  fn columns_are_imputed_independently() {
    let f = Frame::from_rows(
      ["trackPrice", "collectionPrice"],
      vec![
        vec![Value::Float(1.0), Value::Null],
        vec![Value::Null, Value::Float(20.0)],
        vec![Value::Float(2.0), Value::Float(10.0)],
      ],
    )
    .unwrap();

    let out = normalize_prices(f, &["trackPrice", "collectionPrice"]);
    assert_eq!(out.cell(1, 0), &Value::Float(1.5));
    assert_eq!(out.cell(0, 1), &Value::Float(15.0));
  }

  #[test]
  fn values_are_rounded_to_cents() {
    let mut f = Frame::from_rows(
      ["trackPrice"],
      vec![vec![Value::Float(0.999)], vec!["2.001".into()]],
    )
    .unwrap();
    normalize_price_column(&mut f, "trackPrice");
    assert_eq!(prices(&f, 0), vec![Value::Float(1.0), Value::Float(2.0)]);
  }

  #[test]
  fn decimal_comma_is_not_a_price() {
    let mut f = Frame::from_rows(
      ["trackPrice"],
      vec![
        vec!["1,234".into()],
        vec![Value::Float(2.0)],
        vec!["4.0".into()],
      ],
    )
    .unwrap();
    assert_eq!(normalize_price_column(&mut f, "trackPrice"), Some(3.0));
    assert_eq!(prices(&f, 0), vec![
      Value::Float(3.0),
      Value::Float(2.0),
      Value::Float(4.0),
    ]);
  }

  #[test]
  fn cents_round_half_to_even() {
    assert_eq!(round_cents(0.125), 0.12);
    assert_eq!(round_cents(0.375), 0.38);
    assert_eq!(round_cents(-0.125), -0.12);
    assert_eq!(round_cents(7.49), 7.49);
  }

  #[test]
  fn all_missing_column_keeps_nulls() {
    let mut f = Frame::from_rows(
      ["trackPrice"],
      vec![vec![Value::Null], vec![Value::Float(-1.0)]],
    )
    .unwrap();
    assert_eq!(normalize_price_column(&mut f, "trackPrice"), None);
    assert!(prices(&f, 0).iter().all(Value::is_null));
  }
}
