//! Descriptive summaries of a frame: per-column null report, numeric and
//! text statistics, and IQR outliers.

use std::{collections::HashMap, fmt};

use serde::Serialize;
use tunecat_core::{Frame, Value};

use crate::{Result, price::round_cents};

// ─── Null report ─────────────────────────────────────────────────────────────

/// Null statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullReport {
  pub column:     String,
  pub nulls:      usize,
  /// Percentage of rows that are null, rounded to two decimals.
  pub null_pct:   f64,
  /// Most common non-null cell kind, or `"null"` for an all-null column.
  pub value_kind: &'static str,
}

/// One [`NullReport`] per column, in column order.
pub fn null_report(frame: &Frame) -> Vec<NullReport> {
  frame
    .columns()
    .iter()
    .enumerate()
    .map(|(idx, name)| {
      let nulls = frame.column_values(idx).filter(|v| v.is_null()).count();
      let null_pct = if frame.is_empty() {
        0.0
      } else {
        round_cents(nulls as f64 / frame.len() as f64 * 100.0)
      };
      NullReport {
        column: name.clone(),
        nulls,
        null_pct,
        value_kind: dominant_kind(frame.column_values(idx)),
      }
    })
    .collect()
}

fn dominant_kind<'a>(values: impl Iterator<Item = &'a Value>) -> &'static str {
  let mut counts: Vec<(&'static str, usize)> = Vec::new();
  for v in values.filter(|v| !v.is_null()) {
    match counts.iter_mut().find(|(k, _)| *k == v.kind()) {
      Some((_, n)) => *n += 1,
      None => counts.push((v.kind(), 1)),
    }
  }
  counts
    .into_iter()
    .fold(None, |best: Option<(&'static str, usize)>, (k, n)| match best {
      Some((_, m)) if m >= n => best,
      _ => Some((k, n)),
    })
    .map_or("null", |(k, _)| k)
}

// ─── Numeric summary ─────────────────────────────────────────────────────────

/// Count, mean, spread and quartiles of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
  pub count:  usize,
  pub mean:   f64,
  /// Sample standard deviation; `None` for fewer than two values.
  pub std:    Option<f64>,
  pub min:    f64,
  pub q25:    f64,
  pub median: f64,
  pub q75:    f64,
  pub max:    f64,
}

impl fmt::Display for Summary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "count={} mean={:.2} std={} min={:.2} 25%={:.2} 50%={:.2} 75%={:.2} max={:.2}",
      self.count,
      self.mean,
      self.std.map_or_else(|| "-".to_owned(), |s| format!("{s:.2}")),
      self.min,
      self.q25,
      self.median,
      self.q75,
      self.max,
    )
  }
}

/// Linear-interpolation quantile over sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
  let pos = q * (sorted.len() - 1) as f64;
  let lo = pos.floor() as usize;
  let hi = pos.ceil() as usize;
  sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Summarize `values`. Returns `None` when there are none.
pub fn describe(values: impl IntoIterator<Item = f64>) -> Option<Summary> {
  let mut sorted: Vec<f64> = values.into_iter().filter(|x| x.is_finite()).collect();
  if sorted.is_empty() {
    return None;
  }
  sorted.sort_by(f64::total_cmp);

  let n = sorted.len();
  let mean = sorted.iter().sum::<f64>() / n as f64;
  let std = (n > 1).then(|| {
    let ss: f64 = sorted.iter().map(|x| (x - mean).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
  });

  Some(Summary {
    count: n,
    mean,
    std,
    min: sorted[0],
    q25: quantile(&sorted, 0.25),
    median: quantile(&sorted, 0.5),
    q75: quantile(&sorted, 0.75),
    max: sorted[n - 1],
  })
}

/// Columns whose non-null cells are all numeric.
fn numeric_columns(frame: &Frame) -> impl Iterator<Item = (usize, &String)> + '_ {
  frame.columns().iter().enumerate().filter(|(idx, _)| {
    frame
      .column_values(*idx)
      .all(|v| v.is_null() || v.as_f64().is_some())
  })
}

/// [`describe`] every column whose non-null cells are all numeric.
pub fn describe_numeric(frame: &Frame) -> Vec<(String, Summary)> {
  numeric_columns(frame)
    .filter_map(|(idx, name)| {
      describe(frame.column_values(idx).filter_map(Value::as_f64))
        .map(|s| (name.clone(), s))
    })
    .collect()
}

// ─── Text summary ────────────────────────────────────────────────────────────

/// Count, distinct values and the most frequent value of a text column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSummary {
  pub count:  usize,
  pub unique: usize,
  /// Most frequent value; ties go to the value seen first.
  pub top:    String,
  pub freq:   usize,
}

impl fmt::Display for TextSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "count={} unique={} top={:?} freq={}",
      self.count, self.unique, self.top, self.freq
    )
  }
}

/// Summarize the text cells of one column. `None` when it has none.
fn describe_column_text<'a>(values: impl Iterator<Item = &'a Value>) -> Option<TextSummary> {
  // value → (first position, occurrences)
  let mut seen: HashMap<&str, (usize, usize)> = HashMap::new();
  let mut count = 0usize;
  for v in values {
    if let Value::Text(s) = v {
      let pos = seen.len();
      seen.entry(s.as_str()).or_insert((pos, 0)).1 += 1;
      count += 1;
    }
  }

  let (top, &(_, freq)) = seen
    .iter()
    .max_by(|(_, (pa, na)), (_, (pb, nb))| na.cmp(nb).then(pb.cmp(pa)))?;
  Some(TextSummary {
    count,
    unique: seen.len(),
    top: (*top).to_owned(),
    freq,
  })
}

/// Summarize every column whose non-null cells are all text.
pub fn describe_text(frame: &Frame) -> Vec<(String, TextSummary)> {
  frame
    .columns()
    .iter()
    .enumerate()
    .filter(|(idx, _)| {
      frame
        .column_values(*idx)
        .all(|v| matches!(v, Value::Null | Value::Text(_)))
    })
    .filter_map(|(idx, name)| {
      describe_column_text(frame.column_values(idx)).map(|s| (name.clone(), s))
    })
    .collect()
}

// ─── Outliers ────────────────────────────────────────────────────────────────

/// Tukey fences `(Q1 - 1.5·IQR, Q3 + 1.5·IQR)` of `values`.
fn iqr_fences(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
  let mut sorted: Vec<f64> = values.into_iter().filter(|x| x.is_finite()).collect();
  if sorted.is_empty() {
    return None;
  }
  sorted.sort_by(f64::total_cmp);
  let q1 = quantile(&sorted, 0.25);
  let q3 = quantile(&sorted, 0.75);
  let iqr = q3 - q1;
  Some((q1 - 1.5 * iqr, q3 + 1.5 * iqr))
}

/// IQR outliers of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
  pub column:      String,
  pub outliers:    usize,
  /// Share of all rows, nulls included, rounded to two decimals.
  pub outlier_pct: f64,
}

/// Count values outside the Tukey fences for every numeric column, sorted by
/// outlier percentage, highest first.
pub fn outlier_summary(frame: &Frame) -> Vec<OutlierReport> {
  let mut reports: Vec<OutlierReport> = numeric_columns(frame)
    .filter_map(|(idx, name)| {
      let (low, high) = iqr_fences(frame.column_values(idx).filter_map(Value::as_f64))?;
      let outliers = frame
        .column_values(idx)
        .filter_map(Value::as_f64)
        .filter(|&x| x < low || x > high)
        .count();
      Some(OutlierReport {
        column: name.clone(),
        outliers,
        outlier_pct: round_cents(outliers as f64 / frame.len() as f64 * 100.0),
      })
    })
    .collect();
  reports.sort_by(|a, b| b.outlier_pct.total_cmp(&a.outlier_pct));
  reports
}

/// A collection priced above the upper Tukey fence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedCollection {
  pub collection_name: String,
  pub artist_name:     String,
  pub mean_price:      f64,
}

/// Rows whose `price_column` lies above `Q3 + 1.5·IQR`, grouped by
/// `(collectionName, artistName)` and ranked by mean price. At most `top_n`
/// groups are returned. Rows with a null name are not grouped.
pub fn top_priced_collections(
  frame: &Frame,
  price_column: &str,
  top_n: usize,
) -> Result<Vec<PricedCollection>> {
  let price = frame.require(price_column)?;
  let collection = frame.require("collectionName")?;
  let artist = frame.require("artistName")?;

  let Some((_, high)) = iqr_fences(frame.column_values(price).filter_map(Value::as_f64))
  else {
    return Ok(Vec::new());
  };

  // (collection, artist) → (sum, n), in first-seen order
  let mut groups: Vec<((String, String), (f64, usize))> = Vec::new();
  for i in 0..frame.len() {
    let Some(p) = frame.cell(i, price).as_f64().filter(|&p| p > high) else {
      continue;
    };
    let (Value::Text(c), Value::Text(a)) = (frame.cell(i, collection), frame.cell(i, artist))
    else {
      continue;
    };
    match groups.iter_mut().find(|((gc, ga), _)| gc == c && ga == a) {
      Some((_, (sum, n))) => {
        *sum += p;
        *n += 1;
      }
      None => groups.push(((c.clone(), a.clone()), (p, 1))),
    }
  }

  let mut ranked: Vec<PricedCollection> = groups
    .into_iter()
    .map(|((collection_name, artist_name), (sum, n))| PricedCollection {
      collection_name,
      artist_name,
      mean_price: sum / n as f64,
    })
    .collect();
  ranked.sort_by(|a, b| b.mean_price.total_cmp(&a.mean_price));
  ranked.truncate(top_n);
  Ok(ranked)
}
