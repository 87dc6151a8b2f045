//! The ordered cleaning stages that turn the raw concatenated frame into the
//! master table.

use serde::{Deserialize, Serialize};
use tunecat_core::Frame;

use crate::{
  Result,
  coerce::{blank_to_null, coerce_boolean_column, parse_date_columns, truncate_integer_columns},
  columns,
  decompose::DecomposeOptions,
  identity::assign_surrogate_key,
  nulls::{drop_incomplete_rows, fill_missing_text},
  price::normalize_prices,
  sanitize::sanitize_text,
};

fn owned(names: &[&str]) -> Vec<String> {
  names.iter().map(|s| (*s).to_owned()).collect()
}

/// Column sets and constants of the cleaning stages. Deserialised from the
/// `[transform]` section of the configuration; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
  pub text_columns:          Vec<String>,
  pub date_columns:          Vec<String>,
  pub integer_columns:       Vec<String>,
  pub boolean_column:        String,
  pub required_columns:      Vec<String>,
  pub fill_text_columns:     Vec<String>,
  pub fill_text_placeholder: String,
  pub price_columns:         Vec<String>,
  pub surrogate_key_column:  String,
  pub surrogate_key_start:   i64,
  pub conflict_policy:       DecomposeOptions,
}

impl Default for TransformConfig {
  fn default() -> Self {
    Self {
      text_columns:          owned(columns::TEXT_COLUMNS),
      date_columns:          owned(columns::DATE_COLUMNS),
      integer_columns:       owned(columns::INTEGER_COLUMNS),
      boolean_column:        columns::BOOLEAN_COLUMN.to_owned(),
      required_columns:      owned(columns::REQUIRED_COLUMNS),
      fill_text_columns:     owned(columns::FILL_TEXT_COLUMNS),
      fill_text_placeholder: columns::FILL_TEXT_PLACEHOLDER.to_owned(),
      price_columns:         owned(columns::PRICE_COLUMNS),
      surrogate_key_column:  columns::SURROGATE_KEY_COLUMN.to_owned(),
      surrogate_key_start:   1,
      conflict_policy:       DecomposeOptions::default(),
    }
  }
}

/// Run every cleaning stage over `raw`:
///
/// ```text
/// sanitize text → dates → integers → blank pre-pass → boolean
///   → required filter → text fill → prices → surrogate key
/// ```
///
/// Fails only when a required column is missing.
pub fn clean_master(raw: Frame, config: &TransformConfig) -> Result<Frame> {
  let input = raw.len();
  tracing::info!(rows = input, columns = raw.columns().len(), "cleaning raw frame");

  let frame = sanitize_text(raw, &config.text_columns);
  tracing::info!(rows = frame.len(), "text sanitized");

  let frame = parse_date_columns(frame, &config.date_columns);
  let frame = truncate_integer_columns(frame, &config.integer_columns);
  let frame = blank_to_null(frame);
  let frame = coerce_boolean_column(frame, &config.boolean_column);

  let frame = drop_incomplete_rows(frame, &config.required_columns)?;
  tracing::info!(rows = frame.len(), "required fields checked");

  let frame = fill_missing_text(
    frame,
    &config.fill_text_columns,
    &config.fill_text_placeholder,
  );
  let frame = normalize_prices(frame, &config.price_columns);
  let frame = assign_surrogate_key(
    frame,
    &config.surrogate_key_column,
    config.surrogate_key_start,
  );

  tracing::info!(input, output = frame.len(), "master table ready");
  Ok(frame)
}
