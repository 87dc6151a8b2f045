//! `Frame`: a small, row-major, dynamically typed table.
//!
//! Every pipeline stage consumes a whole `Frame` and produces a whole `Frame`.
//! Columns are addressed by name; rows keep their insertion order, which is
//! the order "first occurrence wins" deduplication relies on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, Value};

// ─── Frame ───────────────────────────────────────────────────────────────────

/// A named-column table of [`Value`] cells.
///
/// Invariant: every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
  columns: Vec<String>,
  rows:    Vec<Vec<Value>>,
}

impl Frame {
  /// An empty frame with the given column names.
  pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
    Self {
      columns: columns.into_iter().map(Into::into).collect(),
      rows:    Vec::new(),
    }
  }

  /// Build a frame from columns and rows, checking every row's width.
  pub fn from_rows<S: Into<String>>(
    columns: impl IntoIterator<Item = S>,
    rows: Vec<Vec<Value>>,
  ) -> Result<Self> {
    let mut frame = Self::new(columns);
    for row in rows {
      frame.push_row(row)?;
    }
    Ok(frame)
  }

  pub fn columns(&self) -> &[String] { &self.columns }

  /// Number of rows.
  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub fn column_index(&self, name: &str) -> Option<usize> {
    self.columns.iter().position(|c| c == name)
  }

  /// Like [`Frame::column_index`] but a missing column is an error.
  pub fn require(&self, name: &str) -> Result<usize> {
    self
      .column_index(name)
      .ok_or_else(|| Error::MissingColumn(name.to_owned()))
  }

  pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
    if row.len() != self.columns.len() {
      return Err(Error::RowLength {
        expected: self.columns.len(),
        found:    row.len(),
      });
    }
    self.rows.push(row);
    Ok(())
  }

  /// Return the index of `name`, appending an all-null column if absent.
  pub fn ensure_column(&mut self, name: &str) -> usize {
    match self.column_index(name) {
      Some(idx) => idx,
      None => {
        self.columns.push(name.to_owned());
        for row in &mut self.rows {
          row.push(Value::Null);
        }
        self.columns.len() - 1
      }
    }
  }

  /// Rename a column. Returns `false` if `from` does not exist.
  pub fn rename(&mut self, from: &str, to: &str) -> bool {
    match self.column_index(from) {
      Some(idx) => {
        self.columns[idx] = to.to_owned();
        true
      }
      None => false,
    }
  }

  pub fn cell(&self, row: usize, col: usize) -> &Value { &self.rows[row][col] }

  pub fn column_values(&self, col: usize) -> impl Iterator<Item = &Value> + '_ {
    self.rows.iter().map(move |r| &r[col])
  }

  /// Apply `f` to every cell of one column.
  pub fn map_column(&mut self, col: usize, mut f: impl FnMut(&mut Value)) {
    for row in &mut self.rows {
      f(&mut row[col]);
    }
  }

  /// Apply `f` to every cell of the frame.
  pub fn map_cells(&mut self, mut f: impl FnMut(&mut Value)) {
    for cell in self.rows.iter_mut().flatten() {
      f(cell);
    }
  }

  /// Keep only the rows for which `keep` returns `true`. Order is preserved.
  pub fn retain_rows(&mut self, mut keep: impl FnMut(&[Value]) -> bool) {
    self.rows.retain(|r| keep(r));
  }

  pub fn row(&self, index: usize) -> Row<'_> { Row { frame: self, index } }

  pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
    (0..self.rows.len()).map(move |index| self.row(index))
  }

  /// Append `other` below `self`, aligning columns by name.
  ///
  /// The result has the union of both column sets (`self`'s columns first,
  /// then new ones in `other`'s order); cells absent on either side are
  /// `Null`.
  pub fn concat(&mut self, other: Frame) {
    let mapping: Vec<usize> = other
      .columns
      .iter()
      .map(|c| self.ensure_column(c))
      .collect();
    let width = self.columns.len();
    for src in other.rows {
      let mut row = vec![Value::Null; width];
      for (value, &dst) in src.into_iter().zip(&mapping) {
        row[dst] = value;
      }
      self.rows.push(row);
    }
  }
}

// ─── Row view ────────────────────────────────────────────────────────────────

/// A borrowed view of one frame row with typed, name-based accessors.
///
/// The typed accessors return `Ok(None)` for `Null` and an
/// [`Error::CellType`] for a cell of the wrong type.
#[derive(Clone, Copy)]
pub struct Row<'a> {
  frame: &'a Frame,
  index: usize,
}

impl<'a> Row<'a> {
  pub fn index(&self) -> usize { self.index }

  pub fn get(&self, column: &str) -> Result<&'a Value> {
    let col = self.frame.require(column)?;
    Ok(self.frame.cell(self.index, col))
  }

  fn mismatch(&self, column: &str, expected: &'static str, found: &Value) -> Error {
    Error::CellType {
      row: self.index,
      column: column.to_owned(),
      expected,
      found: found.kind(),
    }
  }

  pub fn text(&self, column: &str) -> Result<Option<String>> {
    match self.get(column)? {
      Value::Null => Ok(None),
      Value::Text(s) => Ok(Some(s.clone())),
      other => Err(self.mismatch(column, "text", other)),
    }
  }

  pub fn int(&self, column: &str) -> Result<Option<i64>> {
    match self.get(column)? {
      Value::Null => Ok(None),
      Value::Int(i) => Ok(Some(*i)),
      other => Err(self.mismatch(column, "int", other)),
    }
  }

  /// Accepts integer cells as well as float cells.
  pub fn float(&self, column: &str) -> Result<Option<f64>> {
    match self.get(column)? {
      Value::Null => Ok(None),
      Value::Float(x) => Ok(Some(*x)),
      Value::Int(i) => Ok(Some(*i as f64)),
      other => Err(self.mismatch(column, "float", other)),
    }
  }

  pub fn bool(&self, column: &str) -> Result<Option<bool>> {
    match self.get(column)? {
      Value::Null => Ok(None),
      Value::Bool(b) => Ok(Some(*b)),
      other => Err(self.mismatch(column, "bool", other)),
    }
  }

  pub fn date(&self, column: &str) -> Result<Option<NaiveDate>> {
    match self.get(column)? {
      Value::Null => Ok(None),
      Value::Date(d) => Ok(Some(*d)),
      other => Err(self.mismatch(column, "date", other)),
    }
  }
}
