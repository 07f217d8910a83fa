//! Per-shard result cursors and typed column access.

use crate::{Error, Result, Value};

/// Column access shared by shard cursors and merged cursors.
///
/// Positions are 0-based; labels compare ASCII case-insensitively.
pub trait ColumnReader {
    /// Value at a position of the current row
    fn value(&self, index: usize) -> Result<Value>;

    /// Value of a labelled column of the current row
    fn value_by_label(&self, label: &str) -> Result<Value>;

    fn i64_value(&self, index: usize) -> Result<Option<i64>> {
        match self.value(index)? {
            Value::Null => Ok(None),
            v => v.as_i64().map(Some).ok_or_else(|| {
                Error::InvalidArgument(format!("Column {} is not an integer: {:?}", index, v))
            }),
        }
    }

    fn f64_value(&self, index: usize) -> Result<Option<f64>> {
        match self.value(index)? {
            Value::Null => Ok(None),
            v => v.as_f64().map(Some).ok_or_else(|| {
                Error::InvalidArgument(format!("Column {} is not a number: {:?}", index, v))
            }),
        }
    }

    fn text_value(&self, index: usize) -> Result<Option<String>> {
        match self.value(index)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s)),
            Value::Int(n) => Ok(Some(n.to_string())),
            Value::Float(f) => Ok(Some(f.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            Value::Bytes(_) => Err(Error::InvalidArgument(format!(
                "Column {} holds binary data",
                index
            ))),
        }
    }
}

/// Result cursor of one shard, produced by the execution layer
pub trait QueryResult: ColumnReader + Send {
    /// Advance to the next row; false once the shard is exhausted
    fn next(&mut self) -> Result<bool>;

    fn column_count(&self) -> usize;

    fn column_label(&self, index: usize) -> Result<&str>;
}

/// Position of a label among the columns of a result
pub fn find_column(result: &dyn QueryResult, label: &str) -> Result<usize> {
    for i in 0..result.column_count() {
        if result.column_label(i)?.eq_ignore_ascii_case(label) {
            return Ok(i);
        }
    }
    Err(Error::ColumnNotFound(label.to_string()))
}

/// Shard result held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryQueryResult {
    labels: Vec<String>,
    rows: Vec<Vec<Value>>,
    /// Rows handed out so far; the current row is `position - 1`
    position: usize,
    on_row: bool,
}

impl MemoryQueryResult {
    pub fn new(labels: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            labels,
            rows,
            position: 0,
            on_row: false,
        }
    }

    fn current_row(&self) -> Result<&[Value]> {
        if !self.on_row {
            return Err(Error::InvalidArgument("Cursor is not positioned on a row".into()));
        }
        Ok(&self.rows[self.position - 1])
    }
}

impl ColumnReader for MemoryQueryResult {
    fn value(&self, index: usize) -> Result<Value> {
        self.current_row()?
            .get(index)
            .cloned()
            .ok_or_else(|| Error::ColumnNotFound(format!("index {}", index)))
    }

    fn value_by_label(&self, label: &str) -> Result<Value> {
        let index = find_column(self, label)?;
        self.value(index)
    }
}

impl QueryResult for MemoryQueryResult {
    fn next(&mut self) -> Result<bool> {
        if self.position < self.rows.len() {
            self.position += 1;
            self.on_row = true;
        } else {
            self.on_row = false;
        }
        Ok(self.on_row)
    }

    fn column_count(&self) -> usize {
        self.labels.len()
    }

    fn column_label(&self, index: usize) -> Result<&str> {
        self.labels
            .get(index)
            .map(|s| s.as_str())
            .ok_or_else(|| Error::ColumnNotFound(format!("index {}", index)))
    }
}
