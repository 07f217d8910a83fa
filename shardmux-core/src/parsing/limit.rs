//! Pagination metadata carried by a parsed statement.
//!
//! Offset and row count are either literals or `?` markers; both become
//! concrete numbers only when the bound parameters are known, see
//! [`Limit::resolve`].

use crate::{DatabaseType, Error, Result, Value};
use serde::{Deserialize, Serialize};

/// Literal number or placeholder reference used by LIMIT/OFFSET
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitValue {
    pub value: i64,
    /// Index into the bound parameters; None for a literal
    pub parameter_index: Option<usize>,
    pub is_literal: bool,
}

impl LimitValue {
    pub fn new(value: i64, parameter_index: Option<usize>, is_literal: bool) -> Self {
        Self {
            value,
            parameter_index,
            is_literal,
        }
    }

    pub fn literal(value: i64) -> Self {
        Self::new(value, None, true)
    }

    pub fn placeholder(parameter_index: usize) -> Self {
        Self::new(-1, Some(parameter_index), false)
    }

    /// Concrete number, reading the bound parameter when this is a placeholder
    pub fn resolve(&self, parameters: &[Value]) -> Result<i64> {
        let Some(index) = self.parameter_index else {
            return Ok(self.value);
        };
        let parameter = parameters.get(index).ok_or(Error::ParameterOutOfRange {
            index,
            count: parameters.len(),
        })?;
        parameter.as_i64().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "LIMIT parameter {} must be an integer, got {:?}",
                index, parameter
            ))
        })
    }
}

/// LIMIT clause of a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub database_type: DatabaseType,
    offset: Option<LimitValue>,
    row_count: Option<LimitValue>,
}

/// Limit with placeholders replaced by bound values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLimit {
    pub offset: usize,
    /// None means no row bound
    pub row_count: Option<usize>,
}

impl Limit {
    pub fn new(database_type: DatabaseType) -> Self {
        Self {
            database_type,
            offset: None,
            row_count: None,
        }
    }

    pub fn with_offset(mut self, offset: LimitValue) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_row_count(mut self, row_count: LimitValue) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn set_row_count(&mut self, row_count: LimitValue) {
        self.row_count = Some(row_count);
    }

    pub fn offset(&self) -> Option<&LimitValue> {
        self.offset.as_ref()
    }

    pub fn row_count(&self) -> Option<&LimitValue> {
        self.row_count.as_ref()
    }

    /// Resolve offset and row count against the bound parameters.
    ///
    /// A missing offset is 0; a missing or negative row count is unbounded.
    /// A negative offset is rejected.
    pub fn resolve(&self, parameters: &[Value]) -> Result<ResolvedLimit> {
        let offset = match &self.offset {
            Some(v) => v.resolve(parameters)?,
            None => 0,
        };
        if offset < 0 {
            return Err(Error::InvalidArgument(format!("LIMIT offset must not be negative: {}", offset)));
        }

        let row_count = match &self.row_count {
            Some(v) => v.resolve(parameters)?,
            None => -1,
        };

        Ok(ResolvedLimit {
            offset: usize::try_from(offset).unwrap_or(usize::MAX),
            row_count: usize::try_from(row_count).ok(),
        })
    }
}
