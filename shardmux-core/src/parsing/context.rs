//! Parse-time context: tables, columns and the sharding conditions
//! collected for routing.

use crate::parsing::SqlExpr;
use indexmap::IndexMap;

/// Table referenced by a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Column as seen by the parser, qualified by its logical table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnContext {
    column_name: String,
    table_name: String,
    auto_increment: bool,
}

impl ColumnContext {
    pub fn new(column_name: impl Into<String>, table_name: impl Into<String>, auto_increment: bool) -> Self {
        Self {
            column_name: column_name.into(),
            table_name: table_name.into(),
            auto_increment,
        }
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    fn key(&self) -> (String, String) {
        (
            self.table_name.to_ascii_lowercase(),
            self.column_name.to_ascii_lowercase(),
        )
    }
}

/// Sharding column paired with the value it was assigned
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: ColumnContext,
    pub value: SqlExpr,
}

impl Condition {
    pub fn new(column: ColumnContext, value: SqlExpr) -> Self {
        Self { column, value }
    }
}

/// Ordered, column-unique set of conditions for one statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionContext {
    conditions: IndexMap<(String, String), Condition>,
}

impl ConditionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition; a repeated column keeps its position and takes the new value
    pub fn add(&mut self, condition: Condition) {
        self.conditions.insert(condition.column.key(), condition);
    }

    /// Find the condition for a column (ASCII case-insensitive)
    pub fn find(&self, table: &str, column: &str) -> Option<&Condition> {
        self.conditions
            .get(&(table.to_ascii_lowercase(), column.to_ascii_lowercase()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.values()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
