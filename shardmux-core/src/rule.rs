//! Sharding rule: which columns route rows, and which are generated keys.
//!
//! The parser only needs two answers from a rule, expressed by the
//! [`ShardingRule`] trait. [`TableShardingRule`] is a static implementation
//! built from a serde-loadable [`ShardingRuleConfig`].

use crate::parsing::ColumnContext;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Answers routing questions about logical tables and columns
pub trait ShardingRule: Send + Sync {
    /// Auto-increment (generated key) columns of a logical table
    fn auto_increment_columns(&self, table: &str) -> Vec<String>;

    /// Whether the column participates in shard routing
    fn is_sharding_column(&self, column: &ColumnContext) -> bool;
}

/// Rule description for one logical table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRuleConfig {
    pub logic_table: String,
    #[serde(default)]
    pub sharding_columns: Vec<String>,
    #[serde(default)]
    pub auto_increment_columns: Vec<String>,
}

impl TableRuleConfig {
    pub fn new(logic_table: impl Into<String>) -> Self {
        Self {
            logic_table: logic_table.into(),
            sharding_columns: Vec::new(),
            auto_increment_columns: Vec::new(),
        }
    }

    pub fn with_sharding_column(mut self, column: impl Into<String>) -> Self {
        self.sharding_columns.push(column.into());
        self
    }

    pub fn with_auto_increment_column(mut self, column: impl Into<String>) -> Self {
        self.auto_increment_columns.push(column.into());
        self
    }
}

/// Serializable sharding rule configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardingRuleConfig {
    #[serde(default)]
    pub tables: Vec<TableRuleConfig>,
    /// Columns that route every table, on top of per-table columns
    #[serde(default)]
    pub default_sharding_columns: Vec<String>,
}

impl ShardingRuleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: TableRuleConfig) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_default_sharding_column(mut self, column: impl Into<String>) -> Self {
        self.default_sharding_columns.push(column.into());
        self
    }

    /// Parse a rule configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a rule configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for table in &self.tables {
            if table.logic_table.trim().is_empty() {
                return Err(Error::InvalidConfig("logic_table must not be empty".into()));
            }
            if !seen.insert(table.logic_table.to_ascii_lowercase()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate rule for table '{}'",
                    table.logic_table
                )));
            }
        }
        Ok(())
    }

    pub fn build(self) -> Result<TableShardingRule> {
        self.validate()?;
        Ok(TableShardingRule::from_config(self))
    }
}

#[derive(Debug, Clone)]
struct TableRule {
    sharding_columns: HashSet<String>,
    auto_increment_columns: Vec<String>,
}

/// Static rule keyed by logical table name; names compare ASCII case-insensitively
#[derive(Debug, Clone)]
pub struct TableShardingRule {
    tables: HashMap<String, TableRule>,
    default_sharding_columns: HashSet<String>,
}

impl TableShardingRule {
    fn from_config(config: ShardingRuleConfig) -> Self {
        let tables = config
            .tables
            .into_iter()
            .map(|t| {
                let rule = TableRule {
                    sharding_columns: t
                        .sharding_columns
                        .iter()
                        .map(|c| c.to_ascii_lowercase())
                        .collect(),
                    auto_increment_columns: t.auto_increment_columns,
                };
                (t.logic_table.to_ascii_lowercase(), rule)
            })
            .collect();

        Self {
            tables,
            default_sharding_columns: config
                .default_sharding_columns
                .iter()
                .map(|c| c.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Whether a rule is registered for the logical table
    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(&table.to_ascii_lowercase())
    }
}

impl ShardingRule for TableShardingRule {
    fn auto_increment_columns(&self, table: &str) -> Vec<String> {
        self.tables
            .get(&table.to_ascii_lowercase())
            .map(|t| t.auto_increment_columns.clone())
            .unwrap_or_default()
    }

    fn is_sharding_column(&self, column: &ColumnContext) -> bool {
        let name = column.column_name().to_ascii_lowercase();
        if self.default_sharding_columns.contains(&name) {
            return true;
        }
        self.tables
            .get(&column.table_name().to_ascii_lowercase())
            .map(|t| t.sharding_columns.contains(&name))
            .unwrap_or(false)
    }
}
