use crate::{DatabaseType, Error, Result};
use serde::{Deserialize, Serialize};

/// Engine configuration for parsing limits and dialect selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backend database product; selects tokenizer dialect and insert grammar
    pub database_type: DatabaseType,

    /// Maximum accepted SQL text length in bytes
    pub max_sql_length: usize,

    /// Maximum number of bound parameters per statement
    pub max_parameters: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_type: DatabaseType::MySQL,
            max_sql_length: 64 * 1024,
            max_parameters: 65535,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend database type
    pub fn with_database_type(mut self, database_type: DatabaseType) -> Self {
        self.database_type = database_type;
        self
    }

    /// Set maximum SQL length in bytes
    pub fn with_max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = len;
        self
    }

    /// Set maximum bound parameter count
    pub fn with_max_parameters(mut self, count: usize) -> Self {
        self.max_parameters = count;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_sql_length == 0 {
            return Err(Error::InvalidConfig("max_sql_length must be greater than 0".into()));
        }

        if self.max_parameters == 0 {
            return Err(Error::InvalidConfig("max_parameters must be greater than 0".into()));
        }

        Ok(())
    }
}
