//! Entry point for compiling statements into routing metadata.

use crate::config::EngineConfig;
use crate::parsing::{
    InsertParser, Lexer, MySqlInsertDialect, SqlParser, SqlStatement, StandardInsertDialect,
    TokenKind,
};
use crate::rule::ShardingRule;
use crate::{DatabaseType, Error, Result, Value};
use sqlparser::keywords::Keyword;
use tracing::debug;

/// Parses statements against one sharding rule and configuration
pub struct SqlParsingEngine<'r> {
    config: EngineConfig,
    rule: &'r dyn ShardingRule,
}

impl<'r> SqlParsingEngine<'r> {
    pub fn new(config: EngineConfig, rule: &'r dyn ShardingRule) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rule })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse an INSERT and extract its sharding conditions
    pub fn parse_insert(&self, sql: &str, parameters: &[Value]) -> Result<SqlStatement> {
        if sql.trim().is_empty() {
            return Err(Error::InvalidArgument("Statement cannot be empty".into()));
        }
        if sql.len() > self.config.max_sql_length {
            return Err(Error::InvalidArgument(format!(
                "Statement too long: {} bytes (max {})",
                sql.len(),
                self.config.max_sql_length
            )));
        }
        if parameters.len() > self.config.max_parameters {
            return Err(Error::InvalidArgument(format!(
                "Too many parameters: {} (max {})",
                parameters.len(),
                self.config.max_parameters
            )));
        }

        let database_type = self.config.database_type;
        let mut parser = SqlParser::new(Lexer::new(sql, database_type)?, parameters);
        if !parser.equal_any(&[TokenKind::Keyword(Keyword::INSERT)]) {
            return Err(Error::UnsupportedGrammar(format!(
                "Expected INSERT statement, got '{}'",
                parser.current().literal
            )));
        }

        debug!("Parsing INSERT for {}", database_type);
        match database_type {
            DatabaseType::MySQL => InsertParser::new(MySqlInsertDialect, self.rule).parse(&mut parser),
            DatabaseType::PostgreSQL | DatabaseType::H2 => {
                InsertParser::new(StandardInsertDialect, self.rule).parse(&mut parser)
            }
        }
    }
}
