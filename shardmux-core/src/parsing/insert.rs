//! INSERT statement parsing for sharding-condition extraction.
//!
//! [`InsertParser`] drives the grammar shared by every database:
//!
//! ```text
//! INSERT [modifiers] [INTO] table [<dialect-skipped clause>]
//!     { [(columns)] VALUES (values) | <dialect-specific form> }
//!     [ON DUPLICATE KEY UPDATE ...] [;]
//! ```
//!
//! Dialect differences plug in through [`InsertDialect`]. MySQL adds the
//! `INSERT ... SET col = val, ...` form, see [`MySqlInsertDialect`].
//!
//! Only sharding columns produce conditions, but every assignment is fully
//! consumed so the cursor stays valid for whatever parses the remainder.

use crate::parsing::{
    ColumnContext, Condition, ConditionContext, SqlParser, SqlStatement, Table, TokenKind,
};
use crate::rule::ShardingRule;
use crate::{Error, Result};
use sqlparser::keywords::Keyword;
use tracing::{debug, trace, warn};

/// Insert modifiers accepted between INSERT and INTO
const INSERT_MODIFIERS: &[&str] = &["LOW_PRIORITY", "DELAYED", "HIGH_PRIORITY", "IGNORE"];

/// Database-specific hooks of the INSERT grammar
pub trait InsertDialect {
    /// Keywords, each optionally followed by a parenthesized group, skipped after the table name
    fn skipped_keywords_between_table_and_values(&self) -> &'static [Keyword] {
        &[]
    }

    /// Keywords introducing a row list
    fn values_keywords(&self) -> &'static [Keyword] {
        &[Keyword::VALUES]
    }

    /// Keywords introducing a dialect-specific insert form
    fn customized_insert_keywords(&self) -> &'static [Keyword] {
        &[]
    }

    /// Parse the dialect-specific form; the cursor is on one of
    /// [`customized_insert_keywords`](Self::customized_insert_keywords)
    fn parse_customized_insert(
        &self,
        parser: &mut SqlParser<'_>,
        _rule: &dyn ShardingRule,
        _statement: &mut SqlStatement,
    ) -> Result<()> {
        Err(Error::UnsupportedGrammar(format!(
            "Unsupported insert form '{}'",
            parser.current().literal
        )))
    }
}

/// ANSI INSERT grammar, used for PostgreSQL and H2
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardInsertDialect;

impl InsertDialect for StandardInsertDialect {}

/// MySQL INSERT grammar: `PARTITION (...)`, `VALUE`, and the `SET` form
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlInsertDialect;

impl InsertDialect for MySqlInsertDialect {
    fn skipped_keywords_between_table_and_values(&self) -> &'static [Keyword] {
        &[Keyword::PARTITION]
    }

    fn values_keywords(&self) -> &'static [Keyword] {
        &[Keyword::VALUES, Keyword::VALUE]
    }

    fn customized_insert_keywords(&self) -> &'static [Keyword] {
        &[Keyword::SET]
    }

    fn parse_customized_insert(
        &self,
        parser: &mut SqlParser<'_>,
        rule: &dyn ShardingRule,
        statement: &mut SqlStatement,
    ) -> Result<()> {
        parse_insert_set(parser, rule, statement)
    }
}

/// Parse `SET col1 = v1, col2 = v2, ...` with the cursor on `SET`.
///
/// Leaves the cursor on the first token after the clause (`ON`, `;` or the
/// end). The statement's condition context and insert columns are replaced
/// only when the whole clause parsed.
pub fn parse_insert_set(
    parser: &mut SqlParser<'_>,
    rule: &dyn ShardingRule,
    statement: &mut SqlStatement,
) -> Result<()> {
    let table_name = statement
        .table_name()
        .ok_or_else(|| Error::Internal("INSERT SET parsed before its table".into()))?
        .to_string();
    let auto_increment_columns = rule.auto_increment_columns(&table_name);
    let mut conditions = ConditionContext::new();
    let mut columns = Vec::new();

    loop {
        // Past SET or ','
        parser.advance();
        let column = parse_column(parser, &table_name, &auto_increment_columns)?;
        parser.accept(TokenKind::Eq)?;
        let expr = parser.parse_value_expr()?;

        if parser.equal_any(&[
            TokenKind::Comma,
            TokenKind::Keyword(Keyword::ON),
            TokenKind::Semicolon,
            TokenKind::End,
        ]) {
            if !expr.is_ignore() && rule.is_sharding_column(&column) {
                trace!("Sharding condition {}.{} = {:?}", table_name, column.column_name(), expr);
                conditions.add(Condition::new(column.clone(), expr));
            }
        } else {
            // Lenient: the assignment's value is dropped rather than rejected
            warn!(
                "Unexpected token '{}' after value of column '{}', skipping to next assignment",
                parser.current().literal,
                column.column_name()
            );
            parser.skip_until(&[TokenKind::Comma, TokenKind::Keyword(Keyword::ON)]);
        }
        columns.push(column);

        if !parser.equal_any(&[TokenKind::Comma]) {
            break;
        }
    }

    statement.set_insert_columns(columns);
    statement.set_condition_context(conditions);
    Ok(())
}

fn parse_column(
    parser: &mut SqlParser<'_>,
    table_name: &str,
    auto_increment_columns: &[String],
) -> Result<ColumnContext> {
    let name = parser.parse_name()?;
    let auto_increment = auto_increment_columns
        .iter()
        .any(|c| c.eq_ignore_ascii_case(&name));
    Ok(ColumnContext::new(name, table_name, auto_increment))
}

/// Generic INSERT driver parameterized by dialect
pub struct InsertParser<'r, D> {
    dialect: D,
    rule: &'r dyn ShardingRule,
}

impl<'r, D: InsertDialect> InsertParser<'r, D> {
    pub fn new(dialect: D, rule: &'r dyn ShardingRule) -> Self {
        Self { dialect, rule }
    }

    /// Parse a complete INSERT statement, cursor on `INSERT`
    pub fn parse(&self, parser: &mut SqlParser<'_>) -> Result<SqlStatement> {
        let mut statement = SqlStatement::insert();

        parser.accept(TokenKind::Keyword(Keyword::INSERT))?;
        while parser.current().is_word()
            && INSERT_MODIFIERS
                .iter()
                .any(|m| parser.current().literal.eq_ignore_ascii_case(m))
        {
            parser.advance();
        }
        parser.skip_if_equal(&[TokenKind::Keyword(Keyword::INTO)]);

        let table_name = parser.parse_name()?;
        statement.add_table(Table::new(table_name.clone()));

        let skipped = self.dialect.skipped_keywords_between_table_and_values();
        while parser.equal_any_keyword(skipped) {
            parser.advance();
            if parser.equal_any(&[TokenKind::LeftParen]) {
                parser.skip_parentheses()?;
            }
        }

        let auto_increment_columns = self.rule.auto_increment_columns(&table_name);
        let columns = if parser.equal_any(&[TokenKind::LeftParen]) {
            self.parse_columns(parser, &table_name, &auto_increment_columns)?
        } else {
            Vec::new()
        };

        if parser.equal_any_keyword(self.dialect.values_keywords()) {
            let conditions = self.parse_values(parser, &columns)?;
            statement.set_insert_columns(columns);
            statement.set_condition_context(conditions);
        } else if columns.is_empty()
            && parser.equal_any_keyword(self.dialect.customized_insert_keywords())
        {
            self.dialect
                .parse_customized_insert(parser, self.rule, &mut statement)?;
        } else {
            return Err(Error::UnsupportedGrammar(format!(
                "Unsupported insert form at '{}'",
                parser.current().literal
            )));
        }

        self.parse_duplicate_key_update(parser)?;
        parser.skip_if_equal(&[TokenKind::Semicolon]);
        if !parser.lexer().is_end() {
            return Err(Error::SyntaxError(format!(
                "Unexpected '{}' after INSERT statement",
                parser.current().literal
            )));
        }

        let generated: Vec<String> = auto_increment_columns
            .into_iter()
            .filter(|c| {
                !statement
                    .insert_columns()
                    .iter()
                    .any(|col| col.column_name().eq_ignore_ascii_case(c))
            })
            .collect();
        statement.set_generated_key_columns(generated);
        statement.set_parameters_index(parser.parameters_index());

        debug!(
            "Parsed INSERT into {}: {} sharding conditions, {} parameters consumed",
            table_name,
            statement.condition_context().len(),
            statement.parameters_index()
        );
        Ok(statement)
    }

    fn parse_columns(
        &self,
        parser: &mut SqlParser<'_>,
        table_name: &str,
        auto_increment_columns: &[String],
    ) -> Result<Vec<ColumnContext>> {
        parser.accept(TokenKind::LeftParen)?;
        let mut columns = Vec::new();
        loop {
            columns.push(parse_column(parser, table_name, auto_increment_columns)?);
            if !parser.skip_if_equal(&[TokenKind::Comma]) {
                break;
            }
        }
        parser.accept(TokenKind::RightParen)?;
        Ok(columns)
    }

    /// Single-row `VALUES (v1, v2, ...)`; values pair with columns by position
    fn parse_values(
        &self,
        parser: &mut SqlParser<'_>,
        columns: &[ColumnContext],
    ) -> Result<ConditionContext> {
        parser.advance();
        parser.accept(TokenKind::LeftParen)?;

        let mut conditions = ConditionContext::new();
        let mut count = 0usize;
        loop {
            let expr = parser.parse_value_expr()?;
            if let Some(column) = columns.get(count) {
                if !expr.is_ignore() && self.rule.is_sharding_column(column) {
                    trace!("Sharding condition {}.{} = {:?}", column.table_name(), column.column_name(), expr);
                    conditions.add(Condition::new(column.clone(), expr));
                }
            }
            count += 1;
            if !parser.skip_if_equal(&[TokenKind::Comma]) {
                break;
            }
        }
        parser.accept(TokenKind::RightParen)?;

        if !columns.is_empty() && count != columns.len() {
            return Err(Error::SyntaxError(format!(
                "Column count {} does not match value count {}",
                columns.len(),
                count
            )));
        }
        if parser.equal_any(&[TokenKind::Comma]) {
            return Err(Error::UnsupportedGrammar("Multi-row INSERT is not supported".into()));
        }
        Ok(conditions)
    }

    /// `ON DUPLICATE KEY UPDATE ...` never routes; consume it to the statement end
    fn parse_duplicate_key_update(&self, parser: &mut SqlParser<'_>) -> Result<()> {
        if !parser.skip_if_equal(&[TokenKind::Keyword(Keyword::ON)]) {
            return Ok(());
        }
        parser.accept(TokenKind::Keyword(Keyword::DUPLICATE))?;
        parser.accept(TokenKind::Keyword(Keyword::KEY))?;
        parser.accept(TokenKind::Keyword(Keyword::UPDATE))?;
        if parser.lexer().is_end() {
            return Err(Error::SyntaxError("Expected assignments after ON DUPLICATE KEY UPDATE".into()));
        }
        parser.skip_until(&[TokenKind::Semicolon]);
        Ok(())
    }
}
