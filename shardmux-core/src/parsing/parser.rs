//! Parser session shared by every parsing step of one statement.
//!
//! The session owns the token cursor and the running bound-parameter index.
//! Clause parsers take it by `&mut`, so the index advances monotonically
//! across all clauses of the statement and nothing leaks between statements.

use crate::parsing::{Lexer, Number, SqlExpr, Token, TokenKind};
use crate::{Error, Result, Value};
use sqlparser::keywords::Keyword;
use tracing::trace;

pub struct SqlParser<'a> {
    lexer: Lexer,
    parameters: &'a [Value],
    parameters_index: usize,
}

impl<'a> SqlParser<'a> {
    pub fn new(lexer: Lexer, parameters: &'a [Value]) -> Self {
        Self {
            lexer,
            parameters,
            parameters_index: 0,
        }
    }

    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    pub fn current(&self) -> &Token {
        self.lexer.current_token()
    }

    pub fn advance(&mut self) {
        self.lexer.next_token();
    }

    pub fn equal_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current().kind)
    }

    pub fn equal_any_keyword(&self, keywords: &[Keyword]) -> bool {
        match self.current().kind {
            TokenKind::Keyword(k) => keywords.contains(&k),
            _ => false,
        }
    }

    /// Consume the expected token or fail with a syntax error
    pub fn accept(&mut self, expected: TokenKind) -> Result<()> {
        if self.current().kind == expected {
            self.advance();
            Ok(())
        } else {
            Err(Error::SyntaxError(format!(
                "Expected {:?}, got '{}' at token {}",
                expected,
                self.current().literal,
                self.lexer.position()
            )))
        }
    }

    /// Consume the current token when it matches; report whether it did
    pub fn skip_if_equal(&mut self, kinds: &[TokenKind]) -> bool {
        if self.equal_any(kinds) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Move forward until a token of the given kinds, or the end of statement
    pub fn skip_until(&mut self, kinds: &[TokenKind]) {
        while !self.equal_any(kinds) && !self.lexer.is_end() {
            self.advance();
        }
    }

    /// Skip a balanced parenthesized group starting at the current `(`
    pub fn skip_parentheses(&mut self) -> Result<()> {
        self.accept(TokenKind::LeftParen)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.current().kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                TokenKind::End => {
                    return Err(Error::SyntaxError("Unbalanced parentheses".into()));
                }
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    /// Read a possibly qualified name (`a` or `a.b`), returning its last part
    pub fn parse_name(&mut self) -> Result<String> {
        if !self.current().is_word() {
            return Err(Error::SyntaxError(format!(
                "Expected name, got '{}'",
                self.current().literal
            )));
        }
        let mut name = self.current().literal.clone();
        self.advance();
        while self.skip_if_equal(&[TokenKind::Period]) {
            if !self.current().is_word() {
                return Err(Error::SyntaxError(format!(
                    "Expected name after '.', got '{}'",
                    self.current().literal
                )));
            }
            name = self.current().literal.clone();
            self.advance();
        }
        Ok(name)
    }

    pub fn parameters_index(&self) -> usize {
        self.parameters_index
    }

    /// Bind the next `?` marker to its parameter and advance the shared index
    pub fn next_parameter(&mut self) -> Result<(usize, Value)> {
        let index = self.parameters_index;
        let value = self
            .parameters
            .get(index)
            .cloned()
            .ok_or(Error::ParameterOutOfRange {
                index,
                count: self.parameters.len(),
            })?;
        self.parameters_index += 1;
        Ok((index, value))
    }

    /// Build the expression for a value token and move past it.
    ///
    /// Accepts integer and float literals (optionally signed with `-`),
    /// string literals, NULL, and `?`.
    /// Anything else is unsupported grammar and leaves the cursor in place.
    pub fn parse_value_expr(&mut self) -> Result<SqlExpr> {
        if self.current().kind == TokenKind::Minus
            && matches!(self.lexer.peek_token().kind, TokenKind::Integer | TokenKind::Float)
        {
            let Token { kind, literal } = self.lexer.peek_token().clone();
            let expr = parse_number(kind, &format!("-{}", literal))?;
            trace!("Parsed value expression {:?}", expr);
            self.advance();
            self.advance();
            return Ok(expr);
        }

        let Token { kind, literal } = self.current().clone();
        let expr = match kind {
            TokenKind::Integer | TokenKind::Float => parse_number(kind, &literal)?,
            TokenKind::Text => SqlExpr::Text(literal),
            TokenKind::Keyword(Keyword::NULL) => SqlExpr::Ignore,
            TokenKind::Placeholder => {
                let (index, value) = self.next_parameter()?;
                SqlExpr::Placeholder { index, value }
            }
            _ => {
                return Err(Error::UnsupportedGrammar(format!(
                    "Unsupported value '{}' at token {}",
                    literal,
                    self.lexer.position()
                )));
            }
        };
        trace!("Parsed value expression {:?}", expr);
        self.advance();
        Ok(expr)
    }
}

fn parse_number(kind: TokenKind, literal: &str) -> Result<SqlExpr> {
    if kind == TokenKind::Integer {
        let n = literal.parse::<i64>().map_err(|_| {
            Error::UnsupportedGrammar(format!("Integer literal out of range: {}", literal))
        })?;
        Ok(SqlExpr::Number(Number::Int(n)))
    } else {
        let f = literal.parse::<f64>().map_err(|_| {
            Error::UnsupportedGrammar(format!("Invalid float literal: {}", literal))
        })?;
        Ok(SqlExpr::Number(Number::Float(f)))
    }
}
