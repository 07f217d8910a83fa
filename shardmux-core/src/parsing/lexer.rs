//! Token stream for the statement parsers.
//!
//! Tokenizing is delegated to sqlparser-rs; this module flattens its tokens
//! into the small set of kinds the sharding parsers branch on, drops
//! whitespace and comments, and terminates the stream with [`TokenKind::End`].

use crate::{DatabaseType, Error, Result};
use sqlparser::dialect::{Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token as SqlToken, Tokenizer};

/// Token classification seen by the parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Integer literal: 42
    Integer,
    /// Floating literal: 4.2, 1e3
    Float,
    /// Quoted character literal: 'abc' or "abc"
    Text,
    /// Unquoted non-keyword word, or any back-quoted word
    Identifier,
    /// Reserved or non-reserved SQL keyword
    Keyword(Keyword),
    /// Positional parameter marker: ?
    Placeholder,
    Comma,
    Eq,
    LeftParen,
    RightParen,
    Period,
    Semicolon,
    /// Minus sign, which may prefix a numeric literal
    Minus,
    /// Any other operator or punctuation
    Other,
    /// End of statement
    End,
}

/// Token with its source text (quotes removed for identifiers and strings)
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }

    fn end() -> Self {
        Self::new(TokenKind::End, "")
    }

    /// Words usable as column or table names, keywords included
    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Identifier | TokenKind::Keyword(_))
    }
}

/// Cursor over the tokens of one statement
#[derive(Debug, Clone)]
pub struct Lexer {
    tokens: Vec<Token>,
    pos: usize,
}

impl Lexer {
    /// Tokenize a statement with the dialect of the given database
    pub fn new(sql: &str, database_type: DatabaseType) -> Result<Self> {
        match database_type {
            DatabaseType::MySQL => Self::with_dialect(sql, &MySqlDialect {}),
            DatabaseType::PostgreSQL => Self::with_dialect(sql, &PostgreSqlDialect {}),
            DatabaseType::H2 => Self::with_dialect(sql, &GenericDialect {}),
        }
    }

    pub fn with_dialect(sql: &str, dialect: &dyn Dialect) -> Result<Self> {
        let raw = Tokenizer::new(dialect, sql)
            .tokenize()
            .map_err(|e| Error::Tokenize(e.to_string()))?;

        let mut tokens: Vec<Token> = raw.into_iter().filter_map(convert).collect();
        tokens.push(Token::end());

        Ok(Self { tokens, pos: 0 })
    }

    pub fn current_token(&self) -> &Token {
        // The stream always ends with End and the cursor never moves past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn next_token(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Token after the current one, without moving the cursor
    pub fn peek_token(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    pub fn is_end(&self) -> bool {
        self.current_token().kind == TokenKind::End
    }

    /// Index of the current token
    pub fn position(&self) -> usize {
        self.pos
    }
}

fn convert(token: SqlToken) -> Option<Token> {
    let converted = match token {
        SqlToken::Whitespace(_) | SqlToken::EOF => return None,
        SqlToken::Word(w) => {
            if w.quote_style.is_some() || w.keyword == Keyword::NoKeyword {
                Token::new(TokenKind::Identifier, w.value)
            } else {
                Token::new(TokenKind::Keyword(w.keyword), w.value)
            }
        }
        SqlToken::Number(n, _) => {
            if n.contains(['.', 'e', 'E']) {
                Token::new(TokenKind::Float, n)
            } else {
                Token::new(TokenKind::Integer, n)
            }
        }
        SqlToken::SingleQuotedString(s) | SqlToken::DoubleQuotedString(s) => {
            Token::new(TokenKind::Text, s)
        }
        SqlToken::Placeholder(p) if p == "?" => Token::new(TokenKind::Placeholder, p),
        // PostgreSQL dialect tokenizes a bare ? as the jsonb key operator
        SqlToken::Question => Token::new(TokenKind::Placeholder, "?"),
        SqlToken::Minus => Token::new(TokenKind::Minus, "-"),
        SqlToken::Comma => Token::new(TokenKind::Comma, ","),
        SqlToken::Eq => Token::new(TokenKind::Eq, "="),
        SqlToken::LParen => Token::new(TokenKind::LeftParen, "("),
        SqlToken::RParen => Token::new(TokenKind::RightParen, ")"),
        SqlToken::Period => Token::new(TokenKind::Period, "."),
        SqlToken::SemiColon => Token::new(TokenKind::Semicolon, ";"),
        other => {
            let literal = other.to_string();
            Token::new(TokenKind::Other, literal)
        }
    };
    Some(converted)
}
