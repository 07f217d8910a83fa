use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Parse-time errors
    #[error("Unsupported grammar: {0}")]
    UnsupportedGrammar(String),

    #[error("Syntax error: {0}")]
    SyntaxError(String),

    #[error("Tokenize error: {0}")]
    Tokenize(String),

    #[error("Parameter index {index} out of range ({count} parameters bound)")]
    ParameterOutOfRange { index: usize, count: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    // Merge-time errors
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Query result error: {0}")]
    QueryResult(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns a stable error code for this error variant.
    /// These codes are stable and can be used by callers for error classification.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::UnsupportedGrammar(_) => "UNSUPPORTED_GRAMMAR",
            Error::SyntaxError(_) => "SYNTAX_ERROR",
            Error::Tokenize(_) => "TOKENIZE_ERROR",
            Error::ParameterOutOfRange { .. } => "PARAMETER_OUT_OF_RANGE",
            Error::InvalidArgument(_) => "INVALID_ARGUMENT",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Error::QueryResult(_) => "QUERY_RESULT_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if this error is potentially retryable.
    ///
    /// Only failures of a shard cursor or of the filesystem are transient.
    /// Parse errors reject the statement and must be reported to the client.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::QueryResult(_) => true,

            Error::Json(_) => false,
            Error::UnsupportedGrammar(_) => false,
            Error::SyntaxError(_) => false,
            Error::Tokenize(_) => false,
            Error::ParameterOutOfRange { .. } => false,
            Error::InvalidArgument(_) => false,
            Error::InvalidConfig(_) => false,
            Error::ColumnNotFound(_) => false,
            Error::Internal(_) => false,
        }
    }

    /// Returns true for errors raised while compiling a statement.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedGrammar(_)
                | Error::SyntaxError(_)
                | Error::Tokenize(_)
                | Error::ParameterOutOfRange { .. }
        )
    }

    /// Adds context to an error by wrapping it in an Internal error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use shardmux_core::Error;
    ///
    /// fn fetch_row() -> Result<bool, Error> {
    ///     Err(Error::QueryResult("connection reset".into()))
    /// }
    ///
    /// fn drain() -> Result<bool, Error> {
    ///     fetch_row().map_err(|e| e.with_context("shard ds_1"))
    /// }
    /// ```
    pub fn with_context(self, context: &str) -> Error {
        Error::Internal(format!("{}: {}", context, self))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
