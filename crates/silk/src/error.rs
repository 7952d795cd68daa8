//! Error types for silk

use thiserror::Error;

/// Result type alias for silk operations
pub type SilkResult<T> = Result<T, SilkError>;

/// Error types for statement building, execution and coercion
#[derive(Debug, Error)]
pub enum SilkError {
    /// A `first()`-family call found zero rows
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// A write statement matched or changed no rows
    #[error("No affected rows: {0}")]
    NoAffectedRows(String),

    /// The clause model cannot be compiled into a meaningful statement
    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    /// The coercion target cannot receive the record
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// The source record has an ambiguous or unexpected shape
    #[error("Key mismatch on field '{field}': {message}")]
    KeyMismatch { field: String, message: String },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[cfg(feature = "postgres")]
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Other errors, typically raised by custom executors
    #[error("{0}")]
    Other(String),
}

impl SilkError {
    /// Create an empty result error
    pub fn empty_result(message: impl Into<String>) -> Self {
        Self::EmptyResult(message.into())
    }

    /// Create a no affected rows error
    pub fn no_affected_rows(message: impl Into<String>) -> Self {
        Self::NoAffectedRows(message.into())
    }

    /// Create an invalid statement error
    pub fn invalid_statement(message: impl Into<String>) -> Self {
        Self::InvalidStatement(message.into())
    }

    /// Create an invalid target error
    pub fn invalid_target(message: impl Into<String>) -> Self {
        Self::InvalidTarget(message.into())
    }

    /// Create a key mismatch error for a specific field
    pub fn key_mismatch(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::KeyMismatch {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is an empty result error
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult(_))
    }

    /// Check if this is a no affected rows error
    pub fn is_no_affected_rows(&self) -> bool {
        matches!(self, Self::NoAffectedRows(_))
    }

    /// Check if this is an invalid statement error
    pub fn is_invalid_statement(&self) -> bool {
        matches!(self, Self::InvalidStatement(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for SilkError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

impl From<toml::de::Error> for SilkError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
