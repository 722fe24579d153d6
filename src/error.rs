//! Error types for schema translation.

use crate::convert::ConvertWarning;
use crate::dialect::SqlDialect;
use thiserror::Error;

/// Errors produced by text-mode conversion and configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// Input is not a CREATE TABLE statement
    #[error("unsupported SQL statement type: {preview}")]
    UnsupportedStatement { preview: String },

    /// No translation exists between the two dialects
    #[error("unsupported translation direction: {from} -> {to}")]
    UnsupportedDirection { from: SqlDialect, to: SqlDialect },

    /// Raised instead of a warning when strict mode is enabled
    #[error("strict mode: {0}")]
    LossyConversion(ConvertWarning),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BridgeError {
    /// Build an UnsupportedStatement error with a short preview of the input
    pub fn unsupported_statement(sql: &str) -> Self {
        BridgeError::UnsupportedStatement {
            preview: preview(sql),
        }
    }
}

/// Errors produced by structure-mode migration.
///
/// `S` is the source introspector's error type and `T` the target creator's.
/// Collaborator errors pass through untouched: Display and `source()` are
/// those of the original error.
#[derive(Error, Debug)]
pub enum MigrateError<S, T>
where
    S: std::error::Error + 'static,
    T: std::error::Error + 'static,
{
    #[error(transparent)]
    Introspect(S),

    #[error(transparent)]
    Create(T),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Introspection returned no columns for the table
    #[error("table {0} has no columns (does it exist?)")]
    EmptyTable(String),
}

/// Result type alias for text-mode operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// First line of a statement, truncated for error messages
pub(crate) fn preview(sql: &str) -> String {
    let first = sql.trim().lines().next().unwrap_or_default();
    first.chars().take(60).collect()
}
