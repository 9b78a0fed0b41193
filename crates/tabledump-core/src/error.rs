//! Error types for tabledump-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting addresses and ranges
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Empty or non-alphabetic column letters, or a zero column index
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Range text does not have the `A1:D10` shape
    #[error("Malformed range: {0}")]
    MalformedRange(String),

    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Row number out of bounds
    #[error("Row {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column out of bounds; carries the offending letters or index
    #[error("Column {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(String, u32),
}
