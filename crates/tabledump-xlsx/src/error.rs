//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while reading a workbook or resolving its cells
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// No worksheet with the given name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// No table matched the selection
    #[error("No table found: {0}")]
    NoTable(String),

    /// The addressed cell is not present in the worksheet
    #[error("Cell {address} not found in sheet '{sheet}'")]
    CellNotFound { sheet: String, address: String },

    /// The document references data it does not contain
    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    /// Addressing error
    #[error("Address error: {0}")]
    Core(#[from] tabledump_core::Error),
}
