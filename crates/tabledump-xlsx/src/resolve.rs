//! Turning raw cells into display text

use std::fmt;

use tabledump_core::{CellAddress, TableRange};

use crate::document::{CellType, RawCell, Worksheet, XlsxDocument};
use crate::error::{XlsxError, XlsxResult};

/// Display text of one cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellValue {
    /// No content, or no cell at all
    #[default]
    Empty,
    /// Resolved text
    Text(String),
}

impl CellValue {
    /// The text, or `""` for an empty cell
    pub fn as_str(&self) -> &str {
        match self {
            CellValue::Empty => "",
            CellValue::Text(s) => s,
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::from(s.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when an address has no cell in the worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingCellPolicy {
    /// Resolve to [`CellValue::Empty`]
    #[default]
    Empty,
    /// Fail with [`XlsxError::CellNotFound`]
    Error,
}

/// Resolves cells of a document to display text
///
/// Shared string indexes are replaced by their table entry and booleans become
/// `TRUE`/`FALSE`; every other type keeps its stored text. Resolution never
/// changes the document, so resolving an address twice gives the same value.
#[derive(Debug, Clone, Copy)]
pub struct CellResolver<'a> {
    document: &'a XlsxDocument,
    missing: MissingCellPolicy,
}

impl<'a> CellResolver<'a> {
    /// Create a resolver that treats missing cells as empty
    pub fn new(document: &'a XlsxDocument) -> Self {
        Self {
            document,
            missing: MissingCellPolicy::default(),
        }
    }

    /// Set the policy for addresses that have no cell
    pub fn with_missing_policy(mut self, missing: MissingCellPolicy) -> Self {
        self.missing = missing;
        self
    }

    /// Resolve the cell at a 1-based row and 1-based column
    pub fn resolve_cell(
        &self,
        sheet: &Worksheet,
        row: u32,
        column: u32,
    ) -> XlsxResult<CellValue> {
        let address = CellAddress::new(column, row)?;
        self.resolve_address(sheet, &address)
    }

    /// Resolve the cell at `address`
    pub fn resolve_address(
        &self,
        sheet: &Worksheet,
        address: &CellAddress,
    ) -> XlsxResult<CellValue> {
        match sheet.cell(address) {
            Some(raw) => self.normalize(sheet, address, raw),
            None => match self.missing {
                MissingCellPolicy::Empty => Ok(CellValue::Empty),
                MissingCellPolicy::Error => Err(XlsxError::CellNotFound {
                    sheet: sheet.name().to_string(),
                    address: address.to_string(),
                }),
            },
        }
    }

    /// Resolve an A1-style address on the sheet called `sheet_name`
    pub fn resolve_in(&self, sheet_name: &str, address: &str) -> XlsxResult<CellValue> {
        let sheet = self.document.worksheet_by_name(sheet_name)?;
        let address = CellAddress::parse(address)?;
        self.resolve_address(sheet, &address)
    }

    /// Resolve every cell of `range`, row by row
    pub fn resolve_range(
        &self,
        sheet: &Worksheet,
        range: &TableRange,
    ) -> XlsxResult<Vec<CellValue>> {
        range
            .cells()
            .map(|address| self.resolve_address(sheet, &address))
            .collect()
    }

    fn normalize(
        &self,
        sheet: &Worksheet,
        address: &CellAddress,
        raw: &RawCell,
    ) -> XlsxResult<CellValue> {
        if raw.text.is_empty() {
            return Ok(CellValue::Empty);
        }

        let text = match raw.cell_type {
            CellType::SharedString => self.shared_string(sheet, address, &raw.text)?,
            CellType::Boolean => match raw.text.as_str() {
                "0" => "FALSE".to_string(),
                _ => "TRUE".to_string(),
            },
            _ => raw.text.clone(),
        };

        Ok(CellValue::from(text))
    }

    fn shared_string(
        &self,
        sheet: &Worksheet,
        address: &CellAddress,
        index_text: &str,
    ) -> XlsxResult<String> {
        let location = || format!("cell {} on sheet '{}'", address, sheet.name());

        let table = self.document.shared_strings().ok_or_else(|| {
            XlsxError::CorruptDocument(format!(
                "{} is a shared string but the workbook has no shared string table",
                location()
            ))
        })?;

        let index: usize = index_text.trim().parse().map_err(|_| {
            XlsxError::CorruptDocument(format!(
                "{} has invalid shared string index '{}'",
                location(),
                index_text
            ))
        })?;

        table.get(index).map(str::to_string).ok_or_else(|| {
            XlsxError::CorruptDocument(format!(
                "{} refers to shared string {} but the table has {} entries",
                location(),
                index,
                table.len()
            ))
        })
    }
}
