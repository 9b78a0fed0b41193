//! In-memory view of the parts of a workbook that tabledump reads

use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

use crate::error::{XlsxError, XlsxResult};
use crate::reader::XlsxReader;
use tabledump_core::{CellAddress, TableRange};

/// Declared type of a cell (the `t` attribute of `<c>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellType {
    /// Number or date serial (`n`, or no attribute)
    #[default]
    Number,
    /// Index into the shared string table (`s`)
    SharedString,
    /// `0` or `1` (`b`)
    Boolean,
    /// Rich or plain text stored in the cell itself (`inlineStr`)
    InlineString,
    /// Text result of a formula (`str`)
    FormulaString,
    /// Error value such as `#DIV/0!` (`e`)
    Error,
    /// ISO 8601 date (`d`)
    Date,
}

impl CellType {
    /// Map a `t` attribute value to a cell type
    ///
    /// Unknown values are treated as numbers, which leaves their text unchanged.
    pub fn from_xlsx(value: Option<&str>) -> Self {
        match value {
            Some("s") => CellType::SharedString,
            Some("b") => CellType::Boolean,
            Some("inlineStr") => CellType::InlineString,
            Some("str") => CellType::FormulaString,
            Some("e") => CellType::Error,
            Some("d") => CellType::Date,
            None | Some("n") => CellType::Number,
            Some(other) => {
                log::warn!("Unknown cell type '{}', treating as number", other);
                CellType::Number
            }
        }
    }
}

/// A cell as stored in the worksheet, before any normalization
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCell {
    /// Declared type
    pub cell_type: CellType,
    /// Text of `<v>`, or of the inline string; empty when the cell has neither
    pub text: String,
}

/// A table part attached to a worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    /// Internal table name
    pub name: String,
    /// Name shown to users (used in formulas)
    pub display_name: String,
    /// The `ref` attribute, e.g. "A1:D10"
    pub reference: String,
    /// Number of header rows at the top of the range
    pub header_row_count: u32,
    /// Number of totals rows at the bottom of the range
    pub totals_row_count: u32,
}

impl TableDefinition {
    /// Parse the table's range
    pub fn range(&self) -> XlsxResult<TableRange> {
        Ok(TableRange::parse(&self.reference)?)
    }

    /// Check whether `name` matches the table's name or display name
    ///
    /// Excel table names are case-insensitive.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.display_name.eq_ignore_ascii_case(name)
    }
}

/// A worksheet: its name, stored cells and table parts
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    name: String,
    cells: HashMap<CellAddress, RawCell>,
    tables: Vec<TableDefinition>,
}

impl Worksheet {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn insert_cell(&mut self, address: CellAddress, cell: RawCell) {
        self.cells.insert(address, cell);
    }

    pub(crate) fn push_table(&mut self, table: TableDefinition) {
        self.tables.push(table);
    }

    /// Sheet name as shown on its tab
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a stored cell
    pub fn cell(&self, address: &CellAddress) -> Option<&RawCell> {
        self.cells.get(address)
    }

    /// Look up a stored cell by A1-style reference
    pub fn cell_by_ref(&self, reference: &str) -> XlsxResult<Option<&RawCell>> {
        let address = CellAddress::parse(reference)?;
        Ok(self.cell(&address))
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Table parts in relationship order
    pub fn tables(&self) -> &[TableDefinition] {
        &self.tables
    }
}

/// The shared string table (`xl/sharedStrings.xml`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SharedStringTable {
    strings: Vec<String>,
}

impl SharedStringTable {
    pub(crate) fn new(strings: Vec<String>) -> Self {
        Self { strings }
    }

    /// Get an entry by index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True when the table has no entries
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Which table to pick from a workbook
///
/// With no fields set, the first table of the first worksheet (in workbook
/// order) that has one is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSelector {
    /// Only consider tables on this worksheet
    pub sheet: Option<String>,
    /// Only consider tables with this name or display name
    pub table: Option<String>,
}

/// A workbook read fully into memory
#[derive(Debug, Clone, Default)]
pub struct XlsxDocument {
    pub(crate) worksheets: Vec<Worksheet>,
    pub(crate) shared_strings: Option<SharedStringTable>,
}

impl XlsxDocument {
    /// Read a workbook from a file path
    ///
    /// The file is closed before this returns, whether reading succeeded or not.
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        XlsxReader::read_file(path)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Self> {
        XlsxReader::read(reader)
    }

    /// Worksheet names in workbook order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.worksheets.iter().map(Worksheet::name)
    }

    /// Number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> XlsxResult<&Worksheet> {
        self.worksheets
            .iter()
            .find(|ws| ws.name() == name)
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))
    }

    /// The shared string table, if the workbook has one
    pub fn shared_strings(&self) -> Option<&SharedStringTable> {
        self.shared_strings.as_ref()
    }

    /// All tables in document order, with the worksheet each belongs to
    pub fn tables(&self) -> impl Iterator<Item = (&Worksheet, &TableDefinition)> {
        self.worksheets
            .iter()
            .flat_map(|ws| ws.tables().iter().map(move |table| (ws, table)))
    }

    /// Pick one table according to `selector`
    pub fn select_table(
        &self,
        selector: &TableSelector,
    ) -> XlsxResult<(&Worksheet, &TableDefinition)> {
        let sheets: Vec<&Worksheet> = match selector.sheet.as_deref() {
            Some(name) => vec![self.worksheet_by_name(name)?],
            None => self.worksheets.iter().collect(),
        };

        let found = sheets
            .into_iter()
            .flat_map(|ws| ws.tables().iter().map(move |table| (ws, table)))
            .find(|(_, table)| {
                selector
                    .table
                    .as_deref()
                    .map_or(true, |name| table.matches_name(name))
            });

        match found {
            Some((ws, table)) => {
                log::debug!(
                    "Selected table '{}' ({}) on sheet '{}'",
                    table.display_name,
                    table.reference,
                    ws.name()
                );
                Ok((ws, table))
            }
            None => Err(XlsxError::NoTable(describe_selector(selector))),
        }
    }
}

fn describe_selector(selector: &TableSelector) -> String {
    match (&selector.sheet, &selector.table) {
        (Some(sheet), Some(table)) => format!("no table '{}' on sheet '{}'", table, sheet),
        (Some(sheet), None) => format!("sheet '{}' has no tables", sheet),
        (None, Some(table)) => format!("no table named '{}' in the workbook", table),
        (None, None) => "the workbook has no tables".to_string(),
    }
}
