//! # tabledump-xlsx
//!
//! Reads the parts of an XLSX (Office Open XML) package needed to print a
//! table: worksheets, their table definitions, cells and the shared string
//! table. [`CellResolver`] turns raw cells into display text.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tabledump_xlsx::{CellResolver, TableSelector, XlsxDocument};
//!
//! let document = XlsxDocument::open("report.xlsx")?;
//! let (sheet, table) = document.select_table(&TableSelector::default())?;
//! let range = table.range()?;
//!
//! let resolver = CellResolver::new(&document);
//! for value in resolver.resolve_range(sheet, &range)? {
//!     println!("{}", value);
//! }
//! # Ok::<(), tabledump_xlsx::XlsxError>(())
//! ```

pub mod document;
pub mod error;
pub mod reader;
pub mod resolve;

pub use document::{
    CellType, RawCell, SharedStringTable, TableDefinition, TableSelector, Worksheet,
    XlsxDocument,
};
pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use resolve::{CellResolver, CellValue, MissingCellPolicy};
