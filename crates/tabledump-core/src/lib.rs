//! # tabledump-core
//!
//! Addressing types shared by the tabledump crates.
//!
//! - [`column_letters_to_index`] / [`index_to_column_letters`] - column labels as
//!   bijective base-26 numerals (A=1, Z=26, AA=27, ...)
//! - [`CellAddress`] - a single "C7"-style address
//! - [`TableRange`] - an inclusive "A1:D10"-style rectangle
//!
//! Column and row indexes are 1-based throughout, the same way they appear in
//! the A1 notation itself.
//!
//! ## Example
//!
//! ```rust
//! use tabledump_core::{CellAddress, TableRange};
//!
//! let range = TableRange::parse("B2:C3").unwrap();
//! assert_eq!(range.bounds(), (2, 2, 3, 3));
//!
//! let cells: Vec<String> = range.cells().map(|a| a.to_string()).collect();
//! assert_eq!(cells, ["B2", "C2", "B3", "C3"]);
//!
//! assert_eq!(CellAddress::new(28, 7).unwrap().to_string(), "AB7");
//! ```

pub mod address;
pub mod error;
pub mod range;

pub use address::{column_letters_to_index, index_to_column_letters, CellAddress};
pub use error::{Error, Result};
pub use range::{TableRange, TableRangeIter};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit, "XFD")
pub const MAX_COLS: u32 = 16_384;
