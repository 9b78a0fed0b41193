//! End-to-end tests for tabledump-xlsx.
//!
//! Each test builds the exact workbook it needs as an in-memory OOXML package
//! (see [`common::WorkbookFixture`]), writes it to a temp file, then reads it
//! back with `XlsxDocument` and asserts.

mod common;

pub use common::*;
