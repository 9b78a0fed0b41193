//! Rectangular table ranges ("A1:D10")

use crate::address::{column_letters_to_index, index_to_column_letters, CellAddress};
use crate::error::{Error, Result};
use crate::MAX_ROWS;
use lazy_regex::regex_captures;
use std::fmt;
use std::str::FromStr;

/// An inclusive rectangular region given by its top-left and bottom-right corners
///
/// Unlike a normalized selection, the bounds are kept exactly as written: a range
/// whose start lies past its end is valid and simply contains no cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableRange {
    col_start: u32,
    row_start: u32,
    col_end: u32,
    row_end: u32,
}

impl TableRange {
    /// Create a range from its two corners
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self {
            col_start: start.col(),
            row_start: start.row(),
            col_end: end.col(),
            row_end: end.row(),
        }
    }

    /// Parse a range from `A1:D10` notation
    ///
    /// Each side is an optional run of letters followed by an optional run of
    /// digits; missing pieces are reported when they are converted. `$` markers
    /// are accepted.
    ///
    /// # Examples
    /// ```
    /// use tabledump_core::{Error, TableRange};
    ///
    /// let range = TableRange::parse("B2:D4").unwrap();
    /// assert_eq!(range.bounds(), (2, 2, 4, 4));
    ///
    /// assert!(matches!(TableRange::parse("A1-D4"), Err(Error::MalformedRange(_))));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        let (_, col_start, row_start, col_end, row_end) = regex_captures!(
            r"^\$?([A-Za-z]*)\$?([0-9]*):\$?([A-Za-z]*)\$?([0-9]*)$",
            s
        )
        .ok_or_else(|| Error::MalformedRange(format!("'{}' is not of the form A1:D10", s)))?;

        Ok(Self {
            col_start: column_letters_to_index(col_start)?,
            row_start: parse_row(row_start, s)?,
            col_end: column_letters_to_index(col_end)?,
            row_end: parse_row(row_end, s)?,
        })
    }

    /// `(col_start, row_start, col_end, row_end)`, all 1-based
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (self.col_start, self.row_start, self.col_end, self.row_end)
    }

    /// True when the bounds are reversed in either direction
    pub fn is_empty(&self) -> bool {
        self.col_start > self.col_end || self.row_start > self.row_end
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.row_end - self.row_start + 1
        }
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.col_end - self.col_start + 1
        }
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// The range left after dropping `header_rows` rows from the top and
    /// `totals_rows` rows from the bottom
    ///
    /// Dropping more rows than the range holds gives an empty range.
    pub fn body(&self, header_rows: u32, totals_rows: u32) -> Self {
        Self {
            row_start: self.row_start.saturating_add(header_rows),
            row_end: self.row_end.saturating_sub(totals_rows),
            ..*self
        }
    }

    /// Iterate over all cell addresses in the range, row by row
    pub fn cells(&self) -> TableRangeIter {
        TableRangeIter {
            range: *self,
            current_row: self.row_start,
            current_col: self.col_start,
        }
    }

    /// Iterate over the rows of the range, each as its addresses left to right
    pub fn rows(&self) -> impl Iterator<Item = Vec<CellAddress>> + '_ {
        let rows = if self.is_empty() {
            1..=0
        } else {
            self.row_start..=self.row_end
        };

        rows.map(move |row| {
            (self.col_start..=self.col_end)
                .filter_map(|col| CellAddress::new(col, row).ok())
                .collect()
        })
    }

    /// Format as A1:D10 string
    pub fn to_a1_string(&self) -> String {
        format!(
            "{}{}:{}{}",
            letters_or_empty(self.col_start),
            self.row_start,
            letters_or_empty(self.col_end),
            self.row_end
        )
    }
}

fn letters_or_empty(col: u32) -> String {
    index_to_column_letters(col).unwrap_or_default()
}

/// Parse one digit group of a range; `range` is only used for messages.
fn parse_row(digits: &str, range: &str) -> Result<u32> {
    if digits.is_empty() {
        return Err(Error::MalformedRange(format!(
            "missing row number in '{}'",
            range
        )));
    }

    let row: u32 = digits
        .parse()
        .map_err(|_| Error::MalformedRange(format!("row number too large in '{}'", range)))?;

    if row == 0 {
        return Err(Error::MalformedRange(format!(
            "row number must be >= 1 in '{}'",
            range
        )));
    }
    if row > MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS));
    }

    Ok(row)
}

impl fmt::Display for TableRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for TableRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Iterator over cells in a range, row-major
pub struct TableRangeIter {
    range: TableRange,
    current_row: u32,
    current_col: u32,
}

impl TableRangeIter {
    fn remaining(&self) -> usize {
        if self.range.is_empty() || self.current_row > self.range.row_end {
            return 0;
        }
        let cols = self.range.col_count() as usize;
        let full_rows = (self.range.row_end - self.current_row) as usize;
        full_rows * cols + (self.range.col_end - self.current_col + 1) as usize
    }
}

impl Iterator for TableRangeIter {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.range.is_empty() || self.current_row > self.range.row_end {
            return None;
        }

        let addr = CellAddress::new(self.current_col, self.current_row).ok()?;

        // Move to next cell
        self.current_col += 1;
        if self.current_col > self.range.col_end {
            self.current_col = self.range.col_start;
            self.current_row += 1;
        }

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TableRangeIter {}
