//! Column letters and single-cell addresses

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Convert column letters to a 1-based column index (A = 1, Z = 26, AA = 27, etc.)
///
/// The letters are read as a bijective base-26 numeral, most significant
/// letter first. Lowercase letters are accepted.
///
/// # Examples
/// ```
/// use tabledump_core::column_letters_to_index;
///
/// assert_eq!(column_letters_to_index("A").unwrap(), 1);
/// assert_eq!(column_letters_to_index("az").unwrap(), 52);
/// assert!(column_letters_to_index("").is_err());
/// ```
pub fn column_letters_to_index(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidArgument("empty column letters".into()));
    }

    let mut index: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidArgument(format!(
                "invalid column letter '{}' in '{}'",
                c, letters
            )));
        }
        index = index * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);

        // Bail out before the accumulator can overflow on absurdly long input
        if index > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(letters.to_string(), MAX_COLS));
        }
    }

    Ok(index)
}

/// Convert a 1-based column index to letters (1 = A, 26 = Z, 27 = AA, etc.)
///
/// Exact inverse of [`column_letters_to_index`] for every index in `1..=MAX_COLS`.
pub fn index_to_column_letters(index: u32) -> Result<String> {
    if index == 0 {
        return Err(Error::InvalidArgument(
            "column index must be >= 1".into(),
        ));
    }
    if index > MAX_COLS {
        return Err(Error::ColumnOutOfBounds(index.to_string(), MAX_COLS));
    }

    Ok(encode_letters(index))
}

/// Bijective base-26 encoding; `index` must be non-zero.
fn encode_letters(index: u32) -> String {
    let mut result = String::new();
    let mut n = index;

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// A cell address (e.g., "C7")
///
/// Both coordinates are 1-based and always within the Excel sheet limits, so a
/// constructed address can always be rendered back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    row: u32,
    col: u32,
}

impl CellAddress {
    /// Create an address from a 1-based column index and a 1-based row number
    pub fn new(col: u32, row: u32) -> Result<Self> {
        if col == 0 {
            return Err(Error::InvalidArgument(
                "column index must be >= 1".into(),
            ));
        }
        if col > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col.to_string(), MAX_COLS));
        }
        if row == 0 {
            return Err(Error::InvalidAddress("row number must be >= 1".into()));
        }
        if row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }

        Ok(Self { row, col })
    }

    /// Parse a cell address from A1-style notation
    ///
    /// `$` absolute markers are accepted and dropped.
    ///
    /// # Examples
    /// ```
    /// use tabledump_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("C7").unwrap();
    /// assert_eq!(addr.col(), 3);
    /// assert_eq!(addr.row(), 7);
    ///
    /// let addr = CellAddress::parse("$AA$10").unwrap();
    /// assert_eq!(addr.col(), 27);
    /// assert_eq!(addr.row(), 10);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == col_start {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let col = column_letters_to_index(&s[col_start..pos])?;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::RowOutOfBounds(u32::MAX, MAX_ROWS))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        Self::new(col, row)
    }

    /// 1-based column index
    pub fn col(&self) -> u32 {
        self.col
    }

    /// 1-based row number
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column letters of this address
    pub fn column_letters(&self) -> String {
        encode_letters(self.col)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", self.column_letters(), self.row)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
