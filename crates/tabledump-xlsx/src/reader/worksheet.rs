//! Worksheet part: cells and table part references

use std::io::{BufReader, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tabledump_core::{CellAddress, MAX_ROWS};

use super::decode_excel_escapes;
use crate::document::{CellType, RawCell, Worksheet};
use crate::error::{XlsxError, XlsxResult};

/// Cell being assembled between `<c>` and `</c>`
struct PendingCell {
    address: CellAddress,
    cell_type: CellType,
    text: String,
}

/// Read the cells of a worksheet part into `worksheet`
///
/// Returns the relationship ids of the `<tablePart>` elements, in document order.
pub(crate) fn read_worksheet<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    path: &str,
    worksheet: &mut Worksheet,
) -> XlsxResult<Vec<String>> {
    let file = archive
        .by_name(path)
        .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

    let reader = BufReader::new(file);
    let mut xml_reader = Reader::from_reader(reader);
    // Whitespace inside <v> and <t> is significant
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut table_ids = Vec::new();

    // Row and column of the last element seen, for cells without an `r` attribute
    let mut current_row: u32 = 0;
    let mut last_col: u32 = 0;

    let mut pending: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline_str = false;
    let mut in_inline_text = false;
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_number(&e, current_row)?;
                    last_col = 0;
                }
                b"c" => {
                    let (address, cell_type) = cell_start(&e, current_row, last_col, path)?;
                    current_row = address.row();
                    last_col = address.col();
                    pending = Some(PendingCell {
                        address,
                        cell_type,
                        text: String::new(),
                    });
                }
                b"tablePart" => table_ids.extend(table_part_id(&e)),
                b"v" if pending.is_some() => in_value = true,
                b"is" if pending.is_some() => in_inline_str = true,
                b"rPh" if in_inline_str => in_phonetic = true,
                b"t" if in_inline_str && !in_phonetic => in_inline_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_number(&e, current_row)?;
                    last_col = 0;
                }
                b"c" => {
                    // Empty cell element (usually only carries a style)
                    let (address, cell_type) = cell_start(&e, current_row, last_col, path)?;
                    current_row = address.row();
                    last_col = address.col();
                    worksheet.insert_cell(
                        address,
                        RawCell {
                            cell_type,
                            text: String::new(),
                        },
                    );
                }
                b"tablePart" => table_ids.extend(table_part_id(&e)),
                _ => {}
            },
            Ok(Event::Text(e)) if in_value || in_inline_text => {
                if let Some(cell) = pending.as_mut() {
                    cell.text.push_str(&e.unescape()?);
                }
            }
            Ok(Event::CData(e)) if in_value || in_inline_text => {
                if let Some(cell) = pending.as_mut() {
                    cell.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(cell) = pending.take() {
                        let text = match cell.cell_type {
                            CellType::InlineString | CellType::FormulaString => {
                                decode_excel_escapes(&cell.text)
                            }
                            _ => cell.text,
                        };
                        worksheet.insert_cell(
                            cell.address,
                            RawCell {
                                cell_type: cell.cell_type,
                                text,
                            },
                        );
                    }
                    in_value = false;
                    in_inline_str = false;
                    in_inline_text = false;
                    in_phonetic = false;
                }
                b"v" => in_value = false,
                b"is" => in_inline_str = false,
                b"rPh" => in_phonetic = false,
                b"t" => in_inline_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(table_ids)
}

/// Relationship id (`r:id`) of a `<tablePart>` element
fn table_part_id(e: &BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"id")
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

/// Row number of a `<row>` element; rows without `r` follow the previous one
///
/// The result is always within `1..=MAX_ROWS`.
fn row_number(e: &BytesStart, previous: u32) -> XlsxResult<u32> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"r" {
            let value = attr.unescape_value()?;
            return match value.parse::<u32>() {
                Ok(row) if (1..=MAX_ROWS).contains(&row) => Ok(row),
                _ => Err(XlsxError::Parse(format!("Invalid row number '{}'", value))),
            };
        }
    }

    previous
        .checked_add(1)
        .filter(|row| *row <= MAX_ROWS)
        .ok_or_else(|| {
            XlsxError::Parse(format!("Row after row {} is past the last row", previous))
        })
}

/// Address and type of a `<c>` element
///
/// Cells without `r` sit one column to the right of the previous cell in the row.
fn cell_start(
    e: &BytesStart,
    current_row: u32,
    last_col: u32,
    path: &str,
) -> XlsxResult<(CellAddress, CellType)> {
    let mut reference: Option<String> = None;
    let mut type_attr: Option<String> = None;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => reference = attr.unescape_value().ok().map(|s| s.to_string()),
            b"t" => type_attr = attr.unescape_value().ok().map(|s| s.to_string()),
            _ => {}
        }
    }

    let address = match reference {
        Some(reference) => CellAddress::parse(&reference).map_err(|e| {
            XlsxError::Parse(format!("Invalid cell reference '{}': {}", reference, e))
        })?,
        None => {
            log::warn!(
                "Cell without reference in {}, placing it after column {} of row {}",
                path,
                last_col,
                current_row
            );
            CellAddress::new(last_col + 1, current_row.max(1))?
        }
    };

    Ok((address, CellType::from_xlsx(type_attr.as_deref())))
}
