//! Table definition parts (`xl/tables/tableN.xml`)

use std::io::{BufReader, Read, Seek};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::document::TableDefinition;
use crate::error::{XlsxError, XlsxResult};

/// Read the root `<table>` element of a table part
pub(crate) fn read_table<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    path: &str,
) -> XlsxResult<TableDefinition> {
    let file = archive
        .by_name(path)
        .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

    let reader = BufReader::new(file);
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"table" => {
                let mut name = None;
                let mut display_name = None;
                let mut reference = None;
                let mut header_row_count = 1;
                let mut totals_row_count = 0;

                for attr in e.attributes().flatten() {
                    let value = attr.unescape_value()?;
                    match attr.key.as_ref() {
                        b"name" => name = Some(value.to_string()),
                        b"displayName" => display_name = Some(value.to_string()),
                        b"ref" => reference = Some(value.to_string()),
                        b"headerRowCount" => header_row_count = parse_count(&value, path)?,
                        b"totalsRowCount" => totals_row_count = parse_count(&value, path)?,
                        _ => {}
                    }
                }

                let reference = reference.ok_or_else(|| {
                    XlsxError::CorruptDocument(format!("table part {} has no ref", path))
                })?;
                let display_name = display_name.or_else(|| name.clone()).unwrap_or_default();
                let name = name.unwrap_or_else(|| display_name.clone());

                return Ok(TableDefinition {
                    name,
                    display_name,
                    reference,
                    header_row_count,
                    totals_row_count,
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Err(XlsxError::CorruptDocument(format!(
        "table part {} has no <table> element",
        path
    )))
}

fn parse_count(value: &str, path: &str) -> XlsxResult<u32> {
    value
        .parse()
        .map_err(|_| XlsxError::Parse(format!("Invalid row count '{}' in {}", value, path)))
}
