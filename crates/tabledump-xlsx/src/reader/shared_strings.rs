//! Shared string table part

use std::io::{BufReader, Read};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use super::decode_excel_escapes;
use crate::document::SharedStringTable;
use crate::error::{XlsxError, XlsxResult};

/// Read every `<si>` entry of a shared string part
///
/// Rich text runs are concatenated; phonetic (`<rPh>`) runs are skipped.
pub(crate) fn read_shared_strings<R: Read>(file: R) -> XlsxResult<SharedStringTable> {
    let reader = BufReader::new(file);
    let mut xml_reader = Reader::from_reader(reader);
    // Leading and trailing spaces of <t> are part of the string
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current_string = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current_string.clear();
                }
                b"rPh" if in_si => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(decode_excel_escapes(&current_string));
                    current_string.clear();
                    in_si = false;
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_t => {
                current_string.push_str(&e.unescape()?);
            }
            Ok(Event::CData(e)) if in_t => {
                current_string.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(SharedStringTable::new(strings))
}
