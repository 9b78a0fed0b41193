//! XLSX reader

mod shared_strings;
mod table;
mod worksheet;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::document::{Worksheet, XlsxDocument};
use crate::error::{XlsxError, XlsxResult};

const REL_OFFICE_DOCUMENT: &str = "/officeDocument";
const REL_WORKSHEET: &str = "/worksheet";
const REL_SHARED_STRINGS: &str = "/sharedStrings";
const REL_TABLE: &str = "/table";

const DEFAULT_WORKBOOK_PATH: &str = "xl/workbook.xml";

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut saw_x = false;
        let mut decoded = None;

        if chars.peek() == Some(&'x') {
            chars.next();
            saw_x = true;

            while hex_chars.len() < 4 {
                match chars.peek() {
                    Some(&ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                chars.next();
                decoded = u32::from_str_radix(&hex_chars, 16)
                    .ok()
                    .and_then(char::from_u32);
                if decoded.is_none() {
                    // Keep the closing underscore of an undecodable sequence
                    hex_chars.push('_');
                }
            }
        }

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                result.push('_');
                if saw_x {
                    result.push('x');
                }
                result.push_str(&hex_chars);
            }
        }
    }

    result
}

/// A relationship from a `.rels` part
#[derive(Debug, Clone)]
pub(crate) struct Relationship {
    pub(crate) rel_type: String,
    /// Package path of the target, already resolved against the source part
    pub(crate) target: String,
}

/// Resolve a relationship target against the part that owns the relationship
fn resolve_part_path(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rfind('/') {
        Some(i) => source_part[..i].split('/').collect(),
        None => Vec::new(),
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    segments.join("/")
}

/// Path of the `.rels` part that belongs to `part`
fn rels_path_for(part: &str) -> String {
    match part.rfind('/') {
        Some(i) => format!("{}/_rels/{}.rels", &part[..i], &part[i + 1..]),
        None => format!("_rels/{}.rels", part),
    }
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<XlsxDocument> {
        let path = path.as_ref();
        log::debug!("Opening '{}'", path.display());
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<XlsxDocument> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let workbook_path = Self::find_workbook_part(&mut archive)?;

        // Read workbook.xml to get sheet info
        let sheet_info = Self::read_workbook_xml(&mut archive, &workbook_path)?;

        // Read workbook.xml.rels to get sheet and shared string paths
        let workbook_rels = Self::read_relationships(&mut archive, &workbook_path)?
            .ok_or_else(|| XlsxError::MissingPart(rels_path_for(&workbook_path)))?;

        let shared_strings = Self::read_shared_strings(&mut archive, &workbook_path, &workbook_rels)?;

        let mut worksheets = Vec::with_capacity(sheet_info.len());
        for (name, r_id) in &sheet_info {
            let path = match workbook_rels.get(r_id) {
                Some(rel) if rel.rel_type.ends_with(REL_WORKSHEET) => &rel.target,
                // Chart sheets and dangling ids have no cells to read
                _ => {
                    log::debug!("Skipping sheet '{}' ({}): not a worksheet", name, r_id);
                    continue;
                }
            };

            let mut sheet = Worksheet::new(name.as_str());
            let table_ids = worksheet::read_worksheet(&mut archive, path, &mut sheet)?;

            if !table_ids.is_empty() {
                let sheet_rels = Self::read_relationships(&mut archive, path)?.unwrap_or_default();
                for id in &table_ids {
                    match sheet_rels.get(id) {
                        Some(rel) if rel.rel_type.ends_with(REL_TABLE) => {
                            let table = table::read_table(&mut archive, &rel.target)?;
                            sheet.push_table(table);
                        }
                        _ => {
                            return Err(XlsxError::CorruptDocument(format!(
                                "sheet '{}' references missing table part {}",
                                name, id
                            )))
                        }
                    }
                }
            }

            log::debug!(
                "Read sheet '{}' from {}: {} cells, {} tables",
                name,
                path,
                sheet.cell_count(),
                sheet.tables().len()
            );
            worksheets.push(sheet);
        }

        Ok(XlsxDocument {
            worksheets,
            shared_strings,
        })
    }

    /// Locate the main workbook part through `_rels/.rels`
    fn find_workbook_part<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<String> {
        let root_rels = Self::read_rels_part(archive, "_rels/.rels", "")?;

        let path = root_rels
            .and_then(|rels| {
                rels.into_values()
                    .find(|rel| rel.rel_type.ends_with(REL_OFFICE_DOCUMENT))
                    .map(|rel| rel.target)
            })
            .unwrap_or_else(|| DEFAULT_WORKBOOK_PATH.to_string());

        if archive.by_name(&path).is_err() {
            return Err(XlsxError::MissingPart(path));
        }

        Ok(path)
    }

    /// Read workbook.xml to get sheet names and rIds, in workbook order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        workbook_path: &str,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name(workbook_path)
            .map_err(|_| XlsxError::MissingPart(workbook_path.into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"sheet" =>
                {
                    let mut name = None;
                    let mut r_id = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.local_name().as_ref() {
                            b"name" => {
                                name = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"id" => {
                                r_id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    } else {
                        log::warn!("Ignoring <sheet> without name or r:id in {}", workbook_path);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read the relationships owned by `part`, keyed by relationship id
    ///
    /// Returns `None` when the part has no `.rels` part.
    pub(crate) fn read_relationships<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        part: &str,
    ) -> XlsxResult<Option<HashMap<String, Relationship>>> {
        Self::read_rels_part(archive, &rels_path_for(part), part)
    }

    fn read_rels_part<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        rels_path: &str,
        source_part: &str,
    ) -> XlsxResult<Option<HashMap<String, Relationship>>> {
        let file = match archive.by_name(rels_path) {
            Ok(f) => f,
            Err(_) => return Ok(None),
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => {
                                id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Target" => {
                                target = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Type" => {
                                rel_type = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"TargetMode" => {
                                external = attr
                                    .unescape_value()
                                    .ok()
                                    .map_or(false, |s| s.as_ref() == "External");
                            }
                            _ => {}
                        }
                    }

                    match (id, target, rel_type) {
                        (Some(id), Some(target), Some(rel_type)) if !external => {
                            let target = resolve_part_path(source_part, &target);
                            rels.insert(id, Relationship { rel_type, target });
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Some(rels))
    }

    /// Read the shared strings table, if the workbook has one
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        workbook_path: &str,
        workbook_rels: &HashMap<String, Relationship>,
    ) -> XlsxResult<Option<crate::SharedStringTable>> {
        let path = workbook_rels
            .values()
            .find(|rel| rel.rel_type.ends_with(REL_SHARED_STRINGS))
            .map(|rel| rel.target.clone())
            .unwrap_or_else(|| resolve_part_path(workbook_path, "sharedStrings.xml"));

        let file = match archive.by_name(&path) {
            Ok(f) => f,
            Err(_) => {
                log::debug!("No shared string table at {}", path);
                return Ok(None);
            }
        };

        let table = shared_strings::read_shared_strings(file)?;
        log::debug!("Read {} shared strings from {}", table.len(), path);
        Ok(Some(table))
    }
}
