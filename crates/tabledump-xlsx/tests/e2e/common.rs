//! Common utilities for E2E tests: a small OOXML package builder.

use std::io::{Cursor, Write};

use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// A table part to attach to a fixture sheet
pub struct TableFixture {
    pub name: &'static str,
    pub reference: &'static str,
    /// Extra attributes for the `<table>` element, e.g. `headerRowCount="0"`
    pub extra_attrs: &'static str,
}

/// One worksheet of a fixture workbook
pub struct SheetFixture {
    pub name: &'static str,
    /// Raw `<row>` elements placed inside `<sheetData>`
    pub rows: &'static str,
    pub tables: Vec<TableFixture>,
    /// Write `<tablePart ...></tablePart>` instead of `<tablePart .../>`
    pub expanded_table_parts: bool,
}

impl SheetFixture {
    pub fn new(name: &'static str, rows: &'static str) -> Self {
        Self {
            name,
            rows,
            tables: Vec::new(),
            expanded_table_parts: false,
        }
    }

    pub fn with_table(mut self, name: &'static str, reference: &'static str) -> Self {
        self.tables.push(TableFixture {
            name,
            reference,
            extra_attrs: "",
        });
        self
    }

    pub fn with_expanded_table_parts(mut self) -> Self {
        self.expanded_table_parts = true;
        self
    }

    pub fn with_table_attrs(
        mut self,
        name: &'static str,
        reference: &'static str,
        extra_attrs: &'static str,
    ) -> Self {
        self.tables.push(TableFixture {
            name,
            reference,
            extra_attrs,
        });
        self
    }
}

/// A workbook assembled part by part
#[derive(Default)]
pub struct WorkbookFixture {
    pub sheets: Vec<SheetFixture>,
    pub shared_strings: Option<Vec<&'static str>>,
}

impl WorkbookFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, sheet: SheetFixture) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn shared_strings(mut self, strings: Vec<&'static str>) -> Self {
        self.shared_strings = Some(strings);
        self
    }

    /// Build the package bytes
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();
            let mut put = |path: &str, content: String| {
                zip.start_file(path, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            };

            put(
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/></Types>"#.to_string(),
            );
            put(
                "_rels/.rels",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
                ),
            );

            let mut sheets_xml = String::new();
            let mut workbook_rels = String::new();
            for (i, sheet) in self.sheets.iter().enumerate() {
                let n = i + 1;
                sheets_xml.push_str(&format!(
                    r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
                    sheet.name
                ));
                workbook_rels.push_str(&format!(
                    r#"<Relationship Id="rId{n}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{n}.xml"/>"#
                ));
            }
            if self.shared_strings.is_some() {
                workbook_rels.push_str(&format!(
                    r#"<Relationship Id="rIdSst" Type="{REL_NS}/sharedStrings" Target="sharedStrings.xml"/>"#
                ));
            }

            put(
                "xl/workbook.xml",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets>{sheets_xml}</sheets></workbook>"#
                ),
            );
            put(
                "xl/_rels/workbook.xml.rels",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="{PKG_REL_NS}">{workbook_rels}</Relationships>"#
                ),
            );

            let mut table_no = 0;
            for (i, sheet) in self.sheets.iter().enumerate() {
                let n = i + 1;
                let mut table_parts = String::new();
                let mut sheet_rels = String::new();

                for (j, table) in sheet.tables.iter().enumerate() {
                    table_no += 1;
                    let id = j + 1;
                    if sheet.expanded_table_parts {
                        table_parts
                            .push_str(&format!(r#"<tablePart r:id="rId{id}"></tablePart>"#));
                    } else {
                        table_parts.push_str(&format!(r#"<tablePart r:id="rId{id}"/>"#));
                    }
                    sheet_rels.push_str(&format!(
                        r#"<Relationship Id="rId{id}" Type="{REL_NS}/table" Target="../tables/table{table_no}.xml"/>"#
                    ));
                    put(
                        &format!("xl/tables/table{table_no}.xml"),
                        format!(
                            r#"<?xml version="1.0" encoding="UTF-8"?><table xmlns="{MAIN_NS}" id="{table_no}" name="{name}" displayName="{name}" ref="{reference}" {extra}><autoFilter ref="{reference}"/><tableColumns count="1"><tableColumn id="1" name="Column1"/></tableColumns></table>"#,
                            name = table.name,
                            reference = table.reference,
                            extra = table.extra_attrs,
                        ),
                    );
                }

                if !sheet.tables.is_empty() {
                    table_parts = format!(
                        r#"<tableParts count="{}">{table_parts}</tableParts>"#,
                        sheet.tables.len()
                    );
                    put(
                        &format!("xl/worksheets/_rels/sheet{n}.xml.rels"),
                        format!(
                            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="{PKG_REL_NS}">{sheet_rels}</Relationships>"#
                        ),
                    );
                }

                put(
                    &format!("xl/worksheets/sheet{n}.xml"),
                    format!(
                        r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheetData>{rows}</sheetData>{table_parts}</worksheet>"#,
                        rows = sheet.rows
                    ),
                );
            }

            if let Some(strings) = &self.shared_strings {
                let items: String = strings
                    .iter()
                    .map(|s| format!(r#"<si><t xml:space="preserve">{s}</t></si>"#))
                    .collect();
                put(
                    "xl/sharedStrings.xml",
                    format!(
                        r#"<?xml version="1.0" encoding="UTF-8"?><sst xmlns="{MAIN_NS}" count="{n}" uniqueCount="{n}">{items}</sst>"#,
                        n = strings.len()
                    ),
                );
            }

            zip.finish().unwrap();
        }
        buf
    }

    /// Build the package and write it to a temp file
    pub fn write_temp(&self) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".xlsx")
            .tempfile()
            .unwrap();
        file.write_all(&self.build()).unwrap();
        file.flush().unwrap();
        file
    }
}

/// The 2x2 table used across tests:
///
/// |   | A             | B     |
/// |---|---------------|-------|
/// | 1 | "Name" (sst)  | FALSE |
/// | 2 | 42            | "Bob" (sst) |
pub fn two_by_two() -> WorkbookFixture {
    WorkbookFixture::new()
        .shared_strings(vec!["Name", "Bob"])
        .sheet(
            SheetFixture::new(
                "Data",
                r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="b"><v>0</v></c></row><row r="2"><c r="A2"><v>42</v></c><c r="B2" t="s"><v>1</v></c></row>"#,
            )
            .with_table("People", "A1:B2"),
        )
}
