//! Tests for finding worksheets and table parts.

use crate::{two_by_two, SheetFixture, WorkbookFixture};
use pretty_assertions::assert_eq;
use tabledump_xlsx::{TableSelector, XlsxDocument, XlsxError};

#[test]
fn test_first_table_of_first_sheet() {
    let file = two_by_two().write_temp();
    let doc = XlsxDocument::open(file.path()).unwrap();

    let (sheet, table) = doc.select_table(&TableSelector::default()).unwrap();
    assert_eq!(sheet.name(), "Data");
    assert_eq!(table.name, "People");
    assert_eq!(table.reference, "A1:B2");
    assert_eq!(table.header_row_count, 1);
    assert_eq!(table.totals_row_count, 0);
    assert_eq!(table.range().unwrap().bounds(), (1, 1, 2, 2));
}

#[test]
fn test_first_table_wins_over_later_ones() {
    let file = WorkbookFixture::new()
        .sheet(
            SheetFixture::new("One", "")
                .with_table("First", "A1:B2")
                .with_table("Second", "D1:E9"),
        )
        .sheet(SheetFixture::new("Two", "").with_table("Third", "A1:A3"))
        .write_temp();
    let doc = XlsxDocument::open(file.path()).unwrap();

    let names: Vec<_> = doc.tables().map(|(_, t)| t.name.as_str()).collect();
    assert_eq!(names, ["First", "Second", "Third"]);

    let (_, table) = doc.select_table(&TableSelector::default()).unwrap();
    assert_eq!(table.name, "First");
}

#[test]
fn test_first_sheet_without_tables_is_skipped() {
    let file = WorkbookFixture::new()
        .sheet(SheetFixture::new("Cover", ""))
        .sheet(SheetFixture::new("Data", "").with_table("Only", "B2:C5"))
        .write_temp();
    let doc = XlsxDocument::open(file.path()).unwrap();

    let (sheet, table) = doc.select_table(&TableSelector::default()).unwrap();
    assert_eq!(sheet.name(), "Data");
    assert_eq!(table.name, "Only");
}

#[test]
fn test_select_named_table() {
    let file = WorkbookFixture::new()
        .sheet(SheetFixture::new("One", "").with_table("First", "A1:B2"))
        .sheet(SheetFixture::new("Two", "").with_table("Third", "A1:A3"))
        .write_temp();
    let doc = XlsxDocument::open(file.path()).unwrap();

    let selector = TableSelector {
        sheet: None,
        table: Some("third".to_string()),
    };
    let (sheet, table) = doc.select_table(&selector).unwrap();
    assert_eq!(sheet.name(), "Two");
    assert_eq!(table.reference, "A1:A3");
}

#[test]
fn test_table_row_counts() {
    let file = WorkbookFixture::new()
        .sheet(SheetFixture::new("S", "").with_table_attrs(
            "Totals",
            "A1:C10",
            r#"headerRowCount="0" totalsRowCount="1""#,
        ))
        .write_temp();
    let doc = XlsxDocument::open(file.path()).unwrap();

    let (_, table) = doc.select_table(&TableSelector::default()).unwrap();
    assert_eq!(table.header_row_count, 0);
    assert_eq!(table.totals_row_count, 1);
}

#[test]
fn test_table_part_with_end_tag() {
    let file = WorkbookFixture::new()
        .sheet(
            SheetFixture::new("S", r#"<row r="1"><c r="A1"><v>1</v></c></row>"#)
                .with_table("Tagged", "A1:A1")
                .with_expanded_table_parts(),
        )
        .write_temp();
    let doc = XlsxDocument::open(file.path()).unwrap();

    assert_eq!(doc.tables().count(), 1);
    let (sheet, table) = doc.select_table(&TableSelector::default()).unwrap();
    assert_eq!(sheet.name(), "S");
    assert_eq!(table.name, "Tagged");
}

#[test]
fn test_workbook_without_tables() {
    let file = WorkbookFixture::new()
        .sheet(SheetFixture::new("Sheet1", r#"<row r="1"><c r="A1"><v>1</v></c></row>"#))
        .write_temp();
    let doc = XlsxDocument::open(file.path()).unwrap();

    assert!(matches!(
        doc.select_table(&TableSelector::default()),
        Err(XlsxError::NoTable(_))
    ));
}

#[test]
fn test_sheet_lookup() {
    let file = two_by_two().write_temp();
    let doc = XlsxDocument::open(file.path()).unwrap();

    assert_eq!(doc.sheet_count(), 1);
    assert_eq!(doc.worksheet_by_name("Data").unwrap().name(), "Data");
    assert!(matches!(
        doc.worksheet_by_name("Missing"),
        Err(XlsxError::SheetNotFound(name)) if name == "Missing"
    ));
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        XlsxDocument::open(dir.path().join("absent.xlsx")),
        Err(XlsxError::Io(_))
    ));
}
