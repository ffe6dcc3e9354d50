//! Minimal SpreadsheetML writer: one worksheet, inline strings, no styles.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::Result;
use crate::export::escape_markup;
use crate::models::{Cell, UserRecord};

const CONTENT_TYPES_XML: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\n  <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\n  <Default Extension=\"xml\" ContentType=\"application/xml\"/>\n  <Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\n  <Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\n</Types>";

const ROOT_RELS_XML: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\n  <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>\n</Relationships>";

const WORKBOOK_XML: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\n  <sheets>\n    <sheet name=\"Sheet1\" sheetId=\"1\" r:id=\"rId1\"/>\n  </sheets>\n</workbook>";

const WORKBOOK_RELS_XML: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\n  <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet1.xml\"/>\n</Relationships>";

pub fn render(records: &[UserRecord]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML)?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS_XML)?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(WORKBOOK_XML)?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(WORKBOOK_RELS_XML)?;

    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    zip.write_all(sheet_xml(records).as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

fn sheet_xml(records: &[UserRecord]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\n  <sheetData>\n",
    );

    let header: Vec<Cell> = UserRecord::COLUMNS
        .iter()
        .map(|c| Cell::Text(c.to_string()))
        .collect();
    push_row(&mut xml, 1, &header);

    for (i, record) in records.iter().enumerate() {
        push_row(&mut xml, i + 2, &record.cells());
    }

    xml.push_str("  </sheetData>\n</worksheet>");
    xml
}

fn push_row(xml: &mut String, row: usize, cells: &[Cell]) {
    xml.push_str(&format!("    <row r=\"{}\">", row));
    for (col, cell) in cells.iter().enumerate() {
        let reference = format!("{}{}", column_name(col), row);
        match cell {
            Cell::Null => {}
            Cell::Integer(n) => xml.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", reference, n)),
            Cell::Float(f) => xml.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", reference, f)),
            Cell::Text(s) | Cell::Nested(s) => xml.push_str(&format!(
                "<c r=\"{}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                reference,
                escape_markup(s)
            )),
        }
    }
    xml.push_str("</row>\n");
}

/// Zero-based column index to spreadsheet letters: 0 → A, 25 → Z, 26 → AA.
fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}
