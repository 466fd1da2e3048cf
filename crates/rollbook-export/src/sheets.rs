//! XLSX workbooks. These are built in memory, so callers bound the row count.

use rollbook_models::Student;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

use crate::columns::{Column, LISTING_COLUMNS, STUDENT_COLUMNS};
use crate::documents::DocumentHeader;
use crate::error::ExportError;

fn write_header(
    sheet: &mut Worksheet,
    row: u32,
    columns: &[Column],
    bold: &Format,
) -> Result<(), ExportError> {
    for (col, column) in columns.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, column.width)?;
        sheet.write_string_with_format(row, col, column.label, bold)?;
    }
    Ok(())
}

fn write_rows(
    sheet: &mut Worksheet,
    first_row: u32,
    columns: &[Column],
    students: &[Student],
) -> Result<(), ExportError> {
    for (offset, student) in students.iter().enumerate() {
        let row = first_row + offset as u32;
        for (col, column) in columns.iter().enumerate() {
            sheet.write_string(row, col as u16, (column.value)(student))?;
        }
    }
    Ok(())
}

fn save(sheet: Worksheet) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    workbook.push_worksheet(sheet);
    Ok(workbook.save_to_buffer()?)
}

/// One sheet named "Students": a bold header row, then one row per student.
pub fn student_workbook(students: &[Student]) -> Result<Vec<u8>, ExportError> {
    let bold = Format::new().set_bold();
    let mut sheet = Worksheet::new();
    sheet.set_name("Students")?;

    write_header(&mut sheet, 0, &STUDENT_COLUMNS, &bold)?;
    if students.is_empty() {
        sheet.write_string(1, 0, "No student records found.")?;
    }
    write_rows(&mut sheet, 1, &STUDENT_COLUMNS, students)?;
    save(sheet)
}

/// Listing report: merged title, generation time, bold headers on row 4 and
/// data from row 5.
pub fn listing_workbook(
    header: &DocumentHeader,
    students: &[Student],
) -> Result<Vec<u8>, ExportError> {
    let last_col = (LISTING_COLUMNS.len() - 1) as u16;
    let bold = Format::new().set_bold();
    let title = Format::new()
        .set_bold()
        .set_font_size(16)
        .set_align(FormatAlign::Center);
    let centered = Format::new().set_align(FormatAlign::Center);

    let mut sheet = Worksheet::new();
    sheet.set_name(sheet_name(&header.title))?;
    sheet.merge_range(0, 0, 0, last_col, &header.title, &title)?;
    sheet.merge_range(
        1,
        0,
        1,
        last_col,
        &format!(
            "Generated on: {}",
            header.generated_at.format("%Y-%m-%d %H:%M UTC")
        ),
        &centered,
    )?;

    write_header(&mut sheet, 3, &LISTING_COLUMNS, &bold)?;
    if students.is_empty() {
        sheet.write_string(4, 0, "No students found matching the criteria.")?;
    }
    write_rows(&mut sheet, 4, &LISTING_COLUMNS, students)?;
    save(sheet)
}

/// Worksheet names are limited to 31 characters and a few reserved symbols.
fn sheet_name(title: &str) -> String {
    title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::student;
    use chrono::Utc;

    const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

    #[test]
    fn test_student_workbook_is_a_zip() {
        let students: Vec<_> = (1..=5).map(student).collect();
        let bytes = student_workbook(&students).unwrap();
        assert!(bytes.starts_with(ZIP_MAGIC));
    }

    #[test]
    fn test_empty_student_workbook() {
        let bytes = student_workbook(&[]).unwrap();
        assert!(bytes.starts_with(ZIP_MAGIC));
    }

    #[test]
    fn test_listing_workbook() {
        let header = DocumentHeader::new("School", "Student Listing Report", Utc::now());
        let bytes = listing_workbook(&header, &[student(1), student(2)]).unwrap();
        assert!(bytes.starts_with(ZIP_MAGIC));
    }

    #[test]
    fn test_sheet_name_is_sanitized() {
        assert_eq!(sheet_name("Report: 2024/25"), "Report 202425");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
    }
}
