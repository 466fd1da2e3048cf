//! Student PDF documents.
//!
//! Both layouts open with the same header block and then take one record at a
//! time, returning whatever bytes became final. A page is only emitted once
//! nothing more will be drawn on it.

use chrono::{DateTime, Utc};
use rollbook_models::Student;

use crate::columns::{STUDENT_COLUMNS, added_by};
use crate::pdf::{Page, PdfWriter, TextStyle};

const INSTITUTION: TextStyle = TextStyle::new(25.0).bold().centered();
const TITLE: TextStyle = TextStyle::new(18.0).centered();
const GENERATED: TextStyle = TextStyle::new(12.0).centered();
const HEADING: TextStyle = TextStyle::new(16.0).bold().underlined();
const BODY: TextStyle = TextStyle::new(12.0);
const ENTRY: TextStyle = TextStyle::new(14.0).bold();
const FOOTNOTE: TextStyle = TextStyle::new(10.0);
const NOTICE: TextStyle = TextStyle::new(12.0).centered();

/// Text printed at the top of the first page.
#[derive(Debug, Clone)]
pub struct DocumentHeader {
    pub institution: String,
    pub title: String,
    pub generated_at: DateTime<Utc>,
}

impl DocumentHeader {
    pub fn new(
        institution: impl Into<String>,
        title: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            institution: institution.into(),
            title: title.into(),
            generated_at,
        }
    }
}

/// A PDF rendered incrementally from a stream of students.
///
/// Call [`begin`](Self::begin) once, [`push`](Self::push) per record and
/// [`finish`](Self::finish) once. Concatenating every returned chunk in order
/// yields the complete file.
pub trait RecordDocument: Send {
    fn begin(&mut self) -> Vec<u8>;
    fn push(&mut self, student: &Student) -> Vec<u8>;
    fn finish(&mut self) -> Vec<u8>;
    fn records(&self) -> usize;
}

/// Shared page handling for both layouts.
struct Composer {
    writer: PdfWriter,
    page: Page,
    header: DocumentHeader,
}

impl Composer {
    fn new(header: DocumentHeader) -> Self {
        Self {
            writer: PdfWriter::new(header.title.clone(), header.generated_at),
            page: Page::new(),
            header,
        }
    }

    fn begin(&mut self) -> Vec<u8> {
        let out = self.writer.begin();
        let header = &self.header;
        self.page.text(&header.institution, INSTITUTION);
        self.page.gap(6.0);
        self.page.text(&header.title, TITLE);
        self.page.gap(4.0);
        self.page.text(
            &format!(
                "Generated on: {}",
                header.generated_at.format("%Y-%m-%d %H:%M UTC")
            ),
            GENERATED,
        );
        self.page.gap(24.0);
        out
    }

    /// Emits the current page and starts a fresh one.
    fn break_page(&mut self) -> Vec<u8> {
        let out = self.writer.page(&self.page);
        self.page = Page::new();
        out
    }

    fn ensure_room(&mut self, height: f32, out: &mut Vec<u8>) {
        if !self.page.fits(height) && !self.page.is_blank() {
            out.extend(self.break_page());
        }
    }

    /// Writes one line block, moving to a new page first when it would not fit.
    fn text(&mut self, text: &str, style: TextStyle, out: &mut Vec<u8>) {
        self.ensure_room(Page::measure(text, style), out);
        self.page.text(text, style);
    }

    fn finish(&mut self) -> Vec<u8> {
        let mut out = self.writer.page(&self.page);
        out.extend(self.writer.finish());
        out
    }
}

/// One section per student with every field, each student after the first
/// on a new page.
pub struct StudentDocument {
    composer: Composer,
    records: usize,
}

impl StudentDocument {
    pub fn new(header: DocumentHeader) -> Self {
        Self {
            composer: Composer::new(header),
            records: 0,
        }
    }
}

impl RecordDocument for StudentDocument {
    fn begin(&mut self) -> Vec<u8> {
        self.composer.begin()
    }

    fn push(&mut self, student: &Student) -> Vec<u8> {
        let mut out = Vec::new();
        let c = &mut self.composer;
        if self.records > 0 {
            out.extend(c.break_page());
        }

        c.text(&format!("Student Details: {}", student.name), HEADING, &mut out);
        c.page.gap(8.0);
        for column in STUDENT_COLUMNS.iter() {
            let line = format!("{}: {}", column.label, (column.value)(student));
            c.text(&line, BODY, &mut out);
            c.page.gap(4.0);
        }
        c.page.gap(10.0);
        c.text(&format!("Added by: {}", added_by(student)), FOOTNOTE, &mut out);

        self.records += 1;
        out
    }

    fn finish(&mut self) -> Vec<u8> {
        if self.records == 0 {
            self.composer.page.text("No student records found.", NOTICE);
        }
        self.composer.finish()
    }

    fn records(&self) -> usize {
        self.records
    }
}

/// Numbered summary entries, flowing onto new pages as needed.
pub struct ListingDocument {
    composer: Composer,
    records: usize,
}

impl ListingDocument {
    pub fn new(header: DocumentHeader) -> Self {
        Self {
            composer: Composer::new(header),
            records: 0,
        }
    }

    fn entry_height() -> f32 {
        ENTRY.line_height() + 2.0 * BODY.line_height() + 10.0
    }
}

impl RecordDocument for ListingDocument {
    fn begin(&mut self) -> Vec<u8> {
        let out = self.composer.begin();
        self.composer.page.text("Student Listing", HEADING);
        self.composer.page.gap(10.0);
        out
    }

    fn push(&mut self, student: &Student) -> Vec<u8> {
        let mut out = Vec::new();
        let c = &mut self.composer;
        c.ensure_room(Self::entry_height(), &mut out);

        let title = format!(
            "{}. {} ({})",
            self.records + 1,
            student.name,
            student.student_code
        );
        c.text(&title, ENTRY, &mut out);
        c.text(
            &format!(
                "Class: {}-{}, Roll No: {}",
                student.class, student.section, student.roll_no
            ),
            BODY,
            &mut out,
        );
        c.text(&format!("Status: {}", student.status.label()), BODY, &mut out);
        c.page.gap(10.0);

        self.records += 1;
        out
    }

    fn finish(&mut self) -> Vec<u8> {
        if self.records == 0 {
            self.composer
                .page
                .text("No students found matching the criteria.", NOTICE);
        }
        self.composer.finish()
    }

    fn records(&self) -> usize {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::student;

    fn header(title: &str) -> DocumentHeader {
        DocumentHeader::new("Springfield Elementary", title, Utc::now())
    }

    fn render(doc: &mut dyn RecordDocument, students: &[Student]) -> Vec<u8> {
        let mut out = doc.begin();
        for s in students {
            out.extend(doc.push(s));
        }
        out.extend(doc.finish());
        out
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    fn page_count(pdf: &[u8]) -> usize {
        let text = String::from_utf8_lossy(pdf);
        let at = text.rfind("/Count ").unwrap() + "/Count ".len();
        text[at..]
            .split(|c: char| !c.is_ascii_digit())
            .next()
            .unwrap()
            .parse()
            .unwrap()
    }

    #[test]
    fn test_one_page_per_student() {
        let students: Vec<_> = (1..=3).map(student).collect();
        let mut doc = StudentDocument::new(header("Student Information Report"));
        let pdf = render(&mut doc, &students);

        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(doc.records(), 3);
        assert_eq!(page_count(&pdf), 3);
        assert!(contains(&pdf, "(Springfield Elementary)"));
        assert!(contains(&pdf, "(Student Details: Student 2)"));
        assert!(contains(&pdf, "(ID: STU0003)"));
    }

    #[test]
    fn test_missing_values_print_placeholder() {
        let mut doc = StudentDocument::new(header("Student Information Report"));
        let pdf = render(&mut doc, &[student(1)]);
        assert!(contains(&pdf, "(Email: N/A)"));
        assert!(contains(&pdf, "(Added by: System)"));
    }

    #[test]
    fn test_empty_student_document_is_valid() {
        let mut doc = StudentDocument::new(header("Student Information Report"));
        let pdf = render(&mut doc, &[]);
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert_eq!(page_count(&pdf), 1);
        assert!(contains(&pdf, "(No student records found.)"));
    }

    #[test]
    fn test_pages_stream_before_finish() {
        let mut doc = StudentDocument::new(header("Student Information Report"));
        doc.begin();
        assert!(doc.push(&student(1)).is_empty());
        // the first page is released once the second record starts
        let chunk = doc.push(&student(2));
        assert!(contains(&chunk, "/Type /Page "));
    }

    #[test]
    fn test_listing_flows_across_pages() {
        let students: Vec<_> = (1..=40).map(student).collect();
        let mut doc = ListingDocument::new(header("Student Listing Report"));
        let pdf = render(&mut doc, &students);

        assert!(page_count(&pdf) > 1);
        assert!(page_count(&pdf) < 40);
        assert!(contains(&pdf, "(1. Student 1 \\(STU0001\\))"));
        assert!(contains(&pdf, "(Class: 5-B, Roll No: 40)"));
        assert!(contains(&pdf, "(Status: Active)"));
    }

    #[test]
    fn test_empty_listing() {
        let mut doc = ListingDocument::new(header("Student Listing Report"));
        let pdf = render(&mut doc, &[]);
        assert!(contains(&pdf, "(No students found matching the criteria.)"));
    }
}
