//! # Rollbook Export
//!
//! Renders student records into downloadable documents.
//!
//! - [`pdf`]: a minimal PDF 1.4 writer that emits the file as a sequence of
//!   chunks (header, one chunk per finished page, trailer) so a response body
//!   can stream while rows are still being read
//! - [`documents`]: the student detail document and the student listing
//!   report, both implementing [`RecordDocument`]
//! - [`sheets`]: XLSX workbooks for the same two layouts
//! - [`columns`]: the shared ordered field list
//!
//! ```ignore
//! let mut doc = StudentDocument::new(header);
//! let mut body = doc.begin();
//! for student in &students {
//!     body.extend(doc.push(student));
//! }
//! body.extend(doc.finish());
//! ```

pub mod columns;
pub mod documents;
pub mod error;
pub mod pdf;
pub mod sheets;

pub use documents::{DocumentHeader, ListingDocument, RecordDocument, StudentDocument};
pub use error::ExportError;
pub use sheets::{listing_workbook, student_workbook};

/// Placeholder printed for missing optional values.
pub const NOT_AVAILABLE: &str = "N/A";

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use rollbook_models::{Gender, Student, StudentStatus};
    use uuid::Uuid;

    pub fn student(n: u32) -> Student {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Student {
            id: Uuid::new_v4(),
            student_code: format!("STU{:04}", n),
            name: format!("Student {}", n),
            class: "5".into(),
            section: "B".into(),
            roll_no: n.to_string(),
            gender: Gender::Female,
            father_name: "Father".into(),
            mother_name: "Mother".into(),
            contact_no: "555-0100".into(),
            email: None,
            address: "1 Main St".into(),
            joining_date: at,
            status: StudentStatus::Active,
            created_by: None,
            created_by_name: None,
            created_at: at,
            updated_at: at,
        }
    }
}
