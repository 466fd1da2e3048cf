//! The ordered student field list shared by PDF detail sections and
//! spreadsheet columns.

use rollbook_models::Student;

use crate::NOT_AVAILABLE;

pub struct Column {
    pub label: &'static str,
    /// Spreadsheet column width in characters.
    pub width: f64,
    pub value: fn(&Student) -> String,
}

fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

fn joining_date(s: &Student) -> String {
    s.joining_date.format("%Y-%m-%d").to_string()
}

pub static STUDENT_COLUMNS: [Column; 13] = [
    Column { label: "ID", width: 15.0, value: |s| or_na(&s.student_code) },
    Column { label: "Name", width: 25.0, value: |s| or_na(&s.name) },
    Column { label: "Class", width: 10.0, value: |s| or_na(&s.class) },
    Column { label: "Section", width: 10.0, value: |s| or_na(&s.section) },
    Column { label: "Roll Number", width: 12.0, value: |s| or_na(&s.roll_no) },
    Column { label: "Gender", width: 10.0, value: |s| s.gender.as_str().to_string() },
    Column { label: "Father's Name", width: 25.0, value: |s| or_na(&s.father_name) },
    Column { label: "Mother's Name", width: 25.0, value: |s| or_na(&s.mother_name) },
    Column { label: "Contact Number", width: 15.0, value: |s| or_na(&s.contact_no) },
    Column {
        label: "Email",
        width: 25.0,
        value: |s| or_na(s.email.as_deref().unwrap_or_default()),
    },
    Column { label: "Address", width: 40.0, value: |s| or_na(&s.address) },
    Column { label: "Joining Date", width: 15.0, value: joining_date },
    Column { label: "Status", width: 10.0, value: |s| s.status.label().to_string() },
];

/// Columns of the listing report spreadsheet, a subset of [`STUDENT_COLUMNS`].
pub static LISTING_COLUMNS: [Column; 7] = [
    Column { label: "ID", width: 15.0, value: |s| or_na(&s.student_code) },
    Column { label: "Name", width: 25.0, value: |s| or_na(&s.name) },
    Column { label: "Class", width: 10.0, value: |s| or_na(&s.class) },
    Column { label: "Section", width: 10.0, value: |s| or_na(&s.section) },
    Column { label: "Roll Number", width: 12.0, value: |s| or_na(&s.roll_no) },
    Column { label: "Gender", width: 10.0, value: |s| s.gender.as_str().to_string() },
    Column { label: "Status", width: 10.0, value: |s| s.status.label().to_string() },
];

/// Who added the record, for document footers.
pub fn added_by(s: &Student) -> &str {
    s.created_by_name.as_deref().unwrap_or("System")
}
