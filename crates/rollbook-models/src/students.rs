//! Student records, their DTOs and the list-query field catalog.

use chrono::{DateTime, Utc};
use rollbook_core::PaginationLinks;
use rollbook_core::query::{FieldKind, FieldSpec};
use rollbook_core::serde::{optional_trimmed, trimmed, trimmed_option};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "student_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
}

impl StudentStatus {
    /// Human-facing label used in exported documents.
    pub fn label(&self) -> &'static str {
        match self {
            StudentStatus::Active => "Active",
            StudentStatus::Inactive => "Inactive",
        }
    }
}

/// Fields accepted by `select`, `sort` and filters on student lists.
/// Names match the JSON keys of [`Student`].
pub static STUDENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", "s.id", FieldKind::Uuid),
    FieldSpec::new("student_code", "s.student_code", FieldKind::Text),
    FieldSpec::new("name", "s.name", FieldKind::Text),
    FieldSpec::new("class", "s.class_name", FieldKind::Text),
    FieldSpec::new("section", "s.section", FieldKind::Text),
    FieldSpec::new("roll_no", "s.roll_no", FieldKind::Text),
    FieldSpec::new("gender", "s.gender", FieldKind::Enum(&["Male", "Female", "Other"])),
    FieldSpec::new("father_name", "s.father_name", FieldKind::Text),
    FieldSpec::new("mother_name", "s.mother_name", FieldKind::Text),
    FieldSpec::new("contact_no", "s.contact_no", FieldKind::Text),
    FieldSpec::new("email", "s.email", FieldKind::Text),
    FieldSpec::new("address", "s.address", FieldKind::Text),
    FieldSpec::new("joining_date", "s.joining_date", FieldKind::Timestamp),
    FieldSpec::new("status", "s.status", FieldKind::Enum(&["active", "inactive"])),
    FieldSpec::new("created_by", "s.created_by", FieldKind::Uuid),
    FieldSpec::new("created_at", "s.created_at", FieldKind::Timestamp),
    FieldSpec::new("updated_at", "s.updated_at", FieldKind::Timestamp),
];

/// Student display codes look like `STU0001`; wider numbers keep all digits.
pub fn is_student_code(candidate: &str) -> bool {
    candidate
        .strip_prefix("STU")
        .is_some_and(|digits| digits.len() >= 4 && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    /// Human-readable display ID, e.g. `STU0001`
    pub student_code: String,
    pub name: String,
    #[sqlx(rename = "class_name")]
    pub class: String,
    pub section: String,
    pub roll_no: String,
    pub gender: Gender,
    pub father_name: String,
    pub mother_name: String,
    pub contact_no: String,
    pub email: Option<String>,
    pub address: String,
    pub joining_date: DateTime<Utc>,
    pub status: StudentStatus,
    pub created_by: Option<Uuid>,
    /// Display name of the creating user, when that user still exists
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Please add a name"))]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 20, message = "Please add a class"))]
    pub class: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 10, message = "Please add a section"))]
    pub section: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 20, message = "Please add a roll number"))]
    pub roll_no: String,
    pub gender: Gender,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Please add father's name"))]
    pub father_name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Please add mother's name"))]
    pub mother_name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 30, message = "Please add a contact number"))]
    pub contact_no: String,
    #[serde(default, deserialize_with = "optional_trimmed")]
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 500, message = "Please add an address"))]
    pub address: String,
    pub joining_date: Option<DateTime<Utc>>,
    pub status: Option<StudentStatus>,
}

/// Partial update. `student_code`, `created_by` and timestamps are not
/// client-writable.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 100, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 20, message = "Class cannot be empty"))]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 10, message = "Section cannot be empty"))]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 20, message = "Roll number cannot be empty"))]
    pub roll_no: Option<String>,
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 100, message = "Father's name cannot be empty"))]
    pub father_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 100, message = "Mother's name cannot be empty"))]
    pub mother_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 30, message = "Contact number cannot be empty"))]
    pub contact_no: Option<String>,
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 500, message = "Address cannot be empty"))]
    pub address: Option<String>,
    pub joining_date: Option<DateTime<Utc>>,
    pub status: Option<StudentStatus>,
}

/// Reserved list parameters. Any other query key is a filter on a field of
/// [`STUDENT_FIELDS`], optionally suffixed `_gt`, `_gte`, `_lt`, `_lte` or `_in`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentListParams {
    /// Comma-separated fields to return, e.g. `name,class,roll_no`
    pub select: Option<String>,
    /// Comma-separated sort fields, `-` prefix for descending (default `-created_at`)
    pub sort: Option<String>,
    /// 1-based page (default 1)
    pub page: Option<i64>,
    /// Page size (default 25, max 100)
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentResponse {
    pub success: bool,
    pub student: Student,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentListResponse {
    pub success: bool,
    /// Records on this page
    pub count: usize,
    /// Records matching the filters across all pages
    pub total: i64,
    pub pagination: PaginationLinks,
    #[schema(value_type = Vec<Object>)]
    pub students: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassStudentsResponse {
    pub success: bool,
    pub count: usize,
    pub students: Vec<Student>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

impl DeletedResponse {
    pub fn new() -> Self {
        Self {
            success: true,
            data: serde_json::json!({}),
        }
    }
}

impl Default for DeletedResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> serde_json::Value {
        json!({
            "name": "  Ada Lovelace ",
            "class": "5",
            "section": "A",
            "roll_no": "12",
            "gender": "Female",
            "father_name": "George",
            "mother_name": "Anne",
            "contact_no": "555-0100",
            "email": "",
            "address": "1 Main St"
        })
    }

    #[test]
    fn test_create_dto_trims_and_validates() {
        let dto: CreateStudentDto = serde_json::from_value(valid_body()).unwrap();
        assert_eq!(dto.name, "Ada Lovelace");
        assert_eq!(dto.email, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_dto_rejects_blank_required_field() {
        let mut body = valid_body();
        body["father_name"] = json!("   ");
        let dto: CreateStudentDto = serde_json::from_value(body).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("father_name"));
    }

    #[test]
    fn test_create_dto_rejects_bad_email() {
        let mut body = valid_body();
        body["email"] = json!("not-an-email");
        let dto: CreateStudentDto = serde_json::from_value(body).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_gender_is_a_closed_set() {
        let mut body = valid_body();
        body["gender"] = json!("male");
        assert!(serde_json::from_value::<CreateStudentDto>(body).is_err());
    }

    #[test]
    fn test_update_dto_accepts_partial_body() {
        let dto: UpdateStudentDto = serde_json::from_value(json!({"status": "inactive"})).unwrap();
        assert_eq!(dto.status, Some(StudentStatus::Inactive));
        assert!(dto.name.is_none());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_student_code_shape() {
        assert!(is_student_code("STU0001"));
        assert!(is_student_code("STU12345"));
        assert!(!is_student_code("STU01"));
        assert!(!is_student_code("stu0001"));
        assert!(!is_student_code("STU00A1"));
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = STUDENT_FIELDS.iter().map(|f| f.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), STUDENT_FIELDS.len());
    }
}
