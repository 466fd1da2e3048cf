//! # Rollbook Models
//!
//! Entities, request DTOs and response envelopes shared by the API, the
//! export renderers and the CLI.
//!
//! - [`users`]: accounts and roles
//! - [`students`]: student records and the filterable field catalog
//! - [`auth`]: register/login payloads
//! - [`exports`]: export format and report type tokens

pub mod auth;
pub mod exports;
pub mod students;
pub mod users;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use exports::{ExportFormat, ExportParams, ReportKind};
pub use students::{
    ClassStudentsResponse, CreateStudentDto, DeletedResponse, Gender, STUDENT_FIELDS, Student,
    StudentListParams, StudentListResponse, StudentResponse, StudentStatus, UpdateStudentDto,
    is_student_code,
};
pub use users::{UpdateUserDto, User, UserListResponse, UserResponse, UserRole};
