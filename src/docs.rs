use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::health::controller::HealthResponse;
use rollbook_core::{PageCursor, PaginationLinks};
use rollbook_models::{
    ClassStudentsResponse, CreateStudentDto, DeletedResponse, Gender, LoginRequest, LoginResponse,
    RegisterRequest, RegisterResponse, Student, StudentListResponse, StudentResponse,
    StudentStatus, UpdateStudentDto, UpdateUserDto, User, UserListResponse, UserResponse,
    UserRole,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_users_by_role,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::get_students_by_class,
        crate::modules::export::controller::export_students,
        crate::modules::export::controller::export_report,
        crate::modules::health::controller::health_check,
    ),
    components(
        schemas(
            User,
            UserRole,
            UpdateUserDto,
            UserResponse,
            UserListResponse,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            Student,
            Gender,
            StudentStatus,
            CreateStudentDto,
            UpdateStudentDto,
            StudentResponse,
            StudentListResponse,
            ClassStudentsResponse,
            DeletedResponse,
            PaginationLinks,
            PageCursor,
            HealthResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and current user"),
        (name = "Users", description = "Staff account management"),
        (name = "Students", description = "Student records"),
        (name = "Export", description = "PDF and Excel exports"),
        (name = "Health", description = "Liveness")
    ),
    info(
        title = "Rollbook API",
        version = "0.1.0",
        description = "School record keeping API built with Rust, Axum, and PostgreSQL. Authenticate with a bearer JWT from `/api/auth/login`.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/students",
            "/api/students/{id}",
            "/api/export/students/{id}",
            "/api/export/reports/{type}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
