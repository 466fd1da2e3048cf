use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rollbook_core::{AppError, ListQuery};
use rollbook_models::{
    ClassStudentsResponse, CreateStudentDto, DeletedResponse, STUDENT_FIELDS, StudentListParams,
    StudentListResponse, StudentResponse, UpdateStudentDto,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireTeacher};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List students
///
/// Besides the reserved parameters, any student field can be used as a
/// filter: `status=active`, `roll_no_gte=10`, `class_in=5,6`,
/// `joining_date[lt]=2024-06-01`.
#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentListParams),
    responses(
        (status = 200, description = "A page of students", body = StudentListResponse),
        (status = 400, description = "Invalid filter or select field", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_students(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<StudentListResponse>, AppError> {
    let query = ListQuery::parse(
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        STUDENT_FIELDS,
    )?;

    let (students, total) = StudentService::list_students(&state.db, &query).await?;

    let students = students
        .into_iter()
        .map(|student| {
            serde_json::to_value(student)
                .map(|value| query.project(value))
                .map_err(AppError::internal)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(StudentListResponse {
        success: true,
        count: students.len(),
        total,
        pagination: query.page.links(total),
        students,
    }))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student UUID or code such as STU0001")),
    responses(
        (status = 200, description = "Student", body = StudentResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_student(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StudentResponse>, AppError> {
    let student = StudentService::get_student(&state.db, &id).await?;
    Ok(Json(StudentResponse {
        success: true,
        student,
    }))
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<StudentResponse>), AppError> {
    let created_by = auth_user.user_id()?;
    let student = StudentService::create_student(&state.db, dto, created_by).await?;
    Ok((
        StatusCode::CREATED,
        Json(StudentResponse {
            success: true,
            student,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student UUID or code")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not the creator and not an admin", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<StudentResponse>, AppError> {
    let existing = StudentService::get_student(&state.db, &id).await?;

    let is_creator = existing.created_by == Some(auth_user.user_id()?);
    if !is_creator && !auth_user.is_admin() {
        return Err(AppError::forbidden("Not authorized to update this student"));
    }

    let student = StudentService::update_student(&state.db, existing.id, dto).await?;
    Ok(Json(StudentResponse {
        success: true,
        student,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student UUID or code")),
    responses(
        (status = 200, description = "Student deleted", body = DeletedResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let existing = StudentService::get_student(&state.db, &id).await?;
    StudentService::delete_student(&state.db, existing.id).await?;
    Ok(Json(DeletedResponse::new()))
}

#[utoipa::path(
    get,
    path = "/api/students/class/{class_name}",
    params(("class_name" = String, Path, description = "Class, e.g. 5")),
    responses(
        (status = 200, description = "Active students of the class by roll number", body = ClassStudentsResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_students_by_class(
    State(state): State<AppState>,
    RequireTeacher(_auth_user): RequireTeacher,
    Path(class_name): Path<String>,
) -> Result<Json<ClassStudentsResponse>, AppError> {
    let students = StudentService::get_students_by_class(&state.db, &class_name).await?;
    Ok(Json(ClassStudentsResponse {
        success: true,
        count: students.len(),
        students,
    }))
}
