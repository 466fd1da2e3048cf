use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};
use rollbook_core::{AppError, ListQuery};
use rollbook_models::{ExportFormat, ExportParams, ReportKind, STUDENT_FIELDS};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::instrument;

use super::service::{ExportArtifact, ExportService, StudentSelection};
use crate::middleware::role::{RequireAdmin, RequireTeacher};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// Export one student, or all matching students
///
/// With `id` = `all`, every other query parameter acts as a student list
/// filter and `sort` orders the output.
#[utoipa::path(
    get,
    path = "/api/export/students/{id}",
    params(
        ("id" = String, Path, description = "Student UUID, code, or `all`"),
        ExportParams
    ),
    responses(
        (status = 200, description = "PDF or XLSX attachment", content_type = "application/octet-stream"),
        (status = 400, description = "Unsupported format or invalid filter", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Export"
)]
#[instrument(skip(state, _auth_user))]
pub async fn export_students(
    State(state): State<AppState>,
    RequireTeacher(_auth_user): RequireTeacher,
    Path(id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<ExportArtifact, AppError> {
    let query = ListQuery::parse(
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        STUDENT_FIELDS,
    )?;
    let format = ExportFormat::parse(query.format.as_deref())?;

    let selection = if id.trim().eq_ignore_ascii_case("all") {
        StudentSelection::All(query)
    } else {
        StudentSelection::One(id)
    };

    ExportService::export_students(&state.db, &state.export_config, selection, format).await
}

/// Export a report
///
/// The optional JSON body holds student filters, e.g.
/// `{"class": "5", "status": "active", "roll_no": {"gte": "10"}}`.
#[utoipa::path(
    post,
    path = "/api/export/reports/{type}",
    params(
        ("type" = String, Path, description = "attendance, marks or students"),
        ExportParams
    ),
    request_body(content = HashMap<String, String>, description = "Optional filters", content_type = "application/json"),
    responses(
        (status = 200, description = "PDF or XLSX attachment", content_type = "application/octet-stream"),
        (status = 400, description = "Unknown report type, unsupported format or invalid filter", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 501, description = "Report type not implemented", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Export"
)]
#[instrument(skip(state, _admin, body))]
pub async fn export_report(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(report_type): Path<String>,
    Query(params): Query<ExportParams>,
    body: Bytes,
) -> Result<ExportArtifact, AppError> {
    let kind = ReportKind::parse(report_type.trim())?;
    let filters = parse_filter_body(&body)?;
    let body_format = filters.get("format").and_then(Value::as_str);
    let format = ExportFormat::parse(params.format.as_deref().or(body_format))?;
    ExportService::ensure_available(kind)?;

    let query = ListQuery::from_json(&filters, STUDENT_FIELDS)?;

    ExportService::export_report(&state.db, &state.export_config, kind, query, format).await
}

/// An empty body means no filters.
fn parse_filter_body(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        _ => Err(AppError::validation(
            "body",
            "Report filters must be a JSON object",
        )),
    }
}
