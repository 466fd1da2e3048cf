//! Student exports.
//!
//! PDFs stream: a spawned task walks the database cursor and feeds rendered
//! chunks through a bounded channel that backs the response body. Workbooks
//! are assembled in memory, so their row count is capped.

use std::io;

use anyhow::Context;
use axum::{
    body::{Body, Bytes},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use futures_util::{TryStreamExt, stream};
use rollbook_config::ExportConfig;
use rollbook_core::{AppError, ListQuery};
use rollbook_export::{
    DocumentHeader, ListingDocument, RecordDocument, StudentDocument, listing_workbook,
    student_workbook,
};
use rollbook_models::{ExportFormat, ReportKind, Student};
use rollbook_observability::track_export_rendered;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tracing::{error, instrument, warn};

use crate::modules::students::service::StudentService;

const STUDENT_DOCUMENT_TITLE: &str = "Student Information Report";
const CHANNEL_DEPTH: usize = 8;

/// Which students to export.
#[derive(Debug)]
pub enum StudentSelection {
    /// A single student by UUID or code.
    One(String),
    /// Every student matching the query, in its sort order.
    All(ListQuery),
}

/// A rendered (or rendering) file ready to be sent as an attachment.
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_stem: String,
    pub body: Body,
}

impl ExportArtifact {
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.file_stem,
            Utc::now().timestamp_millis(),
            self.format.extension()
        )
    }
}

impl IntoResponse for ExportArtifact {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename={}", self.file_name());
        (
            [
                (header::CONTENT_TYPE, self.format.content_type().to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.body,
        )
            .into_response()
    }
}

pub struct ExportService;

impl ExportService {
    #[instrument(skip(db, config))]
    pub async fn export_students(
        db: &PgPool,
        config: &ExportConfig,
        selection: StudentSelection,
        format: ExportFormat,
    ) -> Result<ExportArtifact, AppError> {
        let header = DocumentHeader::new(
            config.institution_name.clone(),
            STUDENT_DOCUMENT_TITLE,
            Utc::now(),
        );

        let (file_stem, body) = match selection {
            StudentSelection::One(key) => {
                let student = StudentService::get_student(db, &key).await?;
                let stem = format!("student-{}", student.student_code.to_lowercase());
                let bytes = match format {
                    ExportFormat::Pdf => render_document(StudentDocument::new(header), &[student]),
                    ExportFormat::Excel => {
                        build_workbook(move || student_workbook(&[student])).await?
                    }
                };
                (stem, Body::from(bytes))
            }
            StudentSelection::All(query) => {
                let body = match format {
                    ExportFormat::Pdf => {
                        stream_document(db.clone(), query, StudentDocument::new(header))
                    }
                    ExportFormat::Excel => {
                        let students =
                            bounded_rows(db, &query, config.max_spreadsheet_rows).await?;
                        Body::from(build_workbook(move || student_workbook(&students)).await?)
                    }
                };
                ("students".to_string(), body)
            }
        };

        track_export_rendered("students", format.as_str());
        Ok(ExportArtifact {
            format,
            file_stem,
            body,
        })
    }

    /// Only the student listing has a data source; the other report kinds
    /// are recognised but answer `NotImplemented`.
    pub fn ensure_available(kind: ReportKind) -> Result<(), AppError> {
        match kind {
            ReportKind::Students => Ok(()),
            other => Err(AppError::NotImplemented(format!(
                "{} export is not implemented yet",
                other.title()
            ))),
        }
    }

    /// Renders a report. Only the student listing exists; the other kinds
    /// are reported as not implemented rather than returned empty.
    #[instrument(skip(db, config))]
    pub async fn export_report(
        db: &PgPool,
        config: &ExportConfig,
        kind: ReportKind,
        query: ListQuery,
        format: ExportFormat,
    ) -> Result<ExportArtifact, AppError> {
        Self::ensure_available(kind)?;

        let header = DocumentHeader::new(config.institution_name.clone(), kind.title(), Utc::now());
        let body = match format {
            ExportFormat::Pdf => stream_document(db.clone(), query, ListingDocument::new(header)),
            ExportFormat::Excel => {
                let students = bounded_rows(db, &query, config.max_spreadsheet_rows).await?;
                Body::from(build_workbook(move || listing_workbook(&header, &students)).await?)
            }
        };

        track_export_rendered(kind.as_str(), format.as_str());
        Ok(ExportArtifact {
            format,
            file_stem: format!("{}-report", kind.as_str()),
            body,
        })
    }
}

/// Renders a document over an in-memory slice.
fn render_document<D: RecordDocument>(mut doc: D, students: &[Student]) -> Vec<u8> {
    let mut out = doc.begin();
    for student in students {
        out.extend(doc.push(student));
    }
    out.extend(doc.finish());
    out
}

/// Streams a document over every student matching `query`. A database error
/// mid-stream aborts the body.
fn stream_document<D>(db: PgPool, query: ListQuery, mut doc: D) -> Body
where
    D: RecordDocument + 'static,
{
    let (tx, rx) = mpsc::channel::<Result<Bytes, io::Error>>(CHANNEL_DEPTH);

    tokio::spawn(async move {
        if tx.send(Ok(Bytes::from(doc.begin()))).await.is_err() {
            return;
        }

        let mut qb = StudentService::select_all(&query);
        let mut rows = qb.build_query_as::<Student>().fetch(&db);

        loop {
            match rows.try_next().await {
                Ok(Some(student)) => {
                    let chunk = doc.push(&student);
                    if !chunk.is_empty() && tx.send(Ok(Bytes::from(chunk))).await.is_err() {
                        warn!("Export client went away");
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!(error = ?e, "Export query failed mid-stream");
                    let _ = tx.send(Err(io::Error::other("export aborted"))).await;
                    return;
                }
            }
        }

        let _ = tx.send(Ok(Bytes::from(doc.finish()))).await;
    });

    Body::from_stream(stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (chunk, rx))
    }))
}

/// Loads the matching rows for a workbook, refusing sets above `cap`.
async fn bounded_rows(db: &PgPool, query: &ListQuery, cap: i64) -> Result<Vec<Student>, AppError> {
    let too_many = || {
        AppError::validation(
            "limit",
            format!(
                "Spreadsheet exports are limited to {} rows; narrow the filters or use PDF",
                cap
            ),
        )
    };

    let total = StudentService::count(db, &query.filters).await?;
    if total > cap {
        return Err(too_many());
    }

    let mut qb = StudentService::select_all(query);
    let mut rows = qb.build_query_as::<Student>().fetch(db);
    let mut students = Vec::with_capacity(usize::try_from(total).unwrap_or_default());

    while let Some(student) = rows
        .try_next()
        .await
        .context("Failed to read students for export")
        .map_err(AppError::storage)?
    {
        // rows inserted after the count still respect the cap
        if students.len() as i64 >= cap {
            return Err(too_many());
        }
        students.push(student);
    }

    Ok(students)
}

/// Runs a workbook build on the blocking pool.
async fn build_workbook<F>(build: F) -> Result<Vec<u8>, AppError>
where
    F: FnOnce() -> Result<Vec<u8>, rollbook_export::ExportError> + Send + 'static,
{
    tokio::task::spawn_blocking(build)
        .await
        .context("Spreadsheet task failed")
        .map_err(AppError::internal)?
        .map_err(AppError::internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_file_name_shape() {
        let artifact = ExportArtifact {
            format: ExportFormat::Excel,
            file_stem: "students".into(),
            body: Body::empty(),
        };
        let name = artifact.file_name();
        assert!(name.starts_with("students-"));
        assert!(name.ends_with(".xlsx"));
        let millis = &name["students-".len()..name.len() - ".xlsx".len()];
        assert!(millis.parse::<i64>().is_ok());
    }

    #[tokio::test]
    async fn test_artifact_headers() {
        let response = ExportArtifact {
            format: ExportFormat::Pdf,
            file_stem: "students".into(),
            body: Body::from("%PDF-1.4"),
        }
        .into_response();

        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=students-"));
        assert!(disposition.ends_with(".pdf"));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"%PDF-1.4");
    }

    #[test]
    fn test_render_document_without_records() {
        let header = DocumentHeader::new("School", STUDENT_DOCUMENT_TITLE, Utc::now());
        let pdf = render_document(StudentDocument::new(header), &[]);
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.ends_with(b"%%EOF\n"));
    }
}
