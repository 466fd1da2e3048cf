//! Export format and report type tokens.

use rollbook_core::AppError;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    /// Parses the `format` query token. Absent or blank means PDF.
    pub fn parse(token: Option<&str>) -> Result<Self, AppError> {
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            None => Ok(Self::Pdf),
            Some(t) if t.eq_ignore_ascii_case("pdf") => Ok(Self::Pdf),
            Some(t) if t.eq_ignore_ascii_case("excel") || t.eq_ignore_ascii_case("xlsx") => {
                Ok(Self::Excel)
            }
            Some(other) => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "excel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum ReportKind {
    Attendance,
    Marks,
    Students,
}

impl ReportKind {
    pub fn parse(token: &str) -> Result<Self, AppError> {
        match token {
            "attendance" => Ok(Self::Attendance),
            "marks" => Ok(Self::Marks),
            "students" => Ok(Self::Students),
            other => Err(AppError::validation(
                "type",
                format!("Invalid report type '{}'", other),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attendance => "attendance",
            Self::Marks => "marks",
            Self::Students => "students",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Attendance => "Attendance Report",
            Self::Marks => "Marks Report",
            Self::Students => "Student Listing Report",
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportParams {
    /// `pdf` (default) or `excel`
    pub format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_pdf() {
        assert_eq!(ExportFormat::parse(None).unwrap(), ExportFormat::Pdf);
        assert_eq!(ExportFormat::parse(Some("  ")).unwrap(), ExportFormat::Pdf);
    }

    #[test]
    fn test_format_tokens() {
        assert_eq!(ExportFormat::parse(Some("PDF")).unwrap(), ExportFormat::Pdf);
        assert_eq!(ExportFormat::parse(Some("excel")).unwrap(), ExportFormat::Excel);
        assert_eq!(ExportFormat::parse(Some("xlsx")).unwrap(), ExportFormat::Excel);
    }

    #[test]
    fn test_unsupported_format() {
        match ExportFormat::parse(Some("csv")) {
            Err(AppError::UnsupportedFormat(token)) => assert_eq!(token, "csv"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_report_kinds() {
        assert_eq!(ReportKind::parse("students").unwrap(), ReportKind::Students);
        assert_eq!(ReportKind::parse("marks").unwrap(), ReportKind::Marks);
        assert!(matches!(
            ReportKind::parse("grades"),
            Err(AppError::ValidationFailed { .. })
        ));
    }
}
