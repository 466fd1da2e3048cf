use std::env;

use crate::env_or;

#[derive(Clone, Debug)]
pub struct ExportConfig {
    /// Heading printed at the top of every generated document.
    pub institution_name: String,
    /// Spreadsheets are built in memory, so exports above this many rows are refused.
    pub max_spreadsheet_rows: i64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            institution_name: "School Management System".to_string(),
            max_spreadsheet_rows: 5000,
        }
    }
}

impl ExportConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            institution_name: env::var("EXPORT_INSTITUTION_NAME")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.institution_name),
            max_spreadsheet_rows: env_or(
                "EXPORT_MAX_SPREADSHEET_ROWS",
                defaults.max_spreadsheet_rows,
            )
            .max(1),
        }
    }
}
