use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to render spreadsheet")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}
