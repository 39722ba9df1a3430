//! # Export Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  XlsxError / calamine::XlsxError / std::io::Error                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ExportError (this module) ← Adds path and row context                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in station) ← EXPORT_WRITE_FAILURE notice                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Export chain errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Workbook encoding failed.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] XlsxError),

    /// Writing the export file failed.
    ///
    /// ## When This Occurs
    /// - Cache directory removed or read-only
    /// - Disk full
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export path has no `file://` form.
    #[error("No file URI for {}", .0.display())]
    FileUri(PathBuf),

    /// No cache directory could be determined for this platform.
    #[error("Cache directory unavailable: {0}")]
    CacheDirUnavailable(String),

    /// Workbook could not be opened for reading.
    #[error("Failed to read workbook: {0}")]
    Read(String),

    /// Workbook has no worksheet with the expected name.
    #[error("Sheet '{0}' not found")]
    MissingSheet(String),

    /// First row does not match the export header.
    #[error("Unexpected header: {found:?}")]
    UnexpectedHeader { found: Vec<String> },

    /// A data row could not be parsed back.
    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}

impl ExportError {
    /// Creates a WriteFailed error for `path`.
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Creates a MalformedRow error.
    pub fn malformed(row: usize, reason: impl Into<String>) -> Self {
        ExportError::MalformedRow {
            row,
            reason: reason.into(),
        }
    }
}

impl From<calamine::XlsxError> for ExportError {
    fn from(err: calamine::XlsxError) -> Self {
        ExportError::Read(err.to_string())
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
