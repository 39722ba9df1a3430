//! # API Error Type
//!
//! Unified error type for station commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Station                            │
//! │                                                                         │
//! │  Driver                      Commands                                   │
//! │  ──────                      ────────                                   │
//! │                                                                         │
//! │  {"type":"ean13","data":"ABC123"}                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Scan rejected? ──── CoreError::NoActiveBox ───────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Export failed? ──── ExportError::WriteFailed ─── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── Notice { level: error, title: "Ошибка", message: ... } ────────  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No error stops the station: the driver turns every `ApiError` into a
//! notice and keeps reading.

use packlist_core::CoreError;
use packlist_export::ExportError;
use serde::Serialize;

use crate::handoff::HandoffError;
use crate::state::ConfigError;

/// API error returned from station commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NO_ACTIVE_BOX",
///   "message": "No active box: start a new box before scanning products"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Box code without the expected prefix
    InvalidBoxCode,

    /// Product scanned before any box was started
    NoActiveBox,

    /// Malformed payload or input
    ValidationError,

    /// Export could not be built or written
    ExportWriteFailure,

    /// Share collaborator missing or failed to start
    ShareUnavailable,

    /// Mail collaborator missing or failed to start
    MailUnavailable,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts scan errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidBoxCode { .. } => {
                ApiError::new(ErrorCode::InvalidBoxCode, err.to_string())
            }
            CoreError::NoActiveBox => ApiError::new(ErrorCode::NoActiveBox, err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts export errors to API errors.
impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::WriteFailed { .. }
            | ExportError::CacheDirUnavailable(_)
            | ExportError::FileUri(_) => {
                tracing::error!("Export write failed: {}", err);
                ApiError::new(ErrorCode::ExportWriteFailure, err.to_string())
            }
            ExportError::Xlsx(e) => {
                tracing::error!("Workbook encoding failed: {}", e);
                ApiError::new(ErrorCode::ExportWriteFailure, "Failed to build the packing list")
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}

/// Converts configuration errors to API errors.
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

/// Converts share/mail handoff errors to API errors.
impl From<HandoffError> for ApiError {
    fn from(err: HandoffError) -> Self {
        match err {
            HandoffError::ShareUnavailable(_) => {
                ApiError::new(ErrorCode::ShareUnavailable, err.to_string())
            }
            HandoffError::MailUnavailable(_) => {
                ApiError::new(ErrorCode::MailUnavailable, err.to_string())
            }
            HandoffError::Url(e) => ApiError::internal(format!("Invalid mail link: {}", e)),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
