//! # Error Types
//!
//! Domain-specific error types for packlist-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  packlist-core errors (this file)                                      │
//! │  ├── CoreError        - Rejected scans                                 │
//! │  └── ValidationError  - Malformed decoder payloads                     │
//! │                                                                         │
//! │  packlist-export errors (separate crate)                               │
//! │  └── ExportError      - Workbook and cache file failures               │
//! │                                                                         │
//! │  Station errors (in app)                                               │
//! │  └── ApiError         - What the operator sees (notice)                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Notice                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected scan never changes session state. The operator re-scans.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Scan rejections raised by the session state machine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A box scan was requested but the decoded code lacks the box prefix.
    ///
    /// ## User Workflow
    /// ```text
    /// "New box" pressed
    ///      │
    ///      ▼
    /// Decoded: "4601234567890"
    ///      │
    ///      ▼
    /// InvalidBoxCode { code: "4601234567890", prefix: "WB_" }
    ///      │
    ///      ▼
    /// Session still waits for a box code
    /// ```
    #[error("Invalid box code '{code}': expected prefix '{prefix}'")]
    InvalidBoxCode { code: String, prefix: String },

    /// A product was scanned before any box was started.
    #[error("No active box: start a new box before scanning products")]
    NoActiveBox,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for decoder payloads.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., a line break inside a barcode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
