//! # Validation Module
//!
//! Checks applied to decoder payloads before they reach the session.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Camera decoder                                               │
//! │  └── Symbology checksums (EAN-13, Code128, QR ECC)                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Non-empty payload                                                 │
//! │  ├── Bounded length                                                    │
//! │  └── No NUL or line breaks (GS1 separators pass)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Session rules                                                │
//! │  └── Box prefix, active box, armed state                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use packlist_core::validation::{validate_barcode, has_box_prefix};
//!
//! assert!(validate_barcode("4601234567890").is_ok());
//! assert!(validate_barcode("").is_err());
//! assert!(has_box_prefix("WB_100", "WB_"));
//! ```

use crate::error::ValidationError;
use crate::MAX_BARCODE_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Characters a decoder never legitimately reports inside one payload.
const FORBIDDEN_CHARS: [char; 3] = ['\0', '\r', '\n'];

/// Validates a raw decoder payload.
///
/// ## Rules
/// - Must not be empty or whitespace only
/// - Must be at most `MAX_BARCODE_LEN` characters
/// - Must not contain NUL, CR or LF
///
/// Other control characters pass through. KIZ DataMatrix codes are GS1
/// strings that separate their fields with `\x1d` (GS).
///
/// The payload itself is never trimmed or rewritten: the stored barcode is
/// exactly what the decoder reported.
pub fn validate_barcode(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if code.chars().count() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }

    if code.contains(&FORBIDDEN_CHARS[..]) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must not contain NUL or line breaks".to_string(),
        });
    }

    Ok(())
}

/// Validates a configured box prefix.
pub fn validate_box_prefix(prefix: &str) -> ValidationResult<()> {
    if prefix.is_empty() {
        return Err(ValidationError::Required {
            field: "box prefix".to_string(),
        });
    }

    if prefix.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "box prefix".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Returns true if `code` is a box identifier under `prefix`.
#[inline]
pub fn has_box_prefix(code: &str, prefix: &str) -> bool {
    code.starts_with(prefix)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("4601234567890").is_ok());
        assert!(validate_barcode("ABC123").is_ok());
        assert!(validate_barcode("WB_100").is_ok());
        assert!(validate_barcode(" padded ").is_ok());

        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("   ").is_err());
        assert!(validate_barcode("01\u{1d}21ABC").is_ok());
        assert!(validate_barcode("ABC\t123").is_ok());
        assert!(validate_barcode("ABC\n123").is_err());
        assert!(validate_barcode("ABC\r").is_err());
        assert!(validate_barcode("ABC\0").is_err());
        assert!(validate_barcode(&"9".repeat(MAX_BARCODE_LEN + 1)).is_err());
        assert!(validate_barcode(&"9".repeat(MAX_BARCODE_LEN)).is_ok());
    }

    #[test]
    fn test_validate_box_prefix() {
        assert!(validate_box_prefix("WB_").is_ok());
        assert!(validate_box_prefix("").is_err());
        assert!(validate_box_prefix("W B").is_err());
    }

    #[test]
    fn test_has_box_prefix() {
        assert!(has_box_prefix("WB_100", "WB_"));
        assert!(has_box_prefix("WB_", "WB_"));
        assert!(!has_box_prefix("wb_100", "WB_"));
        assert!(!has_box_prefix("XWB_100", "WB_"));
    }
}
