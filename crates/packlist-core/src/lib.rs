//! # packlist-core: Pure Scan Logic for Packlist
//!
//! This crate holds the scan session state machine and the packing list it
//! accumulates. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Packlist Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Camera / Operator                            │   │
//! │  │    decode events ──► "New box" ──► "Scan item" ──► Share/Email  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Station Commands                             │   │
//! │  │    on_decode, request_new_box, share_export, email_export       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ packlist-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  session  │  │  marking  │  │ validation│  │   │
//! │  │   │ Record    │  │ ScanMode  │  │ Detector  │  │  barcode  │  │   │
//! │  │   │ Tally     │  │ on_decode │  │ NoMarking │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO NETWORK • PURE STATE                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               packlist-export (Export Formatter)                │   │
//! │  │              rows, xlsx bytes, cache file handle                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Packing list types (ProductRecord, ProductTally, PackingList)
//! - [`session`] - The scan session state machine
//! - [`marking`] - Pluggable KIZ marking predicate
//! - [`error`] - Domain error types
//! - [`validation`] - Barcode validation
//!
//! ## Example Usage
//!
//! ```rust
//! use packlist_core::session::ScanSession;
//!
//! let mut session = ScanSession::new();
//!
//! session.request_new_box();
//! session.on_decode("WB_100").unwrap();
//!
//! session.request_product_scan();
//! session.on_decode("4601234567890").unwrap();
//!
//! let record = session.record("WB_100", "4601234567890").unwrap();
//! assert_eq!(record.quantity, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod marking;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use marking::{MarkingDetector, NoMarking};
pub use session::{IgnoreReason, ScanOutcome, ScanRules, ScanSession};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix that marks a decoded code as a box identifier.
pub const DEFAULT_BOX_PREFIX: &str = "WB_";

/// Longest payload accepted from the decoder.
///
/// Camera decoders occasionally report garbage from damaged labels; QR
/// payloads on shipping cartons stay far below this.
pub const MAX_BARCODE_LEN: usize = 256;
