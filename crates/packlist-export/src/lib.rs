//! # packlist-export: Export Formatter for Packlist
//!
//! Flattens a [`PackingList`](packlist_core::PackingList) into rows, encodes
//! them as an `.xlsx` workbook and writes it to a cache location that the
//! share and mail handoffs can point at.
//!
//! ## Export Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Packlist Export Flow                             │
//! │                                                                         │
//! │  PackingList snapshot (taken under the session lock)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  packlist-export (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     rows      │    │     xlsx      │    │    cache     │  │   │
//! │  │   │ build_rows()  │───►│ serialize()   │───►│  persist()   │  │   │
//! │  │   │ ExportRow     │    │ decode()      │    │ ExportHandle │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <cache dir>/PackingList.xlsx ──► share sheet / mailto:                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use packlist_export::{build_rows, persist, serialize, ExportCache, ExportLayout, DEFAULT_FILE_NAME};
//!
//! let layout = ExportLayout::default();
//! let bytes = serialize(build_rows(&list), &layout)?;
//! let cache = ExportCache::resolve(None, DEFAULT_FILE_NAME)?;
//! let handle = persist(&bytes, &cache).await?;
//! println!("{}", handle.uri);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod error;
pub mod rows;
pub mod xlsx;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::{persist, ExportCache, ExportHandle};
pub use error::{ExportError, ExportResult};
pub use rows::{build_rows, ExportRow, Rows};
pub use xlsx::{decode, serialize, ExportLayout, MarkingLabels, HEADERS};

/// MIME type of the exported workbook.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Uniform type identifier of the exported workbook (Apple platforms).
pub const XLSX_UTI: &str = "com.microsoft.excel.xlsx";

/// Default file name of the export inside the cache directory.
pub const DEFAULT_FILE_NAME: &str = "PackingList.xlsx";

/// Default worksheet name.
pub const DEFAULT_SHEET_NAME: &str = "My Sheet";
