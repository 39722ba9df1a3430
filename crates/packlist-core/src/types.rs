//! # Domain Types
//!
//! Packing list types shared by the session, the export formatter and the UI.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  PackingList                                                           │
//! │  └── box id ("WB_100") ──► ProductTally                                │
//! │                            ├── opened_at                               │
//! │                            └── barcode ──► ProductRecord               │
//! │                                            ├── barcode                 │
//! │                                            ├── quantity (≥ 1)          │
//! │                                            └── has_marking (KIZ)       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    ScanMode     │   │ SessionSummary  │   │  DecodeEvent    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Idle           │   │  box_count      │   │  type           │       │
//! │  │  AwaitingNewBox │   │  product_lines  │   │  data           │       │
//! │  │  AwaitingProduct│   │  total_units    │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both maps are `BTreeMap`, so iteration is box id then barcode, ascending.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Scan Mode
// =============================================================================

/// What the next decode event will be interpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Disarmed: decode events are ignored.
    #[default]
    Idle,
    /// The next decode event is a box identifier.
    AwaitingNewBoxScan,
    /// The next decode event is a product in the current box.
    AwaitingProductScan,
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanMode::Idle => write!(f, "idle"),
            ScanMode::AwaitingNewBoxScan => write!(f, "awaiting_new_box_scan"),
            ScanMode::AwaitingProductScan => write!(f, "awaiting_product_scan"),
        }
    }
}

// =============================================================================
// Product Record
// =============================================================================

/// A product counted in one box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Barcode exactly as decoded.
    pub barcode: String,

    /// Number of accepted scans of this barcode in this box.
    pub quantity: u32,

    /// KIZ marking flag, fixed when the record is created.
    pub has_marking: bool,
}

impl ProductRecord {
    /// Creates a record with no scans counted yet.
    pub fn new(barcode: impl Into<String>, has_marking: bool) -> Self {
        ProductRecord {
            barcode: barcode.into(),
            quantity: 0,
            has_marking,
        }
    }
}

// =============================================================================
// Product Tally
// =============================================================================

/// Products counted in one box, keyed by barcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductTally {
    /// Records keyed by product barcode.
    pub products: BTreeMap<String, ProductRecord>,

    /// When the box was started.
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
}

impl ProductTally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        ProductTally {
            products: BTreeMap::new(),
            opened_at: Utc::now(),
        }
    }

    /// Returns the record for `barcode`, if it was scanned into this box.
    pub fn get(&self, barcode: &str) -> Option<&ProductRecord> {
        self.products.get(barcode)
    }

    /// Number of distinct barcodes in the box.
    pub fn line_count(&self) -> usize {
        self.products.len()
    }

    /// Sum of all quantities in the box.
    pub fn total_units(&self) -> u64 {
        self.products.values().map(|p| u64::from(p.quantity)).sum()
    }

    /// Checks if no product was counted into this box yet.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for ProductTally {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Packing List
// =============================================================================

/// All boxes of a session, keyed by box identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PackingList {
    /// Tallies keyed by box barcode.
    pub boxes: BTreeMap<String, ProductTally>,
}

impl PackingList {
    /// Creates an empty packing list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tally of `box_id`.
    pub fn tally(&self, box_id: &str) -> Option<&ProductTally> {
        self.boxes.get(box_id)
    }

    /// Returns the record for `barcode` inside `box_id`.
    pub fn record(&self, box_id: &str, barcode: &str) -> Option<&ProductRecord> {
        self.boxes.get(box_id).and_then(|tally| tally.get(barcode))
    }

    /// Number of boxes that hold a tally.
    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    /// Number of (box, product) pairs, i.e. export rows.
    pub fn line_count(&self) -> usize {
        self.boxes.values().map(ProductTally::line_count).sum()
    }

    /// Sum of all quantities across all boxes.
    pub fn total_units(&self) -> u64 {
        self.boxes.values().map(ProductTally::total_units).sum()
    }

    /// Checks if nothing has been counted yet.
    pub fn is_empty(&self) -> bool {
        self.boxes.values().all(ProductTally::is_empty)
    }
}

// =============================================================================
// Session Summary
// =============================================================================

/// Read-only overview of a scan session for the operator screen.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub mode: ScanMode,
    pub current_box: Option<String>,
    pub box_count: usize,
    pub product_lines: usize,
    #[ts(type = "number")]
    pub total_units: u64,
    #[ts(as = "String")]
    pub started_at: DateTime<Utc>,
}

// =============================================================================
// Decode Event
// =============================================================================

/// A code reported by the camera decoder.
///
/// Only `data` matters to the session; `type` is the symbology name and is
/// kept for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DecodeEvent {
    #[serde(rename = "type", default)]
    pub symbology: String,
    pub data: String,
}

impl DecodeEvent {
    /// Creates a decode event with an unknown symbology.
    pub fn new(data: impl Into<String>) -> Self {
        DecodeEvent {
            symbology: String::new(),
            data: data.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
