//! # Scan Session
//!
//! The state machine that turns decode events into a packing list.
//!
//! ## State Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Scan Session State Machine                          │
//! │                                                                         │
//! │                 request_new_box()                                       │
//! │   ┌──────────┐ ─────────────────────► ┌──────────────────────┐         │
//! │   │   Idle   │                        │  AwaitingNewBoxScan  │──┐      │
//! │   │(disarmed)│ ◄───────────────────── │                      │  │ bad  │
//! │   └──────────┘   decode "WB_..."      └──────────────────────┘◄─┘ code │
//! │      │    ▲      (box started)                                          │
//! │      │    │                                                             │
//! │      │    │ product counted                                             │
//! │      │    │ (disarm)                                                    │
//! │      ▼    │                                                             │
//! │   ┌──────────────────────┐                                             │
//! │   │ AwaitingProductScan  │──┐ no active box (error)                    │
//! │   │       (armed)        │  │ box code (silently ignored)              │
//! │   └──────────────────────┘◄─┘                                          │
//! │      ▲                                                                  │
//! │      └── request_product_scan()                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Disarm After Each Product?
//! The decoder keeps reporting the same code for every camera frame the
//! label stays in view. One press of "scan item" counts exactly one unit.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::marking::{MarkingDetector, NoMarking};
use crate::types::{PackingList, ProductRecord, ProductTally, ScanMode, SessionSummary};
use crate::validation::{has_box_prefix, validate_barcode, validate_box_prefix};
use crate::DEFAULT_BOX_PREFIX;

// =============================================================================
// Rules
// =============================================================================

/// Rules that decide how decoded codes are classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRules {
    /// Prefix that identifies a box code.
    pub box_prefix: String,
}

impl ScanRules {
    /// Creates rules with a custom box prefix.
    pub fn with_box_prefix(prefix: impl Into<String>) -> CoreResult<Self> {
        let box_prefix = prefix.into();
        validate_box_prefix(&box_prefix)?;
        Ok(ScanRules { box_prefix })
    }
}

impl Default for ScanRules {
    fn default() -> Self {
        ScanRules {
            box_prefix: DEFAULT_BOX_PREFIX.to_string(),
        }
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Why a decode event was dropped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Neither a box scan nor a product scan was requested.
    Disarmed,
    /// A box code was decoded while scanning products.
    BoxCodeDuringProductScan,
}

/// Result of an accepted or silently dropped decode event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The event changed nothing.
    Ignored(IgnoreReason),

    /// A new current box was set.
    BoxStarted { box_id: String },

    /// A product was counted into the current box.
    ProductCounted {
        box_id: String,
        barcode: String,
        /// Quantity after this scan.
        quantity: u32,
        /// True if this scan created the record.
        first_in_box: bool,
    },
}

// =============================================================================
// Session
// =============================================================================

/// A scan session: current box, mode and the accumulated packing list.
///
/// ## Invariants
/// - A product is counted only when a box is active and the mode is
///   `AwaitingProductScan`
/// - Every accepted product scan adds exactly 1 to one record
/// - `has_marking` is decided once, when the record is created
/// - Rejected scans leave the session untouched
pub struct ScanSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    rules: ScanRules,
    marking: Arc<dyn MarkingDetector>,
    mode: ScanMode,
    current_box: Option<String>,
    list: PackingList,
}

impl ScanSession {
    /// Creates a session with the default rules and no marking detection.
    pub fn new() -> Self {
        Self::with_rules(ScanRules::default(), Arc::new(NoMarking))
    }

    /// Creates a session with custom rules and a marking detector.
    pub fn with_rules(rules: ScanRules, marking: Arc<dyn MarkingDetector>) -> Self {
        ScanSession {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            rules,
            marking,
            mode: ScanMode::Idle,
            current_box: None,
            list: PackingList::new(),
        }
    }

    // =========================================================================
    // Operator Actions
    // =========================================================================

    /// Interprets the next decode event as a box identifier.
    pub fn request_new_box(&mut self) {
        self.mode = ScanMode::AwaitingNewBoxScan;
    }

    /// Arms the session to count the next decode event as a product.
    ///
    /// A pending box request is replaced: the last operator action wins.
    pub fn request_product_scan(&mut self) {
        self.mode = ScanMode::AwaitingProductScan;
    }

    // =========================================================================
    // Decode Handling
    // =========================================================================

    /// Handles one decode event from the camera.
    ///
    /// ## Returns
    /// - `Ok(ScanOutcome)` when the event was accepted or silently dropped
    /// - `Err(CoreError::InvalidBoxCode)` when a box was expected and the code
    ///   lacks the prefix (still awaiting a box)
    /// - `Err(CoreError::NoActiveBox)` when a product arrives before any box
    /// - `Err(CoreError::Validation)` for empty or malformed payloads
    pub fn on_decode(&mut self, raw: &str) -> CoreResult<ScanOutcome> {
        match self.mode {
            ScanMode::Idle => Ok(ScanOutcome::Ignored(IgnoreReason::Disarmed)),
            ScanMode::AwaitingNewBoxScan => {
                validate_barcode(raw)?;
                self.start_box(raw)
            }
            ScanMode::AwaitingProductScan => {
                validate_barcode(raw)?;
                self.count_product(raw)
            }
        }
    }

    fn start_box(&mut self, raw: &str) -> CoreResult<ScanOutcome> {
        if !has_box_prefix(raw, &self.rules.box_prefix) {
            return Err(CoreError::InvalidBoxCode {
                code: raw.to_string(),
                prefix: self.rules.box_prefix.clone(),
            });
        }

        // The full code, prefix included, is the box id.
        let box_id = raw.to_string();
        self.list.boxes.entry(box_id.clone()).or_default();
        self.current_box = Some(box_id.clone());
        self.mode = ScanMode::Idle;

        Ok(ScanOutcome::BoxStarted { box_id })
    }

    fn count_product(&mut self, raw: &str) -> CoreResult<ScanOutcome> {
        let box_id = self.current_box.clone().ok_or(CoreError::NoActiveBox)?;

        if has_box_prefix(raw, &self.rules.box_prefix) {
            return Ok(ScanOutcome::Ignored(IgnoreReason::BoxCodeDuringProductScan));
        }

        let tally = self.list.boxes.entry(box_id.clone()).or_default();
        let first_in_box = !tally.products.contains_key(raw);
        let marking = &self.marking;
        let record = tally
            .products
            .entry(raw.to_string())
            .or_insert_with(|| ProductRecord::new(raw, marking.has_marking(raw)));
        record.quantity = record.quantity.saturating_add(1);
        let quantity = record.quantity;

        self.mode = ScanMode::Idle;

        Ok(ScanOutcome::ProductCounted {
            box_id,
            barcode: raw.to_string(),
            quantity,
            first_in_box,
        })
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// Session identifier (for logs).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current mode.
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Current box identifier, if a box was started.
    pub fn current_box(&self) -> Option<&str> {
        self.current_box.as_deref()
    }

    /// Rules this session classifies codes with.
    pub fn rules(&self) -> &ScanRules {
        &self.rules
    }

    /// The accumulated packing list.
    pub fn packing_list(&self) -> &PackingList {
        &self.list
    }

    /// Tally of the current box.
    pub fn current_tally(&self) -> Option<&ProductTally> {
        self.current_box
            .as_deref()
            .and_then(|box_id| self.list.tally(box_id))
    }

    /// Record for `barcode` in `box_id`.
    pub fn record(&self, box_id: &str, barcode: &str) -> Option<&ProductRecord> {
        self.list.record(box_id, barcode)
    }

    /// Overview for the operator screen.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id.to_string(),
            mode: self.mode,
            current_box: self.current_box.clone(),
            box_count: self.list.box_count(),
            product_lines: self.list.line_count(),
            total_units: self.list.total_units(),
            started_at: self.started_at,
        }
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScanSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanSession")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("current_box", &self.current_box)
            .field("rules", &self.rules)
            .field("boxes", &self.list.box_count())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
