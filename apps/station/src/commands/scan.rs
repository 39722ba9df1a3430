//! # Scan Commands
//!
//! ## Scan Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Scan Cycle                                           │
//! │                                                                         │
//! │  ┌──────────┐ request_new_box ┌──────────────┐  "WB_…"   ┌──────────┐  │
//! │  │   Idle   │────────────────►│ Awaiting box │──────────►│   Idle   │  │
//! │  └──────────┘                 └──────────────┘           └──────────┘  │
//! │       ▲                              │ other code             │        │
//! │       │                              ▼                        │        │
//! │       │                        InvalidBoxCode                 │        │
//! │       │                        (still awaiting)               │        │
//! │       │                                     request_product_scan       │
//! │       │                                                       ▼        │
//! │       │       product code          ┌───────────────────────────┐      │
//! │       └─────────────────────────────│ Awaiting product          │      │
//! │          quantity += 1              └───────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use packlist_core::{DecodeEvent, ScanMode, ScanOutcome, SessionSummary};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::SessionState;

/// Arms the scanner for a box code.
pub fn request_new_box(session: &SessionState) -> ScanMode {
    debug!("request_new_box command");
    session.with_session_mut(|s| {
        s.request_new_box();
        s.mode()
    })
}

/// Arms the scanner for one product code.
pub fn request_product_scan(session: &SessionState) -> ScanMode {
    debug!("request_product_scan command");
    session.with_session_mut(|s| {
        s.request_product_scan();
        s.mode()
    })
}

/// Feeds one decode event to the session.
///
/// ## Returns
/// - `Ok(Ignored(..))` when the scanner was disarmed or a box code came in
///   during a product scan
/// - `Err` with `INVALID_BOX_CODE`, `NO_ACTIVE_BOX` or `VALIDATION_ERROR`
///   when the code was rejected; the session is unchanged
pub fn on_decode(session: &SessionState, event: &DecodeEvent) -> Result<ScanOutcome, ApiError> {
    debug!(symbology = %event.symbology, data = %event.data, "on_decode command");

    let outcome = session.with_session_mut(|s| s.on_decode(&event.data))?;

    match &outcome {
        ScanOutcome::BoxStarted { box_id } => info!(box_id = %box_id, "Box started"),
        ScanOutcome::ProductCounted {
            box_id,
            barcode,
            quantity,
            ..
        } => info!(box_id = %box_id, barcode = %barcode, quantity, "Product counted"),
        ScanOutcome::Ignored(reason) => debug!(?reason, "Decode ignored"),
    }

    Ok(outcome)
}

/// Gets the session overview.
pub fn get_summary(session: &SessionState) -> SessionSummary {
    debug!("get_summary command");
    session.with_session(|s| s.summary())
}
