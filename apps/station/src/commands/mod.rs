//! # Station Commands
//!
//! Everything the driver can ask the station to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── scan.rs     ◄─── Operator actions, decode events, summary
//! ├── export.rs   ◄─── Generate, share and email the packing list
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Driver                                                                 │
//! │  ──────                                                                 │
//! │  {"type":"code128","data":"WB_100"}                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  fn on_decode(                                                          │
//! │      session: &SessionState,  ◄── Owned by the Station                 │
//! │      event: &DecodeEvent,     ◄── Parsed from the input line           │
//! │  ) -> Result<ScanOutcome, ApiError>                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Driver turns the result into Notices                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take the state they need as arguments and never print: the
//! driver decides what the operator sees.

pub mod config;
pub mod export;
pub mod scan;
