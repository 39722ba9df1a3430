//! # Packlist Station Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Packlist Station                                 │
//! │                                                                         │
//! │  camera decoder / keyboard wedge / operator                            │
//! │            │  stdin lines                                               │
//! │            ▼                                                            │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Backend (this crate)                     │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Starts the runtime                               │  │
//! │  │  lib.rs ─────► Logging, config, state, read loop                │  │
//! │  │  commands/ ──► request_new_box, on_decode, share, email         │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  <cache dir>/PackingList.xlsx ──► share program / mailto:              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match packlist_station::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("packlist-station: {}", e);
            ExitCode::FAILURE
        }
    }
}
