//! # Packlist Station Library
//!
//! Wires configuration, the scan session and the export chain into a
//! line-driven station.
//!
//! ## Module Organization
//! ```text
//! packlist_station/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── driver.rs       ◄─── Input parsing and the read loop
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Scan session behind a mutex
//! │   └── config.rs   ◄─── station.toml + PACKLIST_* overrides
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── scan.rs     ◄─── Operator actions and decode events
//! │   ├── export.rs   ◄─── Generate, share, email
//! │   └── config.rs   ◄─── Configuration retrieval
//! ├── handoff.rs      ◄─── Share sheet and mail collaborators
//! ├── notice.rs       ◄─── Operator notices
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Station Startup                                   │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: info,packlist=debug, override with RUST_LOG              │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • $PACKLIST_CONFIG or the platform config dir (station.toml)        │
//! │     • PACKLIST_* environment overrides                                  │
//! │                                                                         │
//! │  3. Initialize State ─────────────────────────────────────────────────► │
//! │     • SessionState: fresh ScanSession with the configured rules         │
//! │     • ConfigState: read-only configuration                              │
//! │                                                                         │
//! │  4. Read stdin until EOF or :quit ────────────────────────────────────► │
//! │     • Notices on stdout, logs on stderr                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod driver;
pub mod error;
pub mod handoff;
pub mod notice;
pub mod state;

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use driver::Station;
use error::ApiError;
use state::ConfigState;

/// Runs the station on stdin until end of input.
pub async fn run() -> Result<(), ApiError> {
    init_tracing();

    info!("Starting Packlist station");

    let config = ConfigState::load(None)?;
    info!(source = ?config.source(), "Configuration loaded");

    let station = Station::from_config(config)?;
    let summary = station.session().with_session(|s| s.summary());
    info!(session_id = %summary.session_id, "Session started");

    let stdin = BufReader::new(tokio::io::stdin());
    driver::run_loop(&station, stdin)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read input: {}", e)))?;

    let summary = commands::scan::get_summary(station.session());
    info!(
        boxes = summary.box_count,
        lines = summary.product_lines,
        units = summary.total_units,
        "Station stopped"
    );
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=packlist=trace` - Show trace for packlist crates only
/// - Default: info, debug for packlist crates
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,packlist=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
