//! # State Module
//!
//! Application state for the station.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Station (driver)                           │   │
//! │  │  Station::new(session_state, config_state, share, mail, ...)    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │                 ┌────────────┴─────────────┐                            │
//! │                 ▼                          ▼                            │
//! │  ┌──────────────────────────┐  ┌──────────────────────────┐            │
//! │  │      SessionState        │  │       ConfigState        │            │
//! │  │                          │  │                          │            │
//! │  │  Arc<Mutex<ScanSession>> │  │  StationConfig           │            │
//! │  │                          │  │  (station.toml + env)    │            │
//! │  └──────────────────────────┘  └──────────────────────────┘            │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: Arc<Mutex<T>>, single writer at a time                │
//! │  • ConfigState: read-only after startup                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{
    ConfigError, ConfigState, ExportSettings, MailSettings, ScanSettings, ShareSettings,
    StationConfig, CONFIG_PATH_ENV,
};
pub use session::SessionState;
