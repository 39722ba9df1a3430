//! # Config Commands

use tracing::debug;

use crate::state::{ConfigState, StationConfig};

/// Gets the effective station configuration.
///
/// ## Returns
/// Configuration after file and environment overrides (read-only)
pub fn get_config(config: &ConfigState) -> StationConfig {
    debug!(source = ?config.source(), "get_config command");
    config.config().clone()
}
