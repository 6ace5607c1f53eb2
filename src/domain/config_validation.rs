//! Configuration validation.
//!
//! Validates the `[pnl]` section before a calculation runs.

use crate::domain::error::PnlError;
use crate::domain::inventory::OrderingPolicy;
use crate::ports::config_port::ConfigPort;

pub const SECTION: &str = "pnl";

pub fn validate_pnl_config(config: &dyn ConfigPort) -> Result<(), PnlError> {
    validate_path(config, "trades_path")?;
    validate_path(config, "prices_path")?;
    parse_ordering_policy(config)?;
    Ok(())
}

fn validate_path(config: &dyn ConfigPort, key: &str) -> Result<(), PnlError> {
    match config.get_string(SECTION, key) {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(PnlError::ConfigInvalid {
            section: SECTION.to_string(),
            key: key.to_string(),
            reason: format!("{} must not be empty", key),
        }),
        None => Err(PnlError::ConfigMissing {
            section: SECTION.to_string(),
            key: key.to_string(),
        }),
    }
}

/// Reads `ordering_policy`, defaulting to FIFO when absent.
pub fn parse_ordering_policy(config: &dyn ConfigPort) -> Result<OrderingPolicy, PnlError> {
    match config.get_string(SECTION, "ordering_policy") {
        None => Ok(OrderingPolicy::default()),
        Some(s) => s.parse().map_err(|reason| PnlError::ConfigInvalid {
            section: SECTION.to_string(),
            key: "ordering_policy".to_string(),
            reason,
        }),
    }
}
