//! Domain error types.

use chrono::NaiveDate;

/// Rejection raised while constructing a [`Trade`](crate::domain::trade::Trade).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidTradeError {
    #[error("invalid quantity: {quantity}, it must be higher than 0")]
    NonPositiveQuantity { quantity: f64 },

    #[error("invalid trade side: '{side}', expected 'Buy' or 'Sell'")]
    InvalidSide { side: String },
}

/// Top-level error type for pnlcalc.
#[derive(Debug, thiserror::Error)]
pub enum PnlError {
    #[error(transparent)]
    InvalidTrade(#[from] InvalidTradeError),

    #[error("no price found for ticker '{ticker}' as of {date}")]
    PriceNotFound { ticker: String, date: NaiveDate },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PnlError {
    /// Process exit status reported by the CLI for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            PnlError::Io(_) => 1,
            PnlError::ConfigParse { .. }
            | PnlError::ConfigMissing { .. }
            | PnlError::ConfigInvalid { .. } => 2,
            PnlError::Data { .. } => 3,
            PnlError::InvalidTrade(_) => 4,
            PnlError::PriceNotFound { .. } => 5,
        }
    }
}

impl From<&PnlError> for std::process::ExitCode {
    fn from(err: &PnlError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
