//! Core domain types and logic.

pub mod trade;
pub mod inventory;
pub mod prices;
pub mod pnl;
pub mod summary;
pub mod config_validation;
pub mod error;
