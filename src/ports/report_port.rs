//! P&L table output port.

use crate::domain::error::PnlError;
use crate::domain::pnl::PnlRow;

/// Port for handing the computed P&L table to a presentation layer.
pub trait ReportPort {
    fn write(&self, rows: &[PnlRow], output_path: &str) -> Result<(), PnlError>;
}
