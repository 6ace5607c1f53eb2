//! Trade feed port.

use crate::domain::error::PnlError;
use crate::domain::trade::TradeRecord;

pub trait TradeSource {
    /// Raw trade rows in feed order.
    fn load_trades(&self) -> Result<Vec<TradeRecord>, PnlError>;
}
