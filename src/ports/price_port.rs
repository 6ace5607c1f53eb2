//! Closing price lookup port.

use crate::domain::error::PnlError;
use chrono::NaiveDate;

pub trait PriceSource {
    /// Close for the exact `(date, ticker)` pair; never interpolated.
    fn get(&self, date: NaiveDate, ticker: &str) -> Result<f64, PnlError>;

    /// Every date with at least one recorded price, ascending.
    fn dates(&self) -> Vec<NaiveDate>;
}
