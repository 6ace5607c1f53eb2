//! Trade value object and the raw feed record it is built from.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidTradeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// +1 for a long (Buy) exposure, -1 for a short (Sell) one.
    pub fn sign(self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }
}

impl FromStr for Side {
    type Err = InvalidTradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Buy" => Ok(Side::Buy),
            "Sell" => Ok(Side::Sell),
            other => Err(InvalidTradeError::InvalidSide {
                side: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// One row of the trade feed, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Way")]
    pub way: String,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    #[serde(rename = "Price")]
    pub price: f64,
}

impl TradeRecord {
    pub fn new(date: NaiveDate, ticker: &str, way: &str, quantity: f64, price: f64) -> Self {
        Self {
            date,
            ticker: ticker.to_string(),
            way: way.to_string(),
            quantity,
            price,
        }
    }
}

/// A validated execution. When held inside an inventory, `quantity` is the
/// remaining unmatched size of the lot.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub ticker: String,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
}

impl Trade {
    /// Quantity is checked before side, so a record that is wrong on both
    /// counts reports the quantity.
    pub fn new(
        date: NaiveDate,
        ticker: &str,
        way: &str,
        quantity: f64,
        price: f64,
    ) -> Result<Self, InvalidTradeError> {
        if quantity.is_nan() || quantity <= 0.0 {
            return Err(InvalidTradeError::NonPositiveQuantity { quantity });
        }
        let side = way.parse::<Side>()?;
        Ok(Self {
            date,
            ticker: ticker.to_string(),
            side,
            quantity: quantity.abs(),
            price,
        })
    }

    /// Cash exchanged by the trade: paid out on a buy, received on a sell.
    pub fn cashflow(&self) -> f64 {
        -self.side.sign() * self.quantity * self.price
    }

    /// Mark-to-market P&L of the trade against `mark_price`.
    pub fn mtm_pnl(&self, mark_price: f64) -> f64 {
        (mark_price - self.price) * self.quantity * self.side.sign()
    }
}

impl TryFrom<&TradeRecord> for Trade {
    type Error = InvalidTradeError;

    fn try_from(record: &TradeRecord) -> Result<Self, Self::Error> {
        Trade::new(
            record.date,
            &record.ticker,
            &record.way,
            record.quantity,
            record.price,
        )
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} '{}' @{} ({})",
            self.side,
            self.quantity,
            self.ticker,
            self.price,
            self.date.format("%Y-%m-%d")
        )
    }
}
