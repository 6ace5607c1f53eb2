//! CSV trade feed and closing price adapters.

use crate::domain::error::PnlError;
use crate::domain::prices::HistPriceCollection;
use crate::domain::trade::TradeRecord;
use crate::ports::trade_port::TradeSource;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, PnlError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| PnlError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
}

/// Trade feed with headers `Date,Ticker,Way,Quantity,Price`.
pub struct CsvTradeAdapter {
    path: PathBuf,
}

impl CsvTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TradeSource for CsvTradeAdapter {
    fn load_trades(&self) -> Result<Vec<TradeRecord>, PnlError> {
        let mut rdr = open_reader(&self.path)?;
        let mut trades = Vec::new();

        for result in rdr.deserialize::<TradeRecord>() {
            let record = result.map_err(|e| PnlError::Data {
                reason: format!("{}: {}", self.path.display(), e),
            })?;
            trades.push(record);
        }

        debug!(path = %self.path.display(), count = trades.len(), "loaded trades");
        Ok(trades)
    }
}

#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Closing Price")]
    close: f64,
}

/// Closing prices with headers `Date,Ticker,Closing Price`.
pub struct CsvPriceAdapter {
    path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<HistPriceCollection, PnlError> {
        let mut rdr = open_reader(&self.path)?;
        let mut prices = HistPriceCollection::new();

        for result in rdr.deserialize::<PriceRecord>() {
            let record = result.map_err(|e| PnlError::Data {
                reason: format!("{}: {}", self.path.display(), e),
            })?;
            prices.add(record.date, &record.ticker, record.close);
        }

        debug!(path = %self.path.display(), count = prices.len(), "loaded prices");
        Ok(prices)
    }
}
