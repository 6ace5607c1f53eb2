//! Historical closing prices keyed by date then ticker.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::domain::error::PnlError;
use crate::ports::price_port::PriceSource;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistPriceCollection {
    data: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

impl HistPriceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the close for `(date, ticker)`, replacing any earlier value.
    pub fn add(&mut self, date: NaiveDate, ticker: &str, price: f64) {
        self.data
            .entry(date)
            .or_default()
            .insert(ticker.to_string(), price);
    }

    /// Number of `(date, ticker)` prices held.
    pub fn len(&self) -> usize {
        self.data.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self
            .data
            .values()
            .flat_map(|by_ticker| by_ticker.keys().cloned())
            .collect();
        tickers.sort();
        tickers.dedup();
        tickers
    }
}

impl PriceSource for HistPriceCollection {
    fn get(&self, date: NaiveDate, ticker: &str) -> Result<f64, PnlError> {
        self.data
            .get(&date)
            .and_then(|by_ticker| by_ticker.get(ticker))
            .copied()
            .ok_or_else(|| PnlError::PriceNotFound {
                ticker: ticker.to_string(),
                date,
            })
    }

    fn dates(&self) -> Vec<NaiveDate> {
        self.data.keys().copied().collect()
    }
}
