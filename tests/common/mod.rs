#![allow(dead_code)]

use chrono::NaiveDate;
use pnlcalc::domain::error::PnlError;
use pnlcalc::domain::prices::HistPriceCollection;
pub use pnlcalc::domain::trade::TradeRecord;
use pnlcalc::ports::price_port::PriceSource;
use std::cell::RefCell;

/// Price source that records every lookup it serves.
pub struct MockPriceSource {
    pub inner: HistPriceCollection,
    pub lookups: RefCell<Vec<(NaiveDate, String)>>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            inner: HistPriceCollection::new(),
            lookups: RefCell::new(Vec::new()),
        }
    }

    pub fn with_price(mut self, day: &str, ticker: &str, close: f64) -> Self {
        self.inner.add(parse_date(day), ticker, close);
        self
    }

    pub fn looked_up(&self, ticker: &str) -> bool {
        self.lookups.borrow().iter().any(|(_, t)| t == ticker)
    }
}

impl PriceSource for MockPriceSource {
    fn get(&self, date: NaiveDate, ticker: &str) -> Result<f64, PnlError> {
        self.lookups.borrow_mut().push((date, ticker.to_string()));
        self.inner.get(date, ticker)
    }

    fn dates(&self) -> Vec<NaiveDate> {
        self.inner.dates()
    }
}

pub fn parse_date(day: &str) -> NaiveDate {
    NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn rec(day: &str, ticker: &str, way: &str, quantity: f64, price: f64) -> TradeRecord {
    TradeRecord::new(parse_date(day), ticker, way, quantity, price)
}

/// The two-day DUMMY scenario: long 100, flip short through a 120 sell,
/// then partially cover.
pub fn dummy_scenario() -> (Vec<TradeRecord>, HistPriceCollection) {
    let mut prices = HistPriceCollection::new();
    prices.add(date(2020, 3, 25), "DUMMY", 10.0);
    prices.add(date(2020, 3, 26), "DUMMY", 12.0);
    let trades = vec![
        rec("2020-03-25", "DUMMY", "Buy", 100.0, 9.5),
        rec("2020-03-26", "DUMMY", "Sell", 120.0, 10.5),
        rec("2020-03-26", "DUMMY", "Buy", 10.0, 11.5),
    ];
    (trades, prices)
}

pub const TRADES_CSV: &str = "Date,Ticker,Way,Quantity,Price
2020-03-25,DUMMY,Buy,100,9.5
2020-03-26,DUMMY,Sell,120,10.5
2020-03-26,DUMMY,Buy,10,11.5
";

pub const PRICES_CSV: &str = "Date,Ticker,Closing Price
2020-03-25,DUMMY,10
2020-03-26,DUMMY,12
2020-03-27,DUMMY,11
";
