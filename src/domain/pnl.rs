//! Daily P&L time series: replays the trade feed through per-ticker
//! inventories and marks open lots against each date's close.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::domain::error::PnlError;
use crate::domain::inventory::{LotInventory, OrderingPolicy};
use crate::domain::trade::{Trade, TradeRecord};
use crate::ports::price_port::PriceSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Cumulative through `date`.
    #[serde(rename = "Realized")]
    pub realized: f64,
    /// Open lots marked at `date`'s close; not cumulative.
    #[serde(rename = "Unrealized")]
    pub unrealized: f64,
    #[serde(rename = "Total")]
    pub total: f64,
}

/// Union of trade dates and price dates, ascending, without duplicates.
pub fn build_calendar(trades: &[TradeRecord], prices: &dyn PriceSource) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = trades
        .iter()
        .map(|t| t.date)
        .chain(prices.dates())
        .collect();
    dates.into_iter().collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PnlCalculator {
    policy: OrderingPolicy,
}

impl PnlCalculator {
    pub fn new(policy: OrderingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OrderingPolicy {
        self.policy
    }

    /// One row per calendar date with cumulative realized, unrealized and
    /// total P&L.
    ///
    /// Every record is validated before any matching starts. Trades sharing
    /// a date are applied in feed order. A ticker with an open position on a
    /// date missing from `prices` aborts the run with
    /// [`PnlError::PriceNotFound`]; flat tickers never query the source.
    pub fn calculate(
        &self,
        trades: &[TradeRecord],
        prices: &dyn PriceSource,
    ) -> Result<Vec<PnlRow>, PnlError> {
        let validated = trades
            .iter()
            .map(Trade::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let dates = build_calendar(trades, prices);

        let mut trades_by_date: BTreeMap<NaiveDate, Vec<Trade>> = BTreeMap::new();
        // Ordered map so the cross-ticker unrealized sum is reproducible.
        let mut inventories: BTreeMap<String, LotInventory> = BTreeMap::new();
        for trade in validated {
            inventories
                .entry(trade.ticker.clone())
                .or_insert_with(|| LotInventory::new(self.policy));
            trades_by_date.entry(trade.date).or_default().push(trade);
        }

        debug!(
            policy = %self.policy,
            dates = dates.len(),
            tickers = inventories.len(),
            "starting P&L calculation"
        );

        let mut realized = 0.0;
        let mut rows = Vec::with_capacity(dates.len());

        for date in dates {
            if let Some(day_trades) = trades_by_date.remove(&date) {
                for trade in day_trades {
                    if let Some(inventory) = inventories.get_mut(&trade.ticker) {
                        realized += inventory.add_trade(trade);
                    }
                }
            }

            let mut unrealized = 0.0;
            for (ticker, inventory) in &inventories {
                if inventory.has_position() {
                    let close = prices.get(date, ticker)?;
                    unrealized += inventory.unrealized_pnl(close);
                }
            }

            debug!(%date, realized, unrealized, "marked positions");

            rows.push(PnlRow {
                date,
                realized,
                unrealized,
                total: realized + unrealized,
            });
        }

        Ok(rows)
    }
}
