//! Per-ticker lot inventory and the FIFO/LIFO matching engine.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::domain::trade::{Side, Trade};

/// Quantities within this of each other are treated as equal, so float
/// residue from fractional fills never leaves a dust lot behind.
pub const QTY_EPSILON: f64 = 1e-9;

/// Which end of the inventory an opposite-side trade offsets first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    #[default]
    Fifo,
    Lifo,
}

impl FromStr for OrderingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fifo" => Ok(OrderingPolicy::Fifo),
            "lifo" => Ok(OrderingPolicy::Lifo),
            other => Err(format!("unknown ordering policy '{other}', expected fifo or lifo")),
        }
    }
}

impl fmt::Display for OrderingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingPolicy::Fifo => write!(f, "FIFO"),
            OrderingPolicy::Lifo => write!(f, "LIFO"),
        }
    }
}

/// Open lots for one ticker, oldest at the front.
///
/// All lots share one side at any instant: the inventory is either flat,
/// long, or short, never both.
#[derive(Debug, Clone, PartialEq)]
pub struct LotInventory {
    policy: OrderingPolicy,
    lots: VecDeque<Trade>,
}

impl LotInventory {
    pub fn new(policy: OrderingPolicy) -> Self {
        Self {
            policy,
            lots: VecDeque::new(),
        }
    }

    pub fn policy(&self) -> OrderingPolicy {
        self.policy
    }

    pub fn has_position(&self) -> bool {
        !self.lots.is_empty()
    }

    pub fn lots(&self) -> &VecDeque<Trade> {
        &self.lots
    }

    pub fn open_quantity(&self) -> f64 {
        self.lots.iter().map(|lot| lot.quantity).sum()
    }

    pub fn side(&self) -> Option<Side> {
        self.lots.front().map(|lot| lot.side)
    }

    fn active_index(&self) -> Option<usize> {
        if self.lots.is_empty() {
            return None;
        }
        match self.policy {
            OrderingPolicy::Fifo => Some(0),
            OrderingPolicy::Lifo => Some(self.lots.len() - 1),
        }
    }

    /// Adds `trade` to the inventory and returns the P&L it realizes.
    ///
    /// Same-side trades (or any trade into a flat inventory) become a new
    /// lot and realize nothing. An opposite-side trade is consumed against
    /// the active lot, then the next, until it is absorbed; whatever is left
    /// once the inventory is flat opens a lot on the trade's side.
    pub fn add_trade(&mut self, mut trade: Trade) -> f64 {
        let mut realized = 0.0;

        loop {
            let idx = match self.active_index() {
                Some(i) if self.lots[i].side != trade.side => i,
                _ => {
                    trace!(%trade, "opening lot");
                    self.lots.push_back(trade);
                    return realized;
                }
            };

            let resting = &mut self.lots[idx];
            let sign = resting.side.sign();

            if trade.quantity < resting.quantity - QTY_EPSILON {
                resting.quantity -= trade.quantity;
                realized += trade.quantity * (trade.price - resting.price) * sign;
                trace!(lot = %resting, "reduced lot");
                return realized;
            }

            realized += resting.quantity * (trade.price - resting.price) * sign;
            trade.quantity -= resting.quantity;
            trace!(lot = %resting, "closed lot");
            match self.policy {
                OrderingPolicy::Fifo => self.lots.pop_front(),
                OrderingPolicy::Lifo => self.lots.pop_back(),
            };

            if trade.quantity <= QTY_EPSILON {
                return realized;
            }
        }
    }

    /// Mark-to-market P&L of every open lot against `mark_price`.
    pub fn unrealized_pnl(&self, mark_price: f64) -> f64 {
        self.lots.iter().map(|lot| lot.mtm_pnl(mark_price)).sum()
    }
}
