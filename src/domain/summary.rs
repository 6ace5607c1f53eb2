//! Headline figures over a computed P&L table.

use chrono::NaiveDate;

use crate::domain::pnl::PnlRow;

#[derive(Debug, Clone, PartialEq)]
pub struct PnlSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub days: usize,
    pub realized: f64,
    pub unrealized: f64,
    pub total: f64,
    pub best_total: (NaiveDate, f64),
    pub worst_total: (NaiveDate, f64),
    /// Largest peak-to-trough fall of the total curve, in currency units.
    pub max_drawdown: f64,
}

impl PnlSummary {
    /// `None` for an empty table.
    pub fn from_rows(rows: &[PnlRow]) -> Option<Self> {
        let first = rows.first()?;
        let last = rows.last()?;

        let mut best = (first.date, first.total);
        let mut worst = (first.date, first.total);
        for row in rows {
            if row.total > best.1 {
                best = (row.date, row.total);
            }
            if row.total < worst.1 {
                worst = (row.date, row.total);
            }
        }

        Some(Self {
            first_date: first.date,
            last_date: last.date,
            days: rows.len(),
            realized: last.realized,
            unrealized: last.unrealized,
            total: last.total,
            best_total: best,
            worst_total: worst,
            max_drawdown: compute_drawdown(rows),
        })
    }
}

fn compute_drawdown(rows: &[PnlRow]) -> f64 {
    let Some(first) = rows.first() else {
        return 0.0;
    };

    let mut peak = first.total;
    let mut max_dd = 0.0_f64;
    for row in rows {
        if row.total > peak {
            peak = row.total;
        }
        let dd = peak - row.total;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd
}
