//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::{CsvPriceAdapter, CsvTradeAdapter};
use crate::adapters::csv_report_adapter::{CsvReportAdapter, STDOUT_PATH};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{parse_ordering_policy, validate_pnl_config, SECTION};
use crate::domain::error::PnlError;
use crate::domain::inventory::OrderingPolicy;
use crate::domain::pnl::{PnlCalculator, PnlRow};
use crate::domain::summary::PnlSummary;
use crate::domain::trade::Trade;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PriceSource;
use crate::ports::report_port::ReportPort;
use crate::ports::trade_port::TradeSource;

#[derive(Parser, Debug)]
#[command(name = "pnlcalc", about = "Daily realized/unrealized P&L from trades and closing prices")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the daily P&L table
    Calculate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        trades: Option<PathBuf>,
        #[arg(short, long)]
        prices: Option<PathBuf>,
        /// fifo or lifo
        #[arg(long)]
        policy: Option<OrderingPolicy>,
        /// Output CSV path, `-` for stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check every trade in a feed
    Validate {
        #[arg(short, long)]
        trades: PathBuf,
    },
    /// Show what a trade feed and price file contain
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        trades: Option<PathBuf>,
        #[arg(short, long)]
        prices: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Calculate {
            config,
            trades,
            prices,
            policy,
            output,
        } => {
            let overrides = Overrides {
                trades,
                prices,
                policy,
                output,
            };
            run_calculate(config.as_ref(), overrides)
        }
        Command::Validate { trades } => run_validate(&trades),
        Command::Info {
            config,
            trades,
            prices,
        } => run_info(config.as_ref(), trades, prices),
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub trades: Option<PathBuf>,
    pub prices: Option<PathBuf>,
    pub policy: Option<OrderingPolicy>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub trades_path: PathBuf,
    pub prices_path: PathBuf,
    pub policy: OrderingPolicy,
    pub output: String,
    pub summary: bool,
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, PnlError> {
    FileConfigAdapter::from_file(path).map_err(|e| PnlError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Merges flags over the `[pnl]` section. Without a config file both
/// input paths must come from flags.
pub fn resolve_settings(
    overrides: Overrides,
    config: Option<&dyn ConfigPort>,
) -> Result<RunSettings, PnlError> {
    let missing = |key: &str| PnlError::ConfigMissing {
        section: SECTION.to_string(),
        key: key.to_string(),
    };

    let Some(config) = config else {
        return Ok(RunSettings {
            trades_path: overrides.trades.ok_or_else(|| missing("trades_path"))?,
            prices_path: overrides.prices.ok_or_else(|| missing("prices_path"))?,
            policy: overrides.policy.unwrap_or_default(),
            output: overrides.output.unwrap_or_else(|| STDOUT_PATH.to_string()),
            summary: true,
        });
    };

    let trades_path = match overrides.trades {
        Some(p) => p,
        None => config
            .get_string(SECTION, "trades_path")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| missing("trades_path"))?,
    };
    let prices_path = match overrides.prices {
        Some(p) => p,
        None => config
            .get_string(SECTION, "prices_path")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| missing("prices_path"))?,
    };
    let policy = match overrides.policy {
        Some(p) => p,
        None => parse_ordering_policy(config)?,
    };
    let output = overrides
        .output
        .or_else(|| config.get_string(SECTION, "output"))
        .unwrap_or_else(|| STDOUT_PATH.to_string());

    Ok(RunSettings {
        trades_path,
        prices_path,
        policy,
        output,
        summary: config.get_bool(SECTION, "summary", true),
    })
}

/// Loads both inputs and computes the P&L table.
pub fn run_calculation(settings: &RunSettings) -> Result<Vec<PnlRow>, PnlError> {
    let trades = CsvTradeAdapter::new(settings.trades_path.clone()).load_trades()?;
    let prices = CsvPriceAdapter::new(settings.prices_path.clone()).load()?;

    info!(
        trades = trades.len(),
        prices = prices.len(),
        policy = %settings.policy,
        "running P&L calculation"
    );

    PnlCalculator::new(settings.policy).calculate(&trades, &prices)
}

fn run_calculate(config_path: Option<&PathBuf>, overrides: Overrides) -> ExitCode {
    let adapter = match config_path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            match load_config(path) {
                Ok(a) => Some(a),
                Err(e) => return report_error(&e),
            }
        }
        None => None,
    };

    // With overrides the file may legitimately be partial; resolve_settings
    // reports whatever is still missing.
    if let Some(adapter) = &adapter {
        let overridden =
            overrides.trades.is_some() || overrides.prices.is_some() || overrides.policy.is_some();
        if !overridden {
            if let Err(e) = validate_pnl_config(adapter) {
                return report_error(&e);
            }
        }
    }

    let settings = match resolve_settings(overrides, adapter.as_ref().map(|a| a as &dyn ConfigPort)) {
        Ok(s) => s,
        Err(e) => return report_error(&e),
    };

    let rows = match run_calculation(&settings) {
        Ok(rows) => rows,
        Err(e) => return report_error(&e),
    };

    if settings.summary {
        log_summary(&rows);
    }

    if let Err(e) = CsvReportAdapter::new().write(&rows, &settings.output) {
        return report_error(&e);
    }
    if settings.output != STDOUT_PATH {
        info!(path = %settings.output, rows = rows.len(), "P&L table written");
    }
    ExitCode::SUCCESS
}

fn log_summary(rows: &[PnlRow]) {
    let Some(s) = PnlSummary::from_rows(rows) else {
        warn!("no dates in trade feed or price file, P&L table is empty");
        return;
    };
    info!(
        from = %s.first_date,
        to = %s.last_date,
        days = s.days,
        "P&L summary"
    );
    info!(
        realized = %format!("{:.2}", s.realized),
        unrealized = %format!("{:.2}", s.unrealized),
        total = %format!("{:.2}", s.total),
        "final"
    );
    info!(
        best = %format!("{:.2} on {}", s.best_total.1, s.best_total.0),
        worst = %format!("{:.2} on {}", s.worst_total.1, s.worst_total.0),
        max_drawdown = %format!("{:.2}", s.max_drawdown),
        "total curve"
    );
}

/// Validates every record and returns the first rejection with its row.
pub fn validate_trade_file(path: &Path) -> Result<usize, PnlError> {
    let records = CsvTradeAdapter::new(path.to_path_buf()).load_trades()?;
    for (i, record) in records.iter().enumerate() {
        Trade::try_from(record).map_err(|e| {
            error!(row = i + 1, ticker = %record.ticker, date = %record.date, "rejected trade");
            PnlError::from(e)
        })?;
    }
    Ok(records.len())
}

fn run_validate(trades_path: &Path) -> ExitCode {
    info!(path = %trades_path.display(), "validating trades");
    match validate_trade_file(trades_path) {
        Ok(count) => {
            info!(count, "all trades are valid");
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

fn run_info(
    config_path: Option<&PathBuf>,
    trades: Option<PathBuf>,
    prices: Option<PathBuf>,
) -> ExitCode {
    let config = match config_path.map(load_config).transpose() {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };

    let trades = trades.or_else(|| {
        config
            .as_ref()
            .and_then(|c| c.get_string(SECTION, "trades_path"))
            .map(PathBuf::from)
    });
    let prices = prices.or_else(|| {
        config
            .as_ref()
            .and_then(|c| c.get_string(SECTION, "prices_path"))
            .map(PathBuf::from)
    });

    if trades.is_none() && prices.is_none() {
        error!("nothing to inspect: pass --trades and/or --prices (or --config)");
        return ExitCode::from(2);
    }

    if let Some(path) = trades {
        match CsvTradeAdapter::new(path.clone()).load_trades() {
            Ok(records) => {
                let tickers: BTreeSet<&str> = records.iter().map(|r| r.ticker.as_str()).collect();
                let ticker_list = tickers.iter().copied().collect::<Vec<_>>().join(", ");
                let first = records.iter().map(|r| r.date).min();
                let last = records.iter().map(|r| r.date).max();
                match (first, last) {
                    (Some(first), Some(last)) => println!(
                        "{}: {} trades, {} tickers ({}), {} to {}",
                        path.display(),
                        records.len(),
                        tickers.len(),
                        ticker_list,
                        first,
                        last
                    ),
                    _ => println!("{}: no trades", path.display()),
                }
            }
            Err(e) => return report_error(&e),
        }
    }

    if let Some(path) = prices {
        match CsvPriceAdapter::new(path.clone()).load() {
            Ok(collection) => {
                let dates = collection.dates();
                match (dates.first(), dates.last()) {
                    (Some(first), Some(last)) => println!(
                        "{}: {} prices, {} tickers, {} dates, {} to {}",
                        path.display(),
                        collection.len(),
                        collection.tickers().len(),
                        dates.len(),
                        first,
                        last
                    ),
                    _ => println!("{}: no prices", path.display()),
                }
            }
            Err(e) => return report_error(&e),
        }
    }

    ExitCode::SUCCESS
}

fn report_error(err: &PnlError) -> ExitCode {
    error!("{err}");
    err.into()
}
