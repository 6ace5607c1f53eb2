//! CLI integration tests for settings resolution and file-backed runs.
//!
//! Tests cover:
//! - Merging command-line overrides over the `[pnl]` config section
//! - Full calculation from CSV files on disk
//! - Trade file validation
//! - CSV report output

mod common;

use approx::assert_relative_eq;
use common::*;
use pnlcalc::adapters::csv_report_adapter::{CsvReportAdapter, STDOUT_PATH};
use pnlcalc::adapters::file_config_adapter::FileConfigAdapter;
use pnlcalc::cli::{self, Overrides, RunSettings};
use pnlcalc::domain::error::PnlError;
use pnlcalc::domain::inventory::OrderingPolicy;
use pnlcalc::domain::pnl::PnlRow;
use pnlcalc::ports::report_port::ReportPort;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let trades = dir.join("trades.csv");
    let prices = dir.join("closing_prices.csv");
    fs::write(&trades, TRADES_CSV).unwrap();
    fs::write(&prices, PRICES_CSV).unwrap();
    (trades, prices)
}

const VALID_INI: &str = r#"
[pnl]
trades_path = data/trades.csv
prices_path = data/closing_prices.csv
ordering_policy = lifo
output = out/pnl.csv
summary = no
"#;

mod settings {
    use super::*;

    #[test]
    fn config_values_are_used() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let settings = cli::resolve_settings(Overrides::default(), Some(&adapter)).unwrap();

        assert_eq!(
            settings,
            RunSettings {
                trades_path: PathBuf::from("data/trades.csv"),
                prices_path: PathBuf::from("data/closing_prices.csv"),
                policy: OrderingPolicy::Lifo,
                output: "out/pnl.csv".to_string(),
                summary: false,
            }
        );
    }

    #[test]
    fn flags_override_config() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let overrides = Overrides {
            trades: Some(PathBuf::from("other.csv")),
            prices: None,
            policy: Some(OrderingPolicy::Fifo),
            output: Some(STDOUT_PATH.to_string()),
        };
        let settings = cli::resolve_settings(overrides, Some(&adapter)).unwrap();

        assert_eq!(settings.trades_path, PathBuf::from("other.csv"));
        assert_eq!(settings.prices_path, PathBuf::from("data/closing_prices.csv"));
        assert_eq!(settings.policy, OrderingPolicy::Fifo);
        assert_eq!(settings.output, "-");
    }

    #[test]
    fn defaults_without_optional_keys() {
        let adapter = FileConfigAdapter::from_string(
            "[pnl]\ntrades_path = t.csv\nprices_path = p.csv\n",
        )
        .unwrap();
        let settings = cli::resolve_settings(Overrides::default(), Some(&adapter)).unwrap();
        assert_eq!(settings.policy, OrderingPolicy::Fifo);
        assert_eq!(settings.output, STDOUT_PATH);
        assert!(settings.summary);
    }

    #[test]
    fn no_config_requires_both_paths() {
        let overrides = Overrides {
            trades: Some(PathBuf::from("t.csv")),
            ..Overrides::default()
        };
        let err = cli::resolve_settings(overrides, None).unwrap_err();
        match err {
            PnlError::ConfigMissing { key, .. } => assert_eq!(key, "prices_path"),
            other => panic!("expected ConfigMissing, got {other:?}"),
        }
    }

    #[test]
    fn invalid_policy_in_config() {
        let adapter = FileConfigAdapter::from_string(
            "[pnl]\ntrades_path = t.csv\nprices_path = p.csv\nordering_policy = avg\n",
        )
        .unwrap();
        assert!(matches!(
            cli::resolve_settings(Overrides::default(), Some(&adapter)),
            Err(PnlError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn load_config_missing_file() {
        let err = cli::load_config(&PathBuf::from("/nonexistent/pnl.ini")).err().unwrap();
        assert!(matches!(err, PnlError::ConfigParse { .. }));
    }
}

mod file_backed_run {
    use super::*;

    fn settings(dir: &TempDir, policy: OrderingPolicy) -> RunSettings {
        let (trades_path, prices_path) = write_inputs(dir.path());
        RunSettings {
            trades_path,
            prices_path,
            policy,
            output: dir.path().join("pnl.csv").display().to_string(),
            summary: true,
        }
    }

    #[test]
    fn run_calculation_from_csv() {
        let dir = TempDir::new().unwrap();
        let rows = cli::run_calculation(&settings(&dir, OrderingPolicy::Fifo)).unwrap();

        assert_eq!(rows.len(), 3);
        assert_relative_eq!(rows[0].total, 50.0, epsilon = 1e-9);
        assert_relative_eq!(rows[1].realized, 90.0, epsilon = 1e-9);
        assert_relative_eq!(rows[1].total, 75.0, epsilon = 1e-9);
        // short 10 @10.5 marked at 11
        assert_eq!(rows[2].date, date(2020, 3, 27));
        assert_relative_eq!(rows[2].realized, 90.0, epsilon = 1e-9);
        assert_relative_eq!(rows[2].unrealized, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn report_written_to_file() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir, OrderingPolicy::Lifo);
        let rows = cli::run_calculation(&settings).unwrap();
        CsvReportAdapter::new().write(&rows, &settings.output).unwrap();

        let mut rdr = csv::Reader::from_path(&settings.output).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["Date", "Realized", "Unrealized", "Total"]
        );
        let read: Vec<PnlRow> = rdr.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(read, rows);
    }

    #[test]
    fn missing_price_file_is_a_data_error() {
        let dir = TempDir::new().unwrap();
        let mut settings = settings(&dir, OrderingPolicy::Fifo);
        settings.prices_path = dir.path().join("missing.csv");
        assert!(matches!(
            cli::run_calculation(&settings),
            Err(PnlError::Data { .. })
        ));
    }
}

mod validate {
    use super::*;

    #[test]
    fn valid_file_reports_count() {
        let dir = TempDir::new().unwrap();
        let (trades, _) = write_inputs(dir.path());
        assert_eq!(cli::validate_trade_file(&trades).unwrap(), 3);
    }

    #[test]
    fn bad_side_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(
            &path,
            "Date,Ticker,Way,Quantity,Price\n2020-03-25,DUMMY,Buy,100,9.5\n2020-03-26,DUMMY,XXX,5,1\n",
        )
        .unwrap();
        let err = cli::validate_trade_file(&path).unwrap_err();
        assert_eq!(err.exit_status(), 4);
        assert_eq!(
            err.to_string(),
            "invalid trade side: 'XXX', expected 'Buy' or 'Sell'"
        );
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("neg.csv");
        fs::write(&path, "Date,Ticker,Way,Quantity,Price\n2020-03-25,DUMMY,Buy,-100,10\n").unwrap();
        assert!(matches!(
            cli::validate_trade_file(&path),
            Err(PnlError::InvalidTrade(_))
        ));
    }
}

mod shipped_sample {
    use super::*;

    #[test]
    fn sample_config_runs_end_to_end() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let adapter = cli::load_config(&root.join("pnlcalc.ini")).ok().unwrap();
        let mut settings = cli::resolve_settings(Overrides::default(), Some(&adapter)).unwrap();
        settings.trades_path = root.join(&settings.trades_path);
        settings.prices_path = root.join(&settings.prices_path);

        let rows = cli::run_calculation(&settings).unwrap();
        assert_eq!(rows.len(), 6);
        assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
        assert!(rows.iter().all(|r| (r.total - (r.realized + r.unrealized)).abs() < 1e-9));
    }
}
