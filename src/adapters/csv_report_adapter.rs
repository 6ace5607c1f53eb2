//! CSV writer for the P&L table.

use crate::domain::error::PnlError;
use crate::domain::pnl::PnlRow;
use crate::ports::report_port::ReportPort;
use std::io::Write;

/// Output path that sends the table to stdout.
pub const STDOUT_PATH: &str = "-";

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_to<W: Write>(&self, rows: &[PnlRow], writer: W) -> Result<(), PnlError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in rows {
            wtr.serialize(row).map_err(|e| PnlError::Data {
                reason: format!("failed to write row for {}: {}", row.date, e),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, rows: &[PnlRow], output_path: &str) -> Result<(), PnlError> {
        if output_path == STDOUT_PATH {
            return self.write_to(rows, std::io::stdout().lock());
        }
        let file = std::fs::File::create(output_path)?;
        self.write_to(rows, file)
    }
}
