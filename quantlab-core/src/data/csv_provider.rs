//! Flat-file CSV archive provider.
//!
//! One file per symbol (`{SYMBOL}.csv`) with header
//! `date,open,high,low,close,volume` and ISO dates. Rows outside the
//! requested range are skipped; the remaining series is validated before
//! it is returned.

use super::provider::{DataError, PriceSeriesProvider};
use super::validate_series;
use crate::domain::Bar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Price provider reading a directory of per-symbol CSV files.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    root: PathBuf,
}

impl CsvProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{symbol}.csv"))
    }
}

impl PriceSeriesProvider for CsvProvider {
    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol);
        let bars = read_csv_bars(&path, symbol, start, end)?;
        validate_series(symbol, &bars)?;
        Ok(bars)
    }
}

fn read_csv_bars(
    path: &Path,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Bar>, DataError> {
    let display = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|e| match e.kind() {
        csv::ErrorKind::Io(_) => DataError::Unavailable {
            symbol: symbol.to_string(),
            reason: format!("cannot open '{display}'"),
        },
        _ => DataError::Parse {
            path: display.clone(),
            reason: e.to_string(),
        },
    })?;

    let mut bars = Vec::new();
    for record in reader.deserialize::<CsvRow>() {
        let row = record.map_err(|e| DataError::Parse {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        if row.date < start || row.date > end {
            continue;
        }
        bars.push(Bar {
            symbol: symbol.to_string(),
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &Path, symbol: &str, body: &str) {
        let mut file = std::fs::File::create(dir.join(format!("{symbol}.csv"))).unwrap();
        writeln!(file, "date,open,high,low,close,volume").unwrap();
        write!(file, "{body}").unwrap();
    }

    #[test]
    fn reads_and_filters_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "SPY",
            "2024-01-02,100,101,99,100.5,1000\n\
             2024-01-03,100.5,102,100,101.5,1100\n\
             2024-01-04,101.5,103,101,102.5,1200\n",
        );
        let provider = CsvProvider::new(dir.path());
        let start = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        let bars = provider.fetch_series("SPY", start, end).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, start);
        assert_eq!(bars[1].close, 102.5);
        assert_eq!(bars[1].volume, 1200);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvProvider::new(dir.path());
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let err = provider.fetch_series("SPY", start, end).unwrap_err();
        assert!(matches!(err, DataError::Unavailable { .. }));
    }

    #[test]
    fn garbage_row_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "SPY", "2024-01-02,not_a_number,101,99,100.5,1000\n");
        let provider = CsvProvider::new(dir.path());
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let err = provider.fetch_series("SPY", start, end).unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
    }

    #[test]
    fn unsorted_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "SPY",
            "2024-01-03,100,101,99,100.5,1000\n\
             2024-01-02,100,101,99,100.5,1000\n",
        );
        let provider = CsvProvider::new(dir.path());
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let err = provider.fetch_series("SPY", start, end).unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }
}
