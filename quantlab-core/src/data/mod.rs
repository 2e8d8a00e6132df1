//! Data providers — the boundary between the engine and the outside world.
//!
//! The engine never fetches data itself; it consumes ordered bar series
//! through the [`PriceSeriesProvider`] trait and per-day sentiment through
//! [`SentimentFeed`]. Implementations here cover flat-file CSV archives,
//! in-memory fixtures, and seeded synthetic random walks.

mod csv_provider;
mod memory;
mod provider;
mod synthetic;

pub use csv_provider::CsvProvider;
pub use memory::{MemoryProvider, MemorySentimentFeed};
pub use provider::{DataError, PriceSeriesProvider, SentimentFeed, SentimentItem};
pub use synthetic::SyntheticProvider;

use crate::domain::Bar;
use chrono::NaiveDate;

/// Validate a fetched series: non-empty, sane bars, strictly ascending dates,
/// consistent symbol.
///
/// Providers call this before returning so the orchestrator can rely on
/// ordering without re-checking.
pub fn validate_series(symbol: &str, bars: &[Bar]) -> Result<(), DataError> {
    if bars.is_empty() {
        return Err(DataError::Unavailable {
            symbol: symbol.to_string(),
            reason: "empty series for requested range".into(),
        });
    }
    let mut last: Option<NaiveDate> = None;
    for bar in bars {
        if bar.symbol != symbol {
            return Err(DataError::Malformed {
                symbol: symbol.to_string(),
                reason: format!("bar for '{}' in series for '{symbol}'", bar.symbol),
            });
        }
        if !bar.is_sane() {
            return Err(DataError::Malformed {
                symbol: symbol.to_string(),
                reason: format!("insane OHLCV at {}", bar.date),
            });
        }
        if let Some(prev) = last {
            if bar.date <= prev {
                return Err(DataError::Malformed {
                    symbol: symbol.to_string(),
                    reason: format!("dates not strictly ascending at {}", bar.date),
                });
            }
        }
        last = Some(bar.date);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(symbol: &str, day: u32, close: f64) -> Bar {
        Bar {
            symbol: symbol.into(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn empty_series_is_unavailable() {
        let err = validate_series("SPY", &[]).unwrap_err();
        assert!(matches!(err, DataError::Unavailable { .. }));
    }

    #[test]
    fn duplicate_date_is_malformed() {
        let bars = vec![bar("SPY", 2, 100.0), bar("SPY", 2, 101.0)];
        let err = validate_series("SPY", &bars).unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }

    #[test]
    fn descending_dates_are_malformed() {
        let bars = vec![bar("SPY", 3, 100.0), bar("SPY", 2, 101.0)];
        assert!(validate_series("SPY", &bars).is_err());
    }

    #[test]
    fn wrong_symbol_is_malformed() {
        let bars = vec![bar("QQQ", 2, 100.0)];
        assert!(validate_series("SPY", &bars).is_err());
    }

    #[test]
    fn well_formed_series_passes() {
        let bars = vec![bar("SPY", 2, 100.0), bar("SPY", 3, 101.0)];
        assert!(validate_series("SPY", &bars).is_ok());
    }
}
