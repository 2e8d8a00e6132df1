//! In-memory providers — fixtures for tests and embedding callers.

use super::provider::{DataError, PriceSeriesProvider, SentimentFeed, SentimentItem};
use super::validate_series;
use crate::domain::Bar;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Price provider backed by pre-loaded series, keyed by symbol.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    series: HashMap<String, Vec<Bar>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a full series for a symbol. Bars must already be sorted.
    pub fn insert(&mut self, symbol: impl Into<String>, bars: Vec<Bar>) {
        self.series.insert(symbol.into(), bars);
    }

    pub fn with_series(mut self, symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        self.insert(symbol, bars);
        self
    }
}

impl PriceSeriesProvider for MemoryProvider {
    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let bars: Vec<Bar> = self
            .series
            .get(symbol)
            .ok_or_else(|| DataError::Unavailable {
                symbol: symbol.to_string(),
                reason: "symbol not registered".into(),
            })?
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect();
        validate_series(symbol, &bars)?;
        Ok(bars)
    }
}

/// Sentiment feed backed by pre-loaded items, keyed by symbol.
#[derive(Debug, Default)]
pub struct MemorySentimentFeed {
    items: HashMap<String, Vec<SentimentItem>>,
}

impl MemorySentimentFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, items: Vec<SentimentItem>) {
        self.items.insert(symbol.into(), items);
    }

    pub fn with_items(mut self, symbol: impl Into<String>, items: Vec<SentimentItem>) -> Self {
        self.insert(symbol, items);
        self
    }
}

impl SentimentFeed for MemorySentimentFeed {
    fn fetch_scores(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SentimentItem>, DataError> {
        let items = self
            .items
            .get(symbol)
            .ok_or_else(|| DataError::Unavailable {
                symbol: symbol.to_string(),
                reason: "no sentiment registered".into(),
            })?
            .iter()
            .filter(|it| {
                let d = it.timestamp.date();
                d >= start && d <= end
            })
            .cloned()
            .collect();
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            symbol: "SPY".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn fetch_filters_by_range() {
        let provider =
            MemoryProvider::new().with_series("SPY", vec![bar(2, 100.0), bar(3, 101.0), bar(4, 102.0)]);
        let start = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        let bars = provider.fetch_series("SPY", start, end).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 101.0);
    }

    #[test]
    fn unknown_symbol_is_unavailable() {
        let provider = MemoryProvider::new();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let err = provider.fetch_series("SPY", start, end).unwrap_err();
        assert!(matches!(err, DataError::Unavailable { .. }));
    }

    #[test]
    fn range_with_no_bars_is_unavailable() {
        let provider = MemoryProvider::new().with_series("SPY", vec![bar(2, 100.0)]);
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert!(provider.fetch_series("SPY", start, end).is_err());
    }
}
