//! Provider traits and structured error types.
//!
//! `PriceSeriesProvider` abstracts over data sources (CSV archive, in-memory
//! fixture, synthetic generator) so the orchestrator can swap implementations
//! and tests can mock the boundary.

use crate::domain::Bar;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
///
/// All variants are retriable from the caller's point of view except
/// `Malformed`, which indicates the source itself is broken.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no data for '{symbol}': {reason}")]
    Unavailable { symbol: String, reason: String },

    #[error("malformed series for '{symbol}': {reason}")]
    Malformed { symbol: String, reason: String },

    #[error("io error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in '{path}': {reason}")]
    Parse { path: String, reason: String },
}

/// Supplies an ordered sequence of OHLCV bars for a symbol over a date range.
///
/// Implementations must return bars sorted strictly ascending by date with
/// no duplicates, all within `[start, end]`. An empty result is an error
/// (`DataError::Unavailable`), never an empty `Vec`.
pub trait PriceSeriesProvider {
    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError>;
}

/// One externally supplied sentiment observation for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentItem {
    pub timestamp: NaiveDateTime,
    /// Score in [-1, 1]; positive is bullish.
    pub score: f64,
    /// Headline-derived scores carry more weight than body text.
    pub from_title: bool,
}

/// Supplies sentiment observations for a symbol over a date range.
///
/// Called exactly once per run per symbol, before replay begins.
pub trait SentimentFeed {
    fn fetch_scores(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SentimentItem>, DataError>;
}
