//! Error taxonomy shared by the engine and the runner.
//!
//! The split follows who is at fault and whether a retry makes sense:
//! - `InvalidInput` / `UnsupportedStrategy`: caller's fault, not retried.
//! - `Data`: provider failure, retriable by the caller with backoff.
//! - `OutOfOrderBar`: programmer error in replay sequencing, fatal to the run.
//! - `Cancelled`: cooperative cancellation between bars.
//!
//! Insufficient funds and missing positions are NOT errors — those signals
//! are dropped and logged by the portfolio simulator.

use crate::data::DataError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("data unavailable: {0}")]
    Data(#[from] DataError),

    #[error("out-of-order bar for '{symbol}': {date} arrived after {last_seen}")]
    OutOfOrderBar {
        symbol: String,
        date: NaiveDate,
        last_seen: NaiveDate,
    },

    #[error("unsupported strategy type: {0}")]
    UnsupportedStrategy(String),

    #[error("run cancelled before {next_date}")]
    Cancelled { next_date: NaiveDate },
}

impl BacktestError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
