//! Serializable backtest run configuration.

use chrono::NaiveDate;
use quantlab_core::config::StrategyConfig;
use quantlab_core::error::BacktestError;
use quantlab_core::sim::FillPolicy;
use serde::{Deserialize, Serialize};

/// All parameters needed to reproduce a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Symbols to trade; bars across symbols are interleaved by date so the
    /// shared cash constraint is meaningful.
    pub symbols: Vec<String>,

    /// Start date (inclusive).
    pub start: NaiveDate,

    /// End date (inclusive).
    pub end: NaiveDate,

    /// Strategy selection and parameters.
    pub strategy: StrategyConfig,

    pub initial_capital: f64,

    /// Fixed share count per fill.
    pub shares_per_trade: u64,

    /// Fill timing knob; defaults to close-price fills.
    #[serde(default)]
    pub fill_policy: FillPolicy,
}

impl RunConfig {
    /// Content-addressed run ID: BLAKE3 over the serialized config.
    ///
    /// Two identical configs share an ID, so callers can de-duplicate or
    /// cache results by it.
    pub fn run_id(&self) -> String {
        // Serialization of a config that round-trips through serde cannot
        // fail; fall back to a fixed tag rather than panicking mid-run.
        let json = serde_json::to_string(self).unwrap_or_else(|_| "unserializable".into());
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Input checks that do not require data: non-empty universe, ordered
    /// dates, positive capital and share size, valid strategy parameters.
    pub fn validate(&self) -> Result<(), BacktestError> {
        if self.symbols.is_empty() {
            return Err(BacktestError::invalid_input("empty symbol list"));
        }
        if self.start >= self.end {
            return Err(BacktestError::invalid_input(format!(
                "start date {} must be before end date {}",
                self.start, self.end
            )));
        }
        if !(self.initial_capital > 0.0) || !self.initial_capital.is_finite() {
            return Err(BacktestError::invalid_input(
                "initial_capital must be positive",
            ));
        }
        if self.shares_per_trade == 0 {
            return Err(BacktestError::invalid_input(
                "shares_per_trade must be >= 1",
            ));
        }
        self.strategy.validate()
    }
}
