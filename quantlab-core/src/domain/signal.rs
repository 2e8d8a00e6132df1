//! Signal — a strategy's per-bar trading decision.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trading action for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

/// A strategy's decision for one bar of one symbol.
///
/// Produced at most once per bar per symbol. `price` is the bar's close —
/// the reference price at decision time, not necessarily the fill price
/// (next-open fills use the following bar's open).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub date: NaiveDate,
    pub action: Action,
    pub price: f64,
}

impl Signal {
    pub fn new(symbol: impl Into<String>, date: NaiveDate, action: Action, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            action,
            price,
        }
    }

    /// Convenience constructor for the common no-op case.
    pub fn hold(symbol: impl Into<String>, date: NaiveDate, price: f64) -> Self {
        Self::new(symbol, date, Action::Hold, price)
    }

    pub fn is_hold(&self) -> bool {
        self.action == Action::Hold
    }
}
