//! Trade — one executed fill, appended to the run's trade log.

use super::signal::Action;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single executed fill.
///
/// The trade log is append-only: entries are created by the portfolio
/// simulator and never mutated afterwards. `realized_pnl` is present only
/// on sells: (fill price - average cost) * quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub action: Action,
    pub date: NaiveDate,
    pub price: f64,
    pub quantity: u64,
    pub realized_pnl: Option<f64>,
}

impl Trade {
    pub fn is_sell(&self) -> bool {
        self.action == Action::Sell
    }

    pub fn is_winner(&self) -> bool {
        self.realized_pnl.is_some_and(|pnl| pnl > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade() -> Trade {
        Trade {
            symbol: "SPY".into(),
            action: Action::Sell,
            date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
            price: 110.0,
            quantity: 50,
            realized_pnl: Some(500.0),
        }
    }

    #[test]
    fn winner_detection() {
        assert!(sample_trade().is_winner());
        let mut loser = sample_trade();
        loser.realized_pnl = Some(-10.0);
        assert!(!loser.is_winner());
    }

    #[test]
    fn buys_are_never_winners() {
        let mut buy = sample_trade();
        buy.action = Action::Buy;
        buy.realized_pnl = None;
        assert!(!buy.is_winner());
        assert!(!buy.is_sell());
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
