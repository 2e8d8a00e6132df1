//! Portfolio — aggregate state of cash + open positions + run history.

use super::position::Position;
use super::trade::Trade;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One point on the equity curve: total portfolio value at a date's close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Aggregate portfolio state for one backtest run.
///
/// Mutated only by applying signals in bar order, never out of order. The
/// equity accounting identity must hold at every mark:
/// `value == cash + sum(position market values)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub positions: HashMap<String, Position>,
    pub equity_history: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            initial_capital,
            positions: HashMap::new(),
            equity_history: Vec::new(),
            trades: Vec::new(),
        }
    }

    /// Total equity = cash + sum of all position market values.
    ///
    /// A symbol with no entry in `prices` is valued at its average cost.
    pub fn equity(&self, prices: &HashMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .values()
            .map(|pos| {
                let price = prices.get(&pos.symbol).copied().unwrap_or(pos.avg_cost);
                pos.market_value(price)
            })
            .sum();
        self.cash + position_value
    }

    /// Whether a symbol has an open (non-flat) position.
    pub fn has_position(&self, symbol: &str) -> bool {
        self.positions.get(symbol).is_some_and(|p| !p.is_flat())
    }

    pub fn get_position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol).filter(|p| !p.is_flat())
    }
}
