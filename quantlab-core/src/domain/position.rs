use serde::{Deserialize, Serialize};

/// An open long position in one symbol.
///
/// Owned exclusively by the portfolio for the duration of a run.
/// Quantity is a whole-share count; `avg_cost` is recomputed as a weighted
/// average on every buy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: u64,
    pub avg_cost: f64,
}

impl Position {
    pub fn new(symbol: impl Into<String>, quantity: u64, avg_cost: f64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            avg_cost,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == 0
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.quantity as f64 * current_price
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.quantity as f64 * (current_price - self.avg_cost)
    }

    /// Fold `quantity` shares bought at `price` into the weighted average cost.
    pub fn add_shares(&mut self, quantity: u64, price: f64) {
        let total = self.quantity + quantity;
        if total == 0 {
            return;
        }
        self.avg_cost = (self.avg_cost * self.quantity as f64 + price * quantity as f64)
            / total as f64;
        self.quantity = total;
    }
}
