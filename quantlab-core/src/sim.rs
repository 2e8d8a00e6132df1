//! Portfolio simulator — applies signals to the cash/position ledger.
//!
//! Fill rules:
//! - Buy needs `cash >= price * shares_per_trade`; otherwise the signal is
//!   dropped and logged, never fatal.
//! - Sell needs an existing position with at least `shares_per_trade`
//!   shares; otherwise dropped and logged.
//! - `FillPolicy::Close` (default) fills at the signal bar's close.
//!   `FillPolicy::NextOpen` defers the signal and fills at the next bar's
//!   open for that symbol; a deferred signal with no following bar expires.
//!
//! Equity is marked once per date, after all of that date's bars have been
//! applied, using last-known closes.

use crate::domain::{Action, Bar, EquityPoint, Portfolio, Position, Signal, Trade};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// When simulated fills execute relative to the signal bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Fill at the signal bar's close price.
    #[default]
    Close,
    /// Fill at the next bar's open price for the same symbol.
    NextOpen,
}

#[derive(Debug)]
pub struct PortfolioSim {
    portfolio: Portfolio,
    shares_per_trade: u64,
    fill_policy: FillPolicy,
    /// Deferred next-open signals, at most one per symbol.
    pending: HashMap<String, Action>,
    /// Last close seen per symbol, for mark-to-market.
    last_close: HashMap<String, f64>,
}

impl PortfolioSim {
    pub fn new(initial_capital: f64, shares_per_trade: u64, fill_policy: FillPolicy) -> Self {
        Self {
            portfolio: Portfolio::new(initial_capital),
            shares_per_trade,
            fill_policy,
            pending: HashMap::new(),
            last_close: HashMap::new(),
        }
    }

    /// Process one bar and its signal.
    ///
    /// Any pending next-open fill for this symbol executes first, at this
    /// bar's open. Then the new signal either fills at close or is deferred,
    /// per policy.
    pub fn on_bar(&mut self, bar: &Bar, signal: &Signal) {
        debug_assert_eq!(signal.symbol, bar.symbol);
        debug_assert_eq!(signal.date, bar.date);

        if let Some(action) = self.pending.remove(&bar.symbol) {
            self.execute(&bar.symbol, action, bar.date, bar.open);
        }

        if signal.action != Action::Hold {
            match self.fill_policy {
                FillPolicy::Close => {
                    self.execute(&bar.symbol, signal.action, bar.date, bar.close);
                }
                FillPolicy::NextOpen => {
                    self.pending.insert(bar.symbol.clone(), signal.action);
                }
            }
        }

        self.last_close.insert(bar.symbol.clone(), bar.close);
    }

    /// Append one equity point for `date` from last-known closes.
    pub fn mark_to_market(&mut self, date: NaiveDate) {
        let value = self.portfolio.equity(&self.last_close);
        self.portfolio.equity_history.push(EquityPoint { date, value });
    }

    fn execute(&mut self, symbol: &str, action: Action, date: NaiveDate, price: f64) {
        match action {
            Action::Buy => self.execute_buy(symbol, date, price),
            Action::Sell => self.execute_sell(symbol, date, price),
            Action::Hold => {}
        }
    }

    fn execute_buy(&mut self, symbol: &str, date: NaiveDate, price: f64) {
        let quantity = self.shares_per_trade;
        let cost = price * quantity as f64;
        if self.portfolio.cash < cost {
            debug!(
                symbol,
                %date,
                price,
                cash = self.portfolio.cash,
                cost,
                "buy dropped: insufficient funds"
            );
            return;
        }
        self.portfolio.cash -= cost;
        self.portfolio
            .positions
            .entry(symbol.to_string())
            .or_insert_with(|| Position::new(symbol, 0, 0.0))
            .add_shares(quantity, price);
        self.portfolio.trades.push(Trade {
            symbol: symbol.to_string(),
            action: Action::Buy,
            date,
            price,
            quantity,
            realized_pnl: None,
        });
    }

    fn execute_sell(&mut self, symbol: &str, date: NaiveDate, price: f64) {
        let quantity = self.shares_per_trade;
        let Some(position) = self.portfolio.positions.get_mut(symbol) else {
            debug!(symbol, %date, price, "sell dropped: no position");
            return;
        };
        if position.quantity < quantity {
            debug!(
                symbol,
                %date,
                price,
                held = position.quantity,
                wanted = quantity,
                "sell dropped: position too small"
            );
            return;
        }
        let realized = (price - position.avg_cost) * quantity as f64;
        position.quantity -= quantity;
        let flat = position.is_flat();
        if flat {
            self.portfolio.positions.remove(symbol);
        }
        self.portfolio.cash += price * quantity as f64;
        self.portfolio.trades.push(Trade {
            symbol: symbol.to_string(),
            action: Action::Sell,
            date,
            price,
            quantity,
            realized_pnl: Some(realized),
        });
    }

    /// Consume the simulator and return the final ledger.
    pub fn into_portfolio(self) -> Portfolio {
        self.portfolio
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bar(day: u32, open: f64, close: f64) -> Bar {
        Bar {
            symbol: "SPY".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume: 1000,
        }
    }

    fn signal(bar: &Bar, action: Action) -> Signal {
        Signal::new(&bar.symbol, bar.date, action, bar.close)
    }

    #[test]
    fn buy_fills_at_close() {
        let mut sim = PortfolioSim::new(10_000.0, 10, FillPolicy::Close);
        let b = bar(2, 99.0, 100.0);
        sim.on_bar(&b, &signal(&b, Action::Buy));
        let p = sim.portfolio();
        assert_eq!(p.cash, 9_000.0);
        assert_eq!(p.get_position("SPY").unwrap().quantity, 10);
        assert_eq!(p.trades.len(), 1);
        assert_eq!(p.trades[0].price, 100.0);
    }

    #[test]
    fn underfunded_buy_mutates_nothing() {
        let mut sim = PortfolioSim::new(500.0, 10, FillPolicy::Close);
        let b = bar(2, 99.0, 100.0);
        sim.on_bar(&b, &signal(&b, Action::Buy));
        let p = sim.portfolio();
        assert_eq!(p.cash, 500.0);
        assert!(p.positions.is_empty());
        assert!(p.trades.is_empty());
    }

    #[test]
    fn sell_without_position_is_dropped() {
        let mut sim = PortfolioSim::new(10_000.0, 10, FillPolicy::Close);
        let b = bar(2, 99.0, 100.0);
        sim.on_bar(&b, &signal(&b, Action::Sell));
        let p = sim.portfolio();
        assert_eq!(p.cash, 10_000.0);
        assert!(p.trades.is_empty());
    }

    #[test]
    fn round_trip_realizes_pnl() {
        let mut sim = PortfolioSim::new(10_000.0, 10, FillPolicy::Close);
        let b1 = bar(2, 99.0, 100.0);
        let b2 = bar(3, 100.0, 110.0);
        sim.on_bar(&b1, &signal(&b1, Action::Buy));
        sim.on_bar(&b2, &signal(&b2, Action::Sell));
        let p = sim.portfolio();
        assert_eq!(p.cash, 10_100.0);
        assert!(!p.has_position("SPY"));
        assert_eq!(p.trades[1].realized_pnl, Some(100.0));
    }

    #[test]
    fn weighted_average_cost_across_buys() {
        let mut sim = PortfolioSim::new(10_000.0, 10, FillPolicy::Close);
        let b1 = bar(2, 99.0, 100.0);
        let b2 = bar(3, 100.0, 110.0);
        sim.on_bar(&b1, &signal(&b1, Action::Buy));
        sim.on_bar(&b2, &signal(&b2, Action::Buy));
        let pos = sim.portfolio().get_position("SPY").unwrap();
        assert_eq!(pos.quantity, 20);
        assert!((pos.avg_cost - 105.0).abs() < 1e-12);
    }

    #[test]
    fn next_open_defers_fill() {
        let mut sim = PortfolioSim::new(10_000.0, 10, FillPolicy::NextOpen);
        let b1 = bar(2, 99.0, 100.0);
        let b2 = bar(3, 102.0, 104.0);
        sim.on_bar(&b1, &signal(&b1, Action::Buy));
        // Not filled yet.
        assert!(sim.portfolio().trades.is_empty());
        sim.on_bar(&b2, &signal(&b2, Action::Hold));
        let p = sim.portfolio();
        assert_eq!(p.trades.len(), 1);
        // Filled at the NEXT bar's open, not the signal bar's close.
        assert_eq!(p.trades[0].price, 102.0);
        assert_eq!(p.cash, 10_000.0 - 1020.0);
    }

    #[test]
    fn deferred_signal_without_next_bar_expires() {
        let mut sim = PortfolioSim::new(10_000.0, 10, FillPolicy::NextOpen);
        let b1 = bar(2, 99.0, 100.0);
        sim.on_bar(&b1, &signal(&b1, Action::Buy));
        let p = sim.into_portfolio();
        assert!(p.trades.is_empty());
        assert_eq!(p.cash, 10_000.0);
    }

    #[test]
    fn equity_marked_from_last_closes() {
        let mut sim = PortfolioSim::new(10_000.0, 10, FillPolicy::Close);
        let b1 = bar(2, 99.0, 100.0);
        sim.on_bar(&b1, &signal(&b1, Action::Buy));
        sim.mark_to_market(b1.date);
        let b2 = bar(3, 100.0, 105.0);
        sim.on_bar(&b2, &signal(&b2, Action::Hold));
        sim.mark_to_market(b2.date);
        let p = sim.portfolio();
        // Day 1: 9000 cash + 10 * 100 = 10_000. Day 2: 9000 + 10 * 105.
        assert_eq!(p.equity_history[0].value, 10_000.0);
        assert_eq!(p.equity_history[1].value, 10_050.0);
    }

    #[test]
    fn hold_never_trades() {
        let mut sim = PortfolioSim::new(10_000.0, 10, FillPolicy::Close);
        for day in 2..10 {
            let b = bar(day, 100.0, 100.0);
            sim.on_bar(&b, &signal(&b, Action::Hold));
            sim.mark_to_market(b.date);
        }
        let p = sim.portfolio();
        assert!(p.trades.is_empty());
        assert_eq!(p.equity_history.len(), 8);
        assert!(p.equity_history.iter().all(|e| e.value == 10_000.0));
    }

    proptest! {
        /// Cash never goes negative and the equity identity holds no matter
        /// what signal stream arrives.
        #[test]
        fn cash_stays_non_negative(
            actions in prop::collection::vec(0u8..3, 1..60),
            closes in prop::collection::vec(1.0f64..500.0, 60),
        ) {
            let mut sim = PortfolioSim::new(5_000.0, 7, FillPolicy::Close);
            for (i, (&a, &close)) in actions.iter().zip(&closes).enumerate() {
                let action = match a {
                    0 => Action::Buy,
                    1 => Action::Sell,
                    _ => Action::Hold,
                };
                let b = Bar {
                    symbol: "SPY".into(),
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: (close - 1.0).max(0.01),
                    close,
                    volume: 1000,
                };
                sim.on_bar(&b, &signal(&b, action));
                sim.mark_to_market(b.date);
                prop_assert!(sim.portfolio().cash >= 0.0);
                // Equity identity: marked value == cash + position value.
                let p = sim.portfolio();
                let pos_value: f64 = p
                    .positions
                    .values()
                    .map(|pos| pos.quantity as f64 * close)
                    .sum();
                let marked = p.equity_history.last().unwrap().value;
                prop_assert!((marked - (p.cash + pos_value)).abs() < 1e-9);
            }
        }
    }
}
