//! Momentum — RSI plus raw price momentum, both must agree.
//!
//! Buys when RSI is oversold AND momentum over `momentum_window` bars
//! exceeds `threshold`; sells when RSI is overbought AND momentum is below
//! `-threshold`. The combination targets oversold bounces that have already
//! started turning, rather than catching falling knives on RSI alone.

use crate::domain::{Action, Bar, Signal};
use crate::error::BacktestError;
use crate::indicators::{RollingWindow, StreamingRsi};

use super::{SequenceGuard, Strategy};

#[derive(Debug)]
pub struct Momentum {
    rsi_window: usize,
    momentum_window: usize,
    oversold: f64,
    overbought: f64,
    threshold: f64,
    rsi: StreamingRsi,
    /// Holds `momentum_window + 1` closes so the front is the close
    /// `momentum_window` bars ago.
    closes: RollingWindow,
    seq: SequenceGuard,
}

impl Momentum {
    pub fn new(
        rsi_window: usize,
        momentum_window: usize,
        oversold: f64,
        overbought: f64,
        threshold: f64,
    ) -> Self {
        debug_assert!(oversold < overbought);
        Self {
            rsi_window,
            momentum_window,
            oversold,
            overbought,
            threshold,
            rsi: StreamingRsi::new(rsi_window),
            closes: RollingWindow::new(momentum_window + 1),
            seq: SequenceGuard::default(),
        }
    }

    /// Fractional price change over `momentum_window` bars, once buffered.
    fn momentum(&self) -> Option<f64> {
        if !self.closes.is_full() {
            return None;
        }
        let oldest = self.closes.front()?;
        let newest = self.closes.back()?;
        if oldest <= 0.0 {
            return None; // degenerate base, treat as no reading
        }
        Some((newest - oldest) / oldest)
    }
}

impl Strategy for Momentum {
    fn name(&self) -> &'static str {
        "momentum"
    }

    fn warmup_bars(&self) -> usize {
        self.rsi_window.max(self.momentum_window) + 1
    }

    fn on_bar(&mut self, bar: &Bar) -> Result<Signal, BacktestError> {
        self.seq.check(bar)?;
        let rsi = self.rsi.update(bar.close);
        self.closes.push(bar.close);

        let action = match (rsi, self.momentum()) {
            (Some(rsi), Some(momentum)) => {
                if rsi < self.oversold && momentum > self.threshold {
                    Action::Buy
                } else if rsi > self.overbought && momentum < -self.threshold {
                    Action::Sell
                } else {
                    Action::Hold
                }
            }
            _ => Action::Hold,
        };

        Ok(Signal::new(&bar.symbol, bar.date, action, bar.close))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::make_bars;

    fn run(strategy: &mut Momentum, closes: &[f64]) -> Vec<Action> {
        make_bars(closes)
            .iter()
            .map(|bar| strategy.on_bar(bar).unwrap().action)
            .collect()
    }

    #[test]
    fn oversold_bounce_buys() {
        // Long decline keeps RSI pinned low; the first uptick turns 1-bar
        // momentum positive while RSI still reads 14 (oversold).
        let mut strategy = Momentum::new(3, 1, 30.0, 70.0, 0.001);
        let actions = run(
            &mut strategy,
            &[100.0, 97.0, 94.0, 91.0, 88.0, 85.0, 86.0, 89.0],
        );
        assert_eq!(actions[6], Action::Buy, "actions: {actions:?}");
    }

    #[test]
    fn overbought_fade_sells() {
        let mut strategy = Momentum::new(3, 1, 30.0, 70.0, 0.001);
        let actions = run(
            &mut strategy,
            &[100.0, 103.0, 106.0, 109.0, 112.0, 115.0, 114.0, 111.0],
        );
        assert!(actions.contains(&Action::Sell), "actions: {actions:?}");
    }

    #[test]
    fn rsi_alone_is_not_enough() {
        // Strictly falling: RSI oversold but momentum negative → never Buy.
        let closes: Vec<f64> = (0..15).map(|i| 100.0 - 2.0 * i as f64).collect();
        let mut strategy = Momentum::new(3, 1, 30.0, 70.0, 0.001);
        let actions = run(&mut strategy, &closes);
        assert!(!actions.contains(&Action::Buy));
    }

    #[test]
    fn warmup_holds() {
        let mut strategy = Momentum::new(5, 4, 30.0, 70.0, 0.0);
        let actions = run(&mut strategy, &[100.0, 90.0, 110.0, 80.0, 120.0]);
        assert!(actions.iter().all(|a| *a == Action::Hold));
    }

    #[test]
    fn flat_series_holds() {
        // RSI reads 50 on no movement and momentum is zero → Hold.
        let mut strategy = Momentum::new(3, 1, 30.0, 70.0, 0.001);
        let actions = run(&mut strategy, &[100.0; 12]);
        assert!(actions.iter().all(|a| *a == Action::Hold));
    }
}
