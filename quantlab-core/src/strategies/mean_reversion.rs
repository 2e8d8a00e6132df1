//! Mean reversion — fade deviations from the rolling mean.
//!
//! Buys when the close sits more than `threshold` (fractional) below the
//! rolling mean, sells when more than `threshold` above. Level-based: the
//! signal repeats while the deviation persists, and the portfolio's cash /
//! position constraints bound how many fills actually happen.

use crate::domain::{Action, Bar, Signal};
use crate::error::BacktestError;
use crate::indicators::RollingWindow;

use super::{SequenceGuard, Strategy};

#[derive(Debug)]
pub struct MeanReversion {
    window: usize,
    threshold: f64,
    closes: RollingWindow,
    seq: SequenceGuard,
}

impl MeanReversion {
    pub fn new(window: usize, threshold: f64) -> Self {
        debug_assert!(window >= 2 && threshold > 0.0);
        Self {
            window,
            threshold,
            closes: RollingWindow::new(window),
            seq: SequenceGuard::default(),
        }
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &'static str {
        "mean_reversion"
    }

    fn warmup_bars(&self) -> usize {
        self.window
    }

    fn on_bar(&mut self, bar: &Bar) -> Result<Signal, BacktestError> {
        self.seq.check(bar)?;
        self.closes.push(bar.close);

        let action = match self.closes.mean() {
            Some(mean) if mean > 0.0 => {
                let deviation = (bar.close - mean) / mean;
                if deviation < -self.threshold {
                    Action::Buy
                } else if deviation > self.threshold {
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

    fn run(strategy: &mut MeanReversion, closes: &[f64]) -> Vec<Action> {
        make_bars(closes)
            .iter()
            .map(|bar| strategy.on_bar(bar).unwrap().action)
            .collect()
    }

    #[test]
    fn buys_below_mean_sells_above() {
        let mut strategy = MeanReversion::new(4, 0.05);
        // Window [100,100,100,80]: mean 95, deviation of 80 = -15.8% → Buy.
        let actions = run(&mut strategy, &[100.0, 100.0, 100.0, 80.0]);
        assert_eq!(actions[3], Action::Buy);

        let mut strategy = MeanReversion::new(4, 0.05);
        // Window [100,100,100,120]: mean 105, deviation of 120 = +14.3% → Sell.
        let actions = run(&mut strategy, &[100.0, 100.0, 100.0, 120.0]);
        assert_eq!(actions[3], Action::Sell);
    }

    #[test]
    fn small_deviation_holds() {
        let mut strategy = MeanReversion::new(4, 0.10);
        let actions = run(&mut strategy, &[100.0, 100.0, 100.0, 98.0]);
        assert_eq!(actions[3], Action::Hold);
    }

    #[test]
    fn signal_repeats_while_deviation_persists() {
        let mut strategy = MeanReversion::new(3, 0.05);
        let actions = run(&mut strategy, &[100.0, 100.0, 100.0, 80.0, 80.0]);
        assert_eq!(actions[3], Action::Buy);
        // Window [100,80,80]: mean 86.67, deviation of 80 = -7.7% → still Buy.
        assert_eq!(actions[4], Action::Buy);
    }

    #[test]
    fn warmup_holds() {
        let mut strategy = MeanReversion::new(5, 0.01);
        let actions = run(&mut strategy, &[100.0, 150.0, 50.0, 120.0]);
        assert!(actions.iter().all(|a| *a == Action::Hold));
    }
}
