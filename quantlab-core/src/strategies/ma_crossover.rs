//! Moving average crossover — golden cross and death cross detection.
//!
//! Buys when the fast average crosses above the slow average, sells when it
//! crosses below. On the first bar where both averages are valid the relation
//! itself fires (fast above slow → Buy): a series already trending when the
//! slow window fills would otherwise never signal.

use crate::config::MaKind;
use crate::domain::{Action, Bar, Signal};
use crate::error::BacktestError;
use crate::indicators::{RollingWindow, StreamingEma};

use super::{SequenceGuard, Strategy};

#[derive(Debug, Clone)]
enum MaPair {
    Sma {
        fast: RollingWindow,
        slow: RollingWindow,
    },
    Ema {
        fast: StreamingEma,
        slow: StreamingEma,
    },
}

impl MaPair {
    fn update(&mut self, close: f64) -> (Option<f64>, Option<f64>) {
        match self {
            MaPair::Sma { fast, slow } => {
                fast.push(close);
                slow.push(close);
                (fast.mean(), slow.mean())
            }
            MaPair::Ema { fast, slow } => (fast.update(close), slow.update(close)),
        }
    }
}

#[derive(Debug)]
pub struct MaCrossover {
    slow_window: usize,
    pair: MaPair,
    prev: Option<(f64, f64)>,
    seq: SequenceGuard,
}

impl MaCrossover {
    pub fn new(fast_window: usize, slow_window: usize, ma_kind: MaKind) -> Self {
        debug_assert!(fast_window >= 1 && fast_window < slow_window);
        let pair = match ma_kind {
            MaKind::Sma => MaPair::Sma {
                fast: RollingWindow::new(fast_window),
                slow: RollingWindow::new(slow_window),
            },
            MaKind::Ema => MaPair::Ema {
                fast: StreamingEma::new(fast_window),
                slow: StreamingEma::new(slow_window),
            },
        };
        Self {
            slow_window,
            pair,
            prev: None,
            seq: SequenceGuard::default(),
        }
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &'static str {
        "moving_average_crossover"
    }

    fn warmup_bars(&self) -> usize {
        self.slow_window
    }

    fn on_bar(&mut self, bar: &Bar) -> Result<Signal, BacktestError> {
        self.seq.check(bar)?;

        let action = match self.pair.update(bar.close) {
            (Some(fast), Some(slow)) => {
                let action = match self.prev {
                    // First valid comparison: the relation itself is the signal.
                    None => {
                        if fast > slow {
                            Action::Buy
                        } else if fast < slow {
                            Action::Sell
                        } else {
                            Action::Hold
                        }
                    }
                    Some((prev_fast, prev_slow)) => {
                        if fast > slow && prev_fast <= prev_slow {
                            Action::Buy // golden cross
                        } else if fast < slow && prev_fast >= prev_slow {
                            Action::Sell // death cross
                        } else {
                            Action::Hold
                        }
                    }
                };
                self.prev = Some((fast, slow));
                action
            }
            _ => Action::Hold,
        };

        Ok(Signal::new(&bar.symbol, bar.date, action, bar.close))
    }
}
