//! Bollinger Bands — mean reversion against rolling mean ± stddev bands.
//!
//! Buys when the close crosses below the lower band, sells when it crosses
//! above the upper band. Uses population stddev (divide by N), matching the
//! band convention of the indicator stack. A zero-stddev window (flat
//! prices) yields Hold.

use crate::domain::{Action, Bar, Signal};
use crate::error::BacktestError;
use crate::indicators::RollingWindow;

use super::{SequenceGuard, Strategy};

/// Where the close sits relative to the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Below,
    Inside,
    Above,
}

#[derive(Debug)]
pub struct BollingerBands {
    window: usize,
    multiplier: f64,
    closes: RollingWindow,
    prev_zone: Option<Zone>,
    seq: SequenceGuard,
}

impl BollingerBands {
    pub fn new(window: usize, multiplier: f64) -> Self {
        debug_assert!(window >= 2 && multiplier > 0.0);
        Self {
            window,
            multiplier,
            closes: RollingWindow::new(window),
            prev_zone: None,
            seq: SequenceGuard::default(),
        }
    }
}

impl Strategy for BollingerBands {
    fn name(&self) -> &'static str {
        "bollinger_bands"
    }

    fn warmup_bars(&self) -> usize {
        self.window
    }

    fn on_bar(&mut self, bar: &Bar) -> Result<Signal, BacktestError> {
        self.seq.check(bar)?;
        self.closes.push(bar.close);

        let action = match (self.closes.mean(), self.closes.std_dev()) {
            (Some(mean), Some(std_dev)) if std_dev > 0.0 => {
                let upper = mean + self.multiplier * std_dev;
                let lower = mean - self.multiplier * std_dev;
                let zone = if bar.close < lower {
                    Zone::Below
                } else if bar.close > upper {
                    Zone::Above
                } else {
                    Zone::Inside
                };
                // Fire only on entering a band, not while riding it.
                let action = match (self.prev_zone, zone) {
                    (Some(Zone::Below), Zone::Below) | (Some(Zone::Above), Zone::Above) => {
                        Action::Hold
                    }
                    (_, Zone::Below) => Action::Buy,
                    (_, Zone::Above) => Action::Sell,
                    _ => Action::Hold,
                };
                self.prev_zone = Some(zone);
                action
            }
            // Degenerate window (flat prices): no bands, no signal.
            _ => Action::Hold,
        };

        Ok(Signal::new(&bar.symbol, bar.date, action, bar.close))
    }
}
