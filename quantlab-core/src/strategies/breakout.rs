//! Breakout — volume-confirmed range breakouts with a confirmation count.
//!
//! A bar qualifies upward when its close exceeds the prior
//! `lookback_window`-bar high by `breakout_threshold` AND its volume is at
//! least `min_volume_ratio` times the lookback average volume. After
//! `confirmation_period` consecutive qualifying bars the Buy fires and the
//! count resets. Breakdowns below the lookback low are symmetric and fire
//! Sell. The lookback windows deliberately exclude the current bar.

use crate::domain::{Action, Bar, Signal};
use crate::error::BacktestError;
use crate::indicators::RollingWindow;

use super::{SequenceGuard, Strategy};

#[derive(Debug)]
pub struct Breakout {
    lookback_window: usize,
    breakout_threshold: f64,
    min_volume_ratio: f64,
    confirmation_period: usize,
    highs: RollingWindow,
    lows: RollingWindow,
    volumes: RollingWindow,
    up_streak: usize,
    down_streak: usize,
    seq: SequenceGuard,
}

impl Breakout {
    pub fn new(
        lookback_window: usize,
        breakout_threshold: f64,
        min_volume_ratio: f64,
        confirmation_period: usize,
    ) -> Self {
        debug_assert!(lookback_window >= 1 && confirmation_period >= 1);
        Self {
            lookback_window,
            breakout_threshold,
            min_volume_ratio,
            confirmation_period,
            highs: RollingWindow::new(lookback_window),
            lows: RollingWindow::new(lookback_window),
            volumes: RollingWindow::new(lookback_window),
            up_streak: 0,
            down_streak: 0,
            seq: SequenceGuard::default(),
        }
    }

    /// Volume confirmation against the lookback average. A zero-volume
    /// window cannot confirm anything (no division by zero).
    fn volume_ok(&self, volume: u64) -> bool {
        match self.volumes.mean() {
            Some(avg) if avg > 0.0 => volume as f64 >= self.min_volume_ratio * avg,
            _ => false,
        }
    }
}

impl Strategy for Breakout {
    fn name(&self) -> &'static str {
        "breakout"
    }

    fn warmup_bars(&self) -> usize {
        self.lookback_window + self.confirmation_period
    }

    fn on_bar(&mut self, bar: &Bar) -> Result<Signal, BacktestError> {
        self.seq.check(bar)?;

        let mut action = Action::Hold;
        if let (Some(prior_high), Some(prior_low)) = (self.highs.max(), self.lows.min()) {
            let above = bar.close > prior_high * (1.0 + self.breakout_threshold);
            let below = bar.close < prior_low * (1.0 - self.breakout_threshold);
            let volume_ok = self.volume_ok(bar.volume);

            if above && volume_ok {
                self.up_streak += 1;
                self.down_streak = 0;
            } else if below && volume_ok {
                self.down_streak += 1;
                self.up_streak = 0;
            } else {
                self.up_streak = 0;
                self.down_streak = 0;
            }

            if self.up_streak >= self.confirmation_period {
                action = Action::Buy;
                self.up_streak = 0;
            } else if self.down_streak >= self.confirmation_period {
                action = Action::Sell;
                self.down_streak = 0;
            }
        }

        // The current bar joins the lookback only after evaluation.
        self.highs.push(bar.high);
        self.lows.push(bar.low);
        self.volumes.push(bar.volume as f64);

        Ok(Signal::new(&bar.symbol, bar.date, action, bar.close))
    }
}
