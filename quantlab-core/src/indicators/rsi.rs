//! Streaming Relative Strength Index (RSI) with Wilder smoothing.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), seeded from the simple
//! average of the first `period` changes, then Wilder-smoothed.
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; both zero → 50.
//! First value after `period + 1` closes.

#[derive(Debug, Clone)]
pub struct StreamingRsi {
    period: usize,
    prev_close: Option<f64>,
    seed_gain: f64,
    seed_loss: f64,
    changes_seen: usize,
    avg_gain: f64,
    avg_loss: f64,
    seeded: bool,
}

impl StreamingRsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            prev_close: None,
            seed_gain: 0.0,
            seed_loss: 0.0,
            changes_seen: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
            seeded: false,
        }
    }

    /// Feed one close; returns the RSI once `period` changes have been seen.
    pub fn update(&mut self, close: f64) -> Option<f64> {
        let prev = match self.prev_close.replace(close) {
            Some(p) => p,
            None => return None,
        };
        let change = close - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if !self.seeded {
            self.seed_gain += gain;
            self.seed_loss += loss;
            self.changes_seen += 1;
            if self.changes_seen < self.period {
                return None;
            }
            self.avg_gain = self.seed_gain / self.period as f64;
            self.avg_loss = self.seed_loss / self.period as f64;
            self.seeded = true;
        } else {
            let alpha = 1.0 / self.period as f64;
            self.avg_gain = alpha * gain + (1.0 - alpha) * self.avg_gain;
            self.avg_loss = alpha * loss + (1.0 - alpha) * self.avg_loss;
        }
        Some(rsi_from_averages(self.avg_gain, self.avg_loss))
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
