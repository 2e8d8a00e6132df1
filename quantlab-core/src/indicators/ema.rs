//! Streaming Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], with
//! alpha = 2 / (period + 1). Seeded with the SMA of the first `period`
//! values; `update` returns `None` during the seed window.

#[derive(Debug, Clone)]
pub struct StreamingEma {
    period: usize,
    alpha: f64,
    seed_sum: f64,
    seen: usize,
    value: Option<f64>,
}

impl StreamingEma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            seed_sum: 0.0,
            seen: 0,
            value: None,
        }
    }

    /// Feed one value; returns the EMA once the seed window has filled.
    pub fn update(&mut self, x: f64) -> Option<f64> {
        match self.value {
            Some(prev) => {
                let ema = self.alpha * x + (1.0 - self.alpha) * prev;
                self.value = Some(ema);
            }
            None => {
                self.seed_sum += x;
                self.seen += 1;
                if self.seen == self.period {
                    self.value = Some(self.seed_sum / self.period as f64);
                }
            }
        }
        self.value
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_with_sma() {
        let mut ema = StreamingEma::new(3);
        assert_eq!(ema.update(10.0), None);
        assert_eq!(ema.update(11.0), None);
        // Seed = mean(10, 11, 12) = 11
        assert_eq!(ema.update(12.0), Some(11.0));
    }

    #[test]
    fn recursive_update_after_seed() {
        let mut ema = StreamingEma::new(3);
        ema.update(10.0);
        ema.update(11.0);
        ema.update(12.0);
        // alpha = 0.5: 0.5 * 14 + 0.5 * 11 = 12.5
        let v = ema.update(14.0).unwrap();
        assert!((v - 12.5).abs() < 1e-12);
    }

    #[test]
    fn period_one_tracks_input() {
        let mut ema = StreamingEma::new(1);
        assert_eq!(ema.update(5.0), Some(5.0));
        assert_eq!(ema.update(9.0), Some(9.0));
    }

    #[test]
    fn constant_input_stays_constant() {
        let mut ema = StreamingEma::new(4);
        let mut last = None;
        for _ in 0..20 {
            last = ema.update(42.0);
        }
        assert!((last.unwrap() - 42.0).abs() < 1e-12);
    }
}
