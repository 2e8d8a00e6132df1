//! Synthetic bar generator — seeded random walk for demos and offline tests.
//!
//! Per-symbol seeds are derived from the master seed via BLAKE3 so that the
//! same (seed, symbol) pair always yields the same series, independent of the
//! order in which symbols are fetched.

use super::provider::{DataError, PriceSeriesProvider};
use super::validate_series;
use crate::domain::Bar;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic random-walk price provider.
///
/// Generates one bar per weekday in the requested range. Daily log-ish
/// returns are uniform in `[-daily_move, daily_move]` around the prior
/// close, with intraday high/low spread and volume jitter.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    start_price: f64,
    daily_move: f64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start_price: 100.0,
            daily_move: 0.02,
        }
    }

    pub fn with_start_price(mut self, price: f64) -> Self {
        self.start_price = price;
        self
    }

    /// Derive a per-symbol sub-seed, order-independent.
    fn sub_seed(&self, symbol: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        let hash = hasher.finalize();
        u64::from_le_bytes(hash.as_bytes()[..8].try_into().unwrap_or([0; 8]))
    }
}

impl PriceSeriesProvider for SyntheticProvider {
    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let mut rng = StdRng::seed_from_u64(self.sub_seed(symbol));
        let mut bars = Vec::new();
        let mut close = self.start_price;
        let mut date = start;
        while date <= end {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let drift: f64 = rng.gen_range(-self.daily_move..=self.daily_move);
                let open = close;
                close = (open * (1.0 + drift)).max(0.01);
                let spread = open.max(close) * rng.gen_range(0.0..0.01);
                let high = open.max(close) + spread;
                let low = (open.min(close) - spread).max(0.01);
                let volume = rng.gen_range(500_000..2_000_000);
                bars.push(Bar {
                    symbol: symbol.to_string(),
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume,
                });
            }
            date += Duration::days(1);
        }
        validate_series(symbol, &bars)?;
        Ok(bars)
    }
}
