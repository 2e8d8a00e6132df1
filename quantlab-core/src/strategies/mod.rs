//! Strategies — stateful per-symbol signal generators.
//!
//! Each strategy consumes one bar at a time through [`Strategy::on_bar`],
//! maintains its own rolling indicator state, and returns exactly one
//! [`Signal`] per bar. Bars must arrive in strictly ascending date order;
//! violations fail with `OutOfOrderBar`. Until the warm-up window has
//! filled — and for any degenerate numeric case (zero stddev, zero volume
//! window) — strategies emit Hold rather than raising.

mod bollinger;
mod breakout;
mod ma_crossover;
mod mean_reversion;
mod momentum;
mod sentiment;

pub use bollinger::BollingerBands;
pub use breakout::Breakout;
pub use ma_crossover::MaCrossover;
pub use mean_reversion::MeanReversion;
pub use momentum::Momentum;
pub use sentiment::SentimentAnalysis;

use crate::config::StrategyConfig;
use crate::data::SentimentItem;
use crate::domain::{Bar, Signal};
use crate::error::BacktestError;
use chrono::NaiveDate;

/// Per-bar signal generator for one symbol.
///
/// `on_bar` must be called exactly once per bar, in date order. The trait
/// deliberately has no portfolio parameter: signal generation cannot see
/// cash or positions.
pub trait Strategy: Send {
    fn name(&self) -> &'static str;

    /// Minimum bar count before any non-Hold signal can fire.
    fn warmup_bars(&self) -> usize;

    fn on_bar(&mut self, bar: &Bar) -> Result<Signal, BacktestError>;
}

/// Enforces the strictly-ascending-date contract shared by every strategy.
#[derive(Debug, Clone, Default)]
pub(crate) struct SequenceGuard {
    last_seen: Option<NaiveDate>,
}

impl SequenceGuard {
    pub fn check(&mut self, bar: &Bar) -> Result<(), BacktestError> {
        if let Some(last_seen) = self.last_seen {
            if bar.date <= last_seen {
                return Err(BacktestError::OutOfOrderBar {
                    symbol: bar.symbol.clone(),
                    date: bar.date,
                    last_seen,
                });
            }
        }
        self.last_seen = Some(bar.date);
        Ok(())
    }
}

/// Build a strategy instance from a validated config.
///
/// The sentiment variant needs its per-day score items fetched up front;
/// pass `None` for every other variant. A sentiment config without items is
/// an `InvalidInput` (the orchestrator fetches from the feed before calling).
pub fn build_strategy(
    config: &StrategyConfig,
    sentiment_items: Option<Vec<SentimentItem>>,
) -> Result<Box<dyn Strategy>, BacktestError> {
    config.validate()?;
    let strategy: Box<dyn Strategy> = match *config {
        StrategyConfig::MovingAverageCrossover {
            fast_window,
            slow_window,
            ma_kind,
        } => Box::new(MaCrossover::new(fast_window, slow_window, ma_kind)),
        StrategyConfig::BollingerBands { window, multiplier } => {
            Box::new(BollingerBands::new(window, multiplier))
        }
        StrategyConfig::Momentum {
            rsi_window,
            momentum_window,
            oversold,
            overbought,
            threshold,
        } => Box::new(Momentum::new(
            rsi_window,
            momentum_window,
            oversold,
            overbought,
            threshold,
        )),
        StrategyConfig::MeanReversion { window, threshold } => {
            Box::new(MeanReversion::new(window, threshold))
        }
        StrategyConfig::Breakout {
            lookback_window,
            breakout_threshold,
            min_volume_ratio,
            confirmation_period,
        } => Box::new(Breakout::new(
            lookback_window,
            breakout_threshold,
            min_volume_ratio,
            confirmation_period,
        )),
        StrategyConfig::SentimentAnalysis {
            recency_half_life_hours,
            buy_threshold,
            sell_threshold,
            title_weight,
        } => {
            let items = sentiment_items.ok_or_else(|| {
                BacktestError::invalid_input(
                    "sentiment_analysis strategy requires a sentiment feed",
                )
            })?;
            Box::new(SentimentAnalysis::new(
                recency_half_life_hours,
                buy_threshold,
                sell_threshold,
                title_weight,
                items,
            ))
        }
    };
    Ok(strategy)
}
