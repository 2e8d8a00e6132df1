//! Backtest orchestrator — provider → strategies → portfolio → metrics.
//!
//! One run is strictly sequential: all fetches complete before replay, bars
//! across symbols are interleaved by date (stable by symbol order within a
//! date), and each bar's signal is applied to the shared portfolio before
//! the next bar is touched. Cancellation is cooperative and checked before
//! every bar; a cancelled run returns an error, never a partial result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use quantlab_core::config::StrategyConfig;
use quantlab_core::data::{PriceSeriesProvider, SentimentFeed};
use quantlab_core::domain::Bar;
use quantlab_core::error::BacktestError;
use quantlab_core::sim::PortfolioSim;
use quantlab_core::strategies::{build_strategy, Strategy};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::metrics::PerformanceMetrics;
use crate::result::BacktestResult;

/// Cooperative cancellation flag, checked between bars.
///
/// Cancellation after a fill is irrecoverable by design: there is no
/// partial-bar rollback, so the last fully-applied bar's state is final.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Drives complete backtest runs against a price provider.
pub struct Backtester<'a> {
    provider: &'a dyn PriceSeriesProvider,
    sentiment: Option<&'a dyn SentimentFeed>,
}

impl<'a> Backtester<'a> {
    pub fn new(provider: &'a dyn PriceSeriesProvider) -> Self {
        Self {
            provider,
            sentiment: None,
        }
    }

    /// Attach a sentiment feed, required by the sentiment strategy.
    pub fn with_sentiment(mut self, feed: &'a dyn SentimentFeed) -> Self {
        self.sentiment = Some(feed);
        self
    }

    pub fn run(&self, config: &RunConfig) -> Result<BacktestResult, BacktestError> {
        self.run_with_cancel(config, &CancelToken::new())
    }

    pub fn run_with_cancel(
        &self,
        config: &RunConfig,
        cancel: &CancelToken,
    ) -> Result<BacktestResult, BacktestError> {
        config.validate()?;
        info!(
            run_id = %config.run_id(),
            strategy = config.strategy.strategy_type(),
            symbols = ?config.symbols,
            "starting backtest"
        );

        // Phase 1: all fetches complete before replay begins.
        let mut strategies: Vec<Box<dyn Strategy>> = Vec::with_capacity(config.symbols.len());
        let mut merged: Vec<(usize, Bar)> = Vec::new();
        for (index, symbol) in config.symbols.iter().enumerate() {
            let bars = self
                .provider
                .fetch_series(symbol, config.start, config.end)?;
            debug!(symbol, bars = bars.len(), "fetched series");

            let sentiment_items = match &config.strategy {
                StrategyConfig::SentimentAnalysis { .. } => {
                    let feed = self.sentiment.ok_or_else(|| {
                        BacktestError::invalid_input(
                            "sentiment_analysis strategy requires a sentiment feed",
                        )
                    })?;
                    Some(feed.fetch_scores(symbol, config.start, config.end)?)
                }
                _ => None,
            };
            strategies.push(build_strategy(&config.strategy, sentiment_items)?);
            merged.extend(bars.into_iter().map(|bar| (index, bar)));
        }

        // Interleave by date; stable by symbol order within a date.
        merged.sort_by(|(ai, ab), (bi, bb)| ab.date.cmp(&bb.date).then(ai.cmp(bi)));

        // Phase 2: replay.
        let mut sim = PortfolioSim::new(
            config.initial_capital,
            config.shares_per_trade,
            config.fill_policy,
        );
        let mut current_date = None;
        for (index, bar) in &merged {
            if current_date != Some(bar.date) {
                // Date boundary: mark the finished date.
                if let Some(date) = current_date {
                    sim.mark_to_market(date);
                }
                current_date = Some(bar.date);
            }
            // Cooperative cancel point before every bar, including between
            // symbols within one date.
            if cancel.is_cancelled() {
                info!(%bar.date, "backtest cancelled");
                return Err(BacktestError::Cancelled {
                    next_date: bar.date,
                });
            }
            let signal = strategies[*index].on_bar(bar)?;
            sim.on_bar(bar, &signal);
        }
        if let Some(date) = current_date {
            sim.mark_to_market(date);
        }

        // Phase 3: reduce to a result.
        let portfolio = sim.into_portfolio();
        let metrics = PerformanceMetrics::compute(
            config.initial_capital,
            &portfolio.equity_history,
            &portfolio.trades,
        );
        info!(
            final_value = metrics.final_portfolio_value,
            trades = metrics.total_trades,
            "backtest finished"
        );
        Ok(BacktestResult::new(
            config,
            metrics,
            portfolio.trades,
            portfolio.equity_history,
        ))
    }
}
