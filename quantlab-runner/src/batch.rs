//! Batch runs — many independent backtests on a bounded worker pool.
//!
//! Runs share nothing mutable: each one owns its portfolio and strategy
//! instances and only reads immutable bar data through the provider, so the
//! pool needs no locks. Results come back in request order.

use quantlab_core::data::{PriceSeriesProvider, SentimentFeed};
use quantlab_core::error::BacktestError;
use rayon::prelude::*;

use crate::config::RunConfig;
use crate::orchestrator::Backtester;
use crate::result::BacktestResult;

/// Execute every config against the shared (read-only) provider.
///
/// `threads` bounds the worker pool; `None` uses the global rayon pool.
/// Each element of the returned vec corresponds to the config at the same
/// index — one failed run does not abort the others.
pub fn run_batch<P, S>(
    provider: &P,
    sentiment: Option<&S>,
    configs: &[RunConfig],
    threads: Option<usize>,
) -> Vec<Result<BacktestResult, BacktestError>>
where
    P: PriceSeriesProvider + Sync,
    S: SentimentFeed + Sync,
{
    let execute = || {
        configs
            .par_iter()
            .map(|config| {
                let mut backtester = Backtester::new(provider);
                if let Some(feed) = sentiment {
                    backtester = backtester.with_sentiment(feed);
                }
                backtester.run(config)
            })
            .collect()
    };

    match threads {
        Some(threads) => {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(execute),
                // Pool construction failing (resource limits) degrades to the
                // global pool rather than losing the batch.
                Err(_) => execute(),
            }
        }
        None => execute(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quantlab_core::config::{MaKind, StrategyConfig};
    use quantlab_core::data::{MemoryProvider, MemorySentimentFeed};
    use quantlab_core::domain::Bar;
    use quantlab_core::sim::FillPolicy;

    fn bars(symbol: &str, closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                symbol: symbol.into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close + 0.5,
                low: (close - 0.5).max(0.01),
                close,
                volume: 1000,
            })
            .collect()
    }

    fn config(fast: usize, slow: usize) -> RunConfig {
        RunConfig {
            symbols: vec!["SPY".into()],
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            strategy: StrategyConfig::MovingAverageCrossover {
                fast_window: fast,
                slow_window: slow,
                ma_kind: MaKind::Sma,
            },
            initial_capital: 10_000.0,
            shares_per_trade: 10,
            fill_policy: FillPolicy::Close,
        }
    }

    #[test]
    fn batch_preserves_request_order_and_isolates_failures() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 7) as f64).collect();
        let provider = MemoryProvider::new().with_series("SPY", bars("SPY", &closes));

        let mut bad = config(2, 4);
        bad.symbols = vec!["MISSING".into()];
        let configs = vec![config(2, 4), bad, config(3, 8)];

        let results = run_batch(
            &provider,
            None::<&MemorySentimentFeed>,
            &configs,
            Some(2),
        );
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn batch_matches_sequential_runs() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + 10.0 * ((i as f64) * 0.4).sin())
            .collect();
        let provider = MemoryProvider::new().with_series("SPY", bars("SPY", &closes));

        let configs = vec![config(2, 4), config(2, 6), config(3, 9)];
        let parallel = run_batch(&provider, None::<&MemorySentimentFeed>, &configs, Some(3));

        for (config, result) in configs.iter().zip(&parallel) {
            let sequential = Backtester::new(&provider).run(config).unwrap();
            assert_eq!(result.as_ref().unwrap(), &sequential);
        }
    }
}
