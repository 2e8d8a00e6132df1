//! BacktestResult — the sole externally visible output of a run.

use crate::config::RunConfig;
use crate::metrics::PerformanceMetrics;
use quantlab_core::domain::{EquityPoint, Trade};
use serde::{Deserialize, Serialize};

/// Complete result of a single backtest run.
///
/// Created once at the end of a run and read-only thereafter. Serializable
/// to JSON for persistence by external callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Content-addressed ID of the config that produced this result.
    pub run_id: String,
    pub config: RunConfig,

    pub total_return: f64,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub cagr: f64,
    pub profit_factor: f64,
    pub final_portfolio_value: f64,
    pub total_trades: usize,

    /// Ordered fill log.
    pub trades: Vec<Trade>,
    /// One point per trading date.
    pub equity_curve: Vec<EquityPoint>,
}

impl BacktestResult {
    pub fn new(
        config: &RunConfig,
        metrics: PerformanceMetrics,
        trades: Vec<Trade>,
        equity_curve: Vec<EquityPoint>,
    ) -> Self {
        Self {
            run_id: config.run_id(),
            config: config.clone(),
            total_return: metrics.total_return,
            win_rate: metrics.win_rate,
            max_drawdown: metrics.max_drawdown,
            sharpe_ratio: metrics.sharpe_ratio,
            cagr: metrics.cagr,
            profit_factor: metrics.profit_factor,
            final_portfolio_value: metrics.final_portfolio_value,
            total_trades: metrics.total_trades,
            trades,
            equity_curve,
        }
    }
}
