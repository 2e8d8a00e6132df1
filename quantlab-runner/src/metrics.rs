//! Performance metrics — pure functions over the equity curve and trade log.
//!
//! No hidden state, no I/O: every metric is a deterministic function of its
//! inputs, so each is unit-testable in isolation.

use quantlab_core::domain::{EquityPoint, Trade};
use serde::{Deserialize, Serialize};

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub cagr: f64,
    pub profit_factor: f64,
    pub final_portfolio_value: f64,
    pub total_trades: usize,
}

impl PerformanceMetrics {
    pub fn compute(initial_capital: f64, equity: &[EquityPoint], trades: &[Trade]) -> Self {
        let values: Vec<f64> = equity.iter().map(|e| e.value).collect();
        let final_value = values.last().copied().unwrap_or(initial_capital);
        Self {
            total_return: total_return(initial_capital, final_value),
            win_rate: win_rate(trades),
            max_drawdown: max_drawdown(&values),
            sharpe_ratio: sharpe_ratio(&values),
            cagr: cagr(initial_capital, final_value, values.len()),
            profit_factor: profit_factor(trades),
            final_portfolio_value: final_value,
            total_trades: trades.len(),
        }
    }
}

/// (final - initial) / initial; 0.0 for non-positive initial capital.
pub fn total_return(initial_capital: f64, final_value: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    (final_value - initial_capital) / initial_capital
}

/// Winning sells over all sells; 0.0 with no sells.
pub fn win_rate(trades: &[Trade]) -> f64 {
    let sells = trades.iter().filter(|t| t.is_sell()).count();
    if sells == 0 {
        return 0.0;
    }
    let wins = trades.iter().filter(|t| t.is_winner()).count();
    wins as f64 / sells as f64
}

/// Largest peak-to-trough decline as a fraction of the peak.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0_f64;
    for &value in values {
        peak = peak.max(value);
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }
    worst
}

/// Annualized Sharpe ratio from daily equity returns.
///
/// mean(daily returns) / std(daily returns) * sqrt(252); 0.0 when the
/// standard deviation vanishes or there are fewer than 2 points.
pub fn sharpe_ratio(values: &[f64]) -> f64 {
    let returns = daily_returns(values);
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(&returns);
    let std = std_dev(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * (252.0_f64).sqrt()
}

/// Compound annual growth rate assuming 252 trading days per year.
pub fn cagr(initial_capital: f64, final_value: f64, trading_days: usize) -> f64 {
    if initial_capital <= 0.0 || final_value <= 0.0 || trading_days < 2 {
        return 0.0;
    }
    let years = trading_days as f64 / 252.0;
    (final_value / initial_capital).powf(1.0 / years) - 1.0
}

/// Gross profit over gross loss on closed (sell) trades.
///
/// 0.0 with no realized PnL at all; infinity is avoided by returning the
/// gross profit when there are no losses.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let mut gross_profit = 0.0;
    let mut gross_loss = 0.0;
    for pnl in trades.iter().filter_map(|t| t.realized_pnl) {
        if pnl > 0.0 {
            gross_profit += pnl;
        } else {
            gross_loss += -pnl;
        }
    }
    if gross_loss < 1e-15 {
        return gross_profit;
    }
    gross_profit / gross_loss
}

fn daily_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(values);
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
