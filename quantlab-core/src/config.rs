//! Strategy configuration — serializable tagged enum, one variant per strategy.
//!
//! The `strategy_type` tag selects the variant; unknown tags surface as
//! `UnsupportedStrategy` through the `parse_*` helpers. Parameter ordering
//! constraints (fast < slow, oversold < overbought, ...) are enforced by
//! `validate()`, not by construction, so deserialized configs must be
//! validated before use — the strategy factory does this.

use crate::error::BacktestError;
use serde::{Deserialize, Serialize};

/// Moving average flavor for the crossover strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaKind {
    #[default]
    Sma,
    Ema,
}

/// Strategy selection plus per-variant numeric parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy_type", rename_all = "snake_case")]
pub enum StrategyConfig {
    MovingAverageCrossover {
        fast_window: usize,
        slow_window: usize,
        #[serde(default)]
        ma_kind: MaKind,
    },
    BollingerBands {
        window: usize,
        multiplier: f64,
    },
    Momentum {
        rsi_window: usize,
        momentum_window: usize,
        oversold: f64,
        overbought: f64,
        threshold: f64,
    },
    MeanReversion {
        window: usize,
        /// Fractional deviation from the rolling mean that triggers a signal.
        threshold: f64,
    },
    Breakout {
        lookback_window: usize,
        /// Fractional margin above the lookback high that counts as a breakout.
        breakout_threshold: f64,
        /// Bar volume must be at least this multiple of the lookback average.
        min_volume_ratio: f64,
        /// Consecutive qualifying bars required before the signal fires.
        confirmation_period: usize,
    },
    SentimentAnalysis {
        recency_half_life_hours: f64,
        buy_threshold: f64,
        sell_threshold: f64,
        /// Multiplier applied to headline-derived scores.
        #[serde(default = "default_title_weight")]
        title_weight: f64,
    },
}

fn default_title_weight() -> f64 {
    2.0
}

impl StrategyConfig {
    /// Stable name matching the serde tag, used in logs and run IDs.
    pub fn strategy_type(&self) -> &'static str {
        match self {
            Self::MovingAverageCrossover { .. } => "moving_average_crossover",
            Self::BollingerBands { .. } => "bollinger_bands",
            Self::Momentum { .. } => "momentum",
            Self::MeanReversion { .. } => "mean_reversion",
            Self::Breakout { .. } => "breakout",
            Self::SentimentAnalysis { .. } => "sentiment_analysis",
        }
    }

    /// Enforce per-variant parameter constraints.
    pub fn validate(&self) -> Result<(), BacktestError> {
        match *self {
            Self::MovingAverageCrossover {
                fast_window,
                slow_window,
                ..
            } => {
                if fast_window < 1 {
                    return Err(BacktestError::invalid_input("fast_window must be >= 1"));
                }
                if fast_window >= slow_window {
                    return Err(BacktestError::invalid_input(
                        "fast_window must be < slow_window",
                    ));
                }
            }
            Self::BollingerBands { window, multiplier } => {
                if window < 2 {
                    return Err(BacktestError::invalid_input("window must be >= 2"));
                }
                if multiplier <= 0.0 || !multiplier.is_finite() {
                    return Err(BacktestError::invalid_input("multiplier must be positive"));
                }
            }
            Self::Momentum {
                rsi_window,
                momentum_window,
                oversold,
                overbought,
                threshold,
            } => {
                if rsi_window < 1 || momentum_window < 1 {
                    return Err(BacktestError::invalid_input("windows must be >= 1"));
                }
                if oversold >= overbought {
                    return Err(BacktestError::invalid_input(
                        "oversold must be < overbought",
                    ));
                }
                if !(0.0..=100.0).contains(&oversold) || !(0.0..=100.0).contains(&overbought) {
                    return Err(BacktestError::invalid_input(
                        "RSI thresholds must be within [0, 100]",
                    ));
                }
                if threshold < 0.0 || !threshold.is_finite() {
                    return Err(BacktestError::invalid_input(
                        "momentum threshold must be non-negative",
                    ));
                }
            }
            Self::MeanReversion { window, threshold } => {
                if window < 2 {
                    return Err(BacktestError::invalid_input("window must be >= 2"));
                }
                if threshold <= 0.0 || !threshold.is_finite() {
                    return Err(BacktestError::invalid_input("threshold must be positive"));
                }
            }
            Self::Breakout {
                lookback_window,
                breakout_threshold,
                min_volume_ratio,
                confirmation_period,
            } => {
                if lookback_window < 1 {
                    return Err(BacktestError::invalid_input("lookback_window must be >= 1"));
                }
                if breakout_threshold < 0.0 || !breakout_threshold.is_finite() {
                    return Err(BacktestError::invalid_input(
                        "breakout_threshold must be non-negative",
                    ));
                }
                if min_volume_ratio < 0.0 || !min_volume_ratio.is_finite() {
                    return Err(BacktestError::invalid_input(
                        "min_volume_ratio must be non-negative",
                    ));
                }
                if confirmation_period < 1 {
                    return Err(BacktestError::invalid_input(
                        "confirmation_period must be >= 1",
                    ));
                }
            }
            Self::SentimentAnalysis {
                recency_half_life_hours,
                buy_threshold,
                sell_threshold,
                title_weight,
            } => {
                if recency_half_life_hours <= 0.0 || !recency_half_life_hours.is_finite() {
                    return Err(BacktestError::invalid_input(
                        "recency_half_life_hours must be positive",
                    ));
                }
                if buy_threshold <= sell_threshold {
                    return Err(BacktestError::invalid_input(
                        "buy_threshold must be > sell_threshold",
                    ));
                }
                if title_weight < 0.0 || !title_weight.is_finite() {
                    return Err(BacktestError::invalid_input(
                        "title_weight must be non-negative",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Parse from JSON, mapping an unknown `strategy_type` tag to
    /// `UnsupportedStrategy` instead of a generic serde error.
    pub fn parse_json(input: &str) -> Result<Self, BacktestError> {
        serde_json::from_str(input).map_err(|e| map_tag_error(&e.to_string()))
    }

    /// Parse from TOML, with the same unknown-tag mapping as `parse_json`.
    pub fn parse_toml(input: &str) -> Result<Self, BacktestError> {
        toml::from_str(input).map_err(|e| map_tag_error(&e.to_string()))
    }
}

fn map_tag_error(msg: &str) -> BacktestError {
    if msg.contains("unknown variant") {
        // serde reports `unknown variant `foo`, expected one of ...`
        let tag = msg
            .split('`')
            .nth(1)
            .unwrap_or("unknown")
            .to_string();
        BacktestError::UnsupportedStrategy(tag)
    } else {
        BacktestError::InvalidInput(msg.to_string())
    }
}
