//! Sentiment analysis — trade a recency-decayed, title-weighted score.
//!
//! Items come from an external feed, fetched once per run before replay.
//! At each bar the items published up to that bar's end-of-day are folded
//! into a weighted average: weight = 0.5^(age_hours / half_life) *
//! title_weight-if-headline. Buy at or above `buy_threshold`, Sell at or
//! below `sell_threshold`. No items in range (zero total weight) → Hold.

use crate::data::SentimentItem;
use crate::domain::{Action, Bar, Signal};
use crate::error::BacktestError;
use chrono::NaiveDateTime;

use super::{SequenceGuard, Strategy};

#[derive(Debug)]
pub struct SentimentAnalysis {
    half_life_hours: f64,
    buy_threshold: f64,
    sell_threshold: f64,
    title_weight: f64,
    /// Sorted by timestamp at construction.
    items: Vec<SentimentItem>,
    seq: SequenceGuard,
}

impl SentimentAnalysis {
    pub fn new(
        half_life_hours: f64,
        buy_threshold: f64,
        sell_threshold: f64,
        title_weight: f64,
        mut items: Vec<SentimentItem>,
    ) -> Self {
        debug_assert!(half_life_hours > 0.0 && buy_threshold > sell_threshold);
        items.sort_by_key(|it| it.timestamp);
        Self {
            half_life_hours,
            buy_threshold,
            sell_threshold,
            title_weight,
            items,
            seq: SequenceGuard::default(),
        }
    }

    /// Weighted average score as of `as_of`, or `None` with no usable items.
    fn score_at(&self, as_of: NaiveDateTime) -> Option<f64> {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for item in &self.items {
            if item.timestamp > as_of {
                break;
            }
            let age_hours = (as_of - item.timestamp).num_seconds() as f64 / 3600.0;
            let mut weight = 0.5_f64.powf(age_hours / self.half_life_hours);
            if item.from_title {
                weight *= self.title_weight;
            }
            weighted_sum += weight * item.score;
            total_weight += weight;
        }
        if total_weight > 0.0 {
            Some(weighted_sum / total_weight)
        } else {
            None
        }
    }
}

impl Strategy for SentimentAnalysis {
    fn name(&self) -> &'static str {
        "sentiment_analysis"
    }

    fn warmup_bars(&self) -> usize {
        1
    }

    fn on_bar(&mut self, bar: &Bar) -> Result<Signal, BacktestError> {
        self.seq.check(bar)?;

        let end_of_day = bar
            .date
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| bar.date.and_time(chrono::NaiveTime::MIN));
        let action = match self.score_at(end_of_day) {
            Some(score) if score >= self.buy_threshold => Action::Buy,
            Some(score) if score <= self.sell_threshold => Action::Sell,
            _ => Action::Hold,
        };

        Ok(Signal::new(&bar.symbol, bar.date, action, bar.close))
    }
}
