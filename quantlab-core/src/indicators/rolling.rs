//! Fixed-size rolling window over a streaming series.
//!
//! Backed by a ring buffer (`VecDeque`). Statistics are computed over the
//! buffered values on each call rather than via incremental add/subtract
//! accumulators; windows are small, and this guarantees bit-identical
//! results to a from-scratch recomputation at every bar.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "rolling window capacity must be >= 1");
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Push a value, evicting the oldest once full. Returns the evicted value.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest buffered value.
    pub fn front(&self) -> Option<f64> {
        self.values.front().copied()
    }

    /// Newest buffered value.
    pub fn back(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Mean of the buffered values; `None` until the window is full.
    pub fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        Some(self.sum() / self.capacity as f64)
    }

    /// Population standard deviation; `None` until the window is full.
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let var = self
            .values
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / self.capacity as f64;
        Some(var.sqrt())
    }

    /// Maximum of the buffered values; `None` until the window is full.
    pub fn max(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        self.values.iter().copied().reduce(f64::max)
    }

    /// Minimum of the buffered values; `None` until the window is full.
    pub fn min(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        self.values.iter().copied().reduce(f64::min)
    }
}
