//! Simple Moving Average (SMA).
//!
//! Trailing mean of close over `period` bars.
//! Minimum periods: period (first defined value at index period-1).

use super::{Cell, Indicator};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("SMA_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<Cell> {
        rolling_mean(closes, self.period)
    }
}

/// Trailing mean over `period` values; `None` until the window is full.
///
/// Each window is summed afresh, so the result at index i depends only on
/// `values[i + 1 - period..=i]`.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Cell> {
    let n = values.len();
    let mut result = vec![None; n];
    if period == 0 || n < period {
        return result;
    }

    for (offset, window) in values.windows(period).enumerate() {
        let sum: f64 = window.iter().sum();
        result[offset + period - 1] = Some(sum / period as f64);
    }

    result
}
