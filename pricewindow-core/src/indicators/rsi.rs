//! Relative Strength Index (RSI).
//!
//! Trailing simple means of the last `period` positive and negative close
//! deltas: RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Minimum periods: period + 1 (period deltas need period + 1 closes).
//! Edge case: avg_loss == 0 → RSI = 100, including the flat window where
//! avg_gain is also zero.

use super::{Cell, Indicator};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("RSI_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, closes: &[f64]) -> Vec<Cell> {
        let n = closes.len();
        let mut result = vec![None; n];
        if n < self.period + 1 {
            return result;
        }

        let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

        // deltas[k] is the change into bar k + 1.
        for (offset, window) in deltas.windows(self.period).enumerate() {
            let gain: f64 = window.iter().filter(|&&d| d > 0.0).sum();
            let loss: f64 = window.iter().filter(|&&d| d < 0.0).map(|d| -d).sum();
            let avg_gain = gain / self.period as f64;
            let avg_loss = loss / self.period as f64;
            result[offset + self.period] = Some(rsi_from_averages(avg_gain, avg_loss));
        }

        result
    }
}

/// Map average gain/loss to the 0..=100 RSI scale.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
