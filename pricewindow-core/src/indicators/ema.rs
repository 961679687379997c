//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1],
//! alpha = 2 / (span + 1).
//! Seed: EMA[0] = close[0]. No bias adjustment, so the series is defined
//! from the first bar.
//! Minimum periods: 1.

use super::{Cell, Indicator};

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("EMA_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn compute(&self, closes: &[f64]) -> Vec<Cell> {
        ema_of_series(closes, self.span).into_iter().map(Some).collect()
    }
}

/// EMA of an arbitrary fully-defined series, seeded at its first value.
///
/// Used by MACD for both the price EMAs and the signal line.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());

    let mut prev: Option<f64> = None;
    for &v in values {
        let ema = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        result.push(ema);
        prev = Some(ema);
    }

    result
}
