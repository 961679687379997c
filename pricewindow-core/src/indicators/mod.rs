//! Technical indicators over daily close prices.
//!
//! Indicators are pure functions: close history in, one cell per bar out.
//! A cell is `Some(value)` once the indicator's minimum-periods requirement
//! is met and `None` before that. Warm-up rows are never zero-filled.
//!
//! # Look-ahead contamination guard
//! No value at bar t may depend on closes from bar t+1 or later. Every
//! indicator must pass the truncated-vs-full series test.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod returns;
pub mod rsi;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::{ema_of_series, Ema};
pub use macd::{Macd, MacdLine};
pub use returns::Returns;
pub use rsi::Rsi;
pub use sma::{rolling_mean, Sma};

/// One indicator value: `None` marks an undefined (warm-up) row.
pub type Cell = Option<f64>;

/// Trait for close-price indicators.
///
/// `compute` returns a vector of the same length as its input. The first
/// `warmup()` cells are `None`.
pub trait Indicator: Send + Sync {
    /// Column name (e.g. "SMA_10", "RSI_14").
    fn name(&self) -> &str;

    /// Minimum number of bars, including the current one, needed for a value.
    fn min_periods(&self) -> usize;

    /// Number of leading undefined rows.
    fn warmup(&self) -> usize {
        self.min_periods().saturating_sub(1)
    }

    /// Compute the indicator over the whole close series.
    ///
    /// Closes are expected to be finite; `Series` guarantees this.
    fn compute(&self, closes: &[f64]) -> Vec<Cell>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Unwrap a defined cell in tests, naming the index on failure.
#[cfg(test)]
pub(crate) fn defined(cells: &[Cell], i: usize) -> f64 {
    cells[i].unwrap_or_else(|| panic!("expected a defined value at index {i}"))
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-10;
