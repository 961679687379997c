//! MACD trend-following pair.
//!
//! Two lines (separate Indicator instances):
//! - MACD: EMA(close, fast) - EMA(close, slow)
//! - Signal: EMA(MACD, signal)
//!
//! All EMAs are seeded at the first value without bias adjustment, so both
//! lines are defined from the first bar. Minimum periods: 1.

use super::ema::ema_of_series;
use super::{Cell, Indicator};

/// Which MACD line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    /// The MACD line for the given fast/slow spans.
    pub fn line(fast: usize, slow: usize) -> Self {
        assert!(fast >= 1 && slow > fast, "MACD requires 1 <= fast < slow");
        Self {
            fast,
            slow,
            signal: 1,
            line: MacdLine::Macd,
            name: "MACD".to_string(),
        }
    }

    /// The signal line: EMA of the MACD line over `signal` bars.
    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(signal >= 1, "MACD signal span must be >= 1");
        Self {
            signal,
            line: MacdLine::Signal,
            name: "MACD_signal".to_string(),
            ..Self::line(fast, slow)
        }
    }

    /// The conventional 12/26/9 pair.
    pub fn standard(line: MacdLine) -> Self {
        match line {
            MacdLine::Macd => Self::line(12, 26),
            MacdLine::Signal => Self::signal(12, 26, 9),
        }
    }

    fn macd_values(&self, closes: &[f64]) -> Vec<f64> {
        let fast = ema_of_series(closes, self.fast);
        let slow = ema_of_series(closes, self.slow);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn compute(&self, closes: &[f64]) -> Vec<Cell> {
        let macd = self.macd_values(closes);
        let values = match self.line {
            MacdLine::Macd => macd,
            MacdLine::Signal => ema_of_series(&macd, self.signal),
        };
        values.into_iter().map(Some).collect()
    }
}
