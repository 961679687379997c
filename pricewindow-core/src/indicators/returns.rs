//! Daily return ratio: (close[t] - close[t-1]) / close[t-1].
//!
//! Minimum periods: 2. A zero previous close leaves the cell undefined
//! instead of producing an infinite value.

use super::{Cell, Indicator};

#[derive(Debug, Clone, Default)]
pub struct Returns;

impl Returns {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Returns {
    fn name(&self) -> &str {
        "Returns"
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn compute(&self, closes: &[f64]) -> Vec<Cell> {
        let mut result = vec![None; closes.len()];
        for (i, pair) in closes.windows(2).enumerate() {
            let (prev, curr) = (pair[0], pair[1]);
            if prev != 0.0 {
                result[i + 1] = Some((curr - prev) / prev);
            }
        }
        result
    }
}
