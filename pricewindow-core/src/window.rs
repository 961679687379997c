//! Sliding input windows and aligned scalar targets.
//!
//! Window `j` holds scaled rows `[j, j + lookback)` and its target is the
//! scaled close at row `j + lookback`, so no window sees its own target row.

use ndarray::{s, Array1, Array3};

use crate::error::PipelineError;
use crate::features::{Feature, FeatureRow, FEATURE_COUNT};

/// Windowed examples: `x` is (examples × lookback × features), `y` is (examples).
#[derive(Debug, Clone, PartialEq)]
pub struct Windows {
    pub x: Array3<f64>,
    pub y: Array1<f64>,
    pub lookback: usize,
}

impl Windows {
    /// Build every window for which a full lookback of history exists.
    ///
    /// Fails if `lookback` is zero or not smaller than the row count.
    pub fn build(rows: &[FeatureRow], lookback: usize) -> Result<Self, PipelineError> {
        let n = rows.len();
        if lookback == 0 {
            return Err(PipelineError::config("lookback must be positive"));
        }
        if lookback >= n {
            return Err(PipelineError::config(format!(
                "lookback {lookback} must be smaller than the {n} available rows"
            )));
        }

        let count = n - lookback;
        let mut x = Array3::zeros((count, lookback, FEATURE_COUNT));
        let mut y = Array1::zeros(count);

        for j in 0..count {
            for (t, row) in rows[j..j + lookback].iter().enumerate() {
                for (f, &v) in row.iter().enumerate() {
                    x[[j, t, f]] = v;
                }
            }
            y[j] = rows[j + lookback][Feature::TARGET.index()];
        }

        Ok(Self { x, y, lookback })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Feature-matrix row predicted by window `j`.
    pub fn target_row(&self, j: usize) -> usize {
        j + self.lookback
    }

    /// Copy out windows `range` as an owned (x, y) pair.
    pub fn slice(&self, range: std::ops::Range<usize>) -> (Array3<f64>, Array1<f64>) {
        let x = self.x.slice(s![range.clone(), .., ..]).to_owned();
        let y = self.y.slice(s![range]).to_owned();
        (x, y)
    }
}
