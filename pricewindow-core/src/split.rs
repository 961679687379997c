//! Chronological train/validation/test boundaries.
//!
//! Boundaries are computed on feature-matrix rows. The scaler is fitted on
//! rows `[0, train_end)`. Shifted left by the lookback, the same boundaries
//! slice the window sequence, whose window `j` predicts row `j + lookback`.
//! Nothing is shuffled: every train index precedes every validation index,
//! which precedes every test index.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Row boundaries for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitBoundaries {
    /// Feature-matrix rows before windowing.
    pub rows: usize,
    pub lookback: usize,
    /// `floor(rows * train_ratio)`.
    pub train_end: usize,
    /// `floor(rows * (train_ratio + val_ratio))`.
    pub val_end: usize,
}

impl SplitBoundaries {
    pub fn compute(
        rows: usize,
        train_ratio: f64,
        val_ratio: f64,
        lookback: usize,
    ) -> Result<Self, PipelineError> {
        validate_ratios(train_ratio, val_ratio)?;

        let train_end = (rows as f64 * train_ratio).floor() as usize;
        let val_end = ((rows as f64 * (train_ratio + val_ratio)).floor() as usize)
            .clamp(train_end, rows);

        if train_end < lookback {
            return Err(PipelineError::config(format!(
                "lookback {lookback} exceeds the {train_end} training rows"
            )));
        }

        Ok(Self {
            rows,
            lookback,
            train_end,
            val_end,
        })
    }

    /// Feature rows the scaler may be fitted on.
    pub fn fit_rows(&self) -> Range<usize> {
        0..self.train_end
    }

    /// Number of windows produced from `rows` feature rows.
    pub fn window_count(&self) -> usize {
        self.rows.saturating_sub(self.lookback)
    }

    /// Train, validation and test ranges over the window sequence.
    pub fn window_ranges(&self) -> [Range<usize>; 3] {
        let train_end = self.train_end - self.lookback;
        let val_end = self.val_end - self.lookback;
        let total = self.window_count();
        [0..train_end, train_end..val_end, val_end..total]
    }
}

/// Both ratios in (0, 1) with a sum below 1.
pub fn validate_ratios(train_ratio: f64, val_ratio: f64) -> Result<(), PipelineError> {
    let open_unit = |r: f64| r > 0.0 && r < 1.0;
    if !open_unit(train_ratio) || !open_unit(val_ratio) {
        return Err(PipelineError::config(format!(
            "train_ratio ({train_ratio}) and val_ratio ({val_ratio}) must lie in (0, 1)"
        )));
    }
    if train_ratio + val_ratio >= 1.0 {
        return Err(PipelineError::config(format!(
            "train_ratio + val_ratio must be < 1 (got {})",
            train_ratio + val_ratio
        )));
    }
    Ok(())
}
