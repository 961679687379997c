//! `prepare_data`: the single integration contract for the training driver.
//!
//! Stages, strictly downstream:
//! bars → indicators → feature matrix → split boundaries → scaler fit on the
//! training prefix → transform all rows → windows → chronological slices.
//!
//! Every call is independent. The fitted scaler is returned to the caller
//! inside [`PreparedData`]; nothing is cached or shared between calls.

use chrono::NaiveDate;
use ndarray::{Array1, Array3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Series;
use crate::error::PipelineError;
use crate::features::FeatureMatrix;
use crate::frame::{compute_indicators, FEATURE_WARMUP};
use crate::scaler::Scaler;
use crate::split::{validate_ratios, SplitBoundaries};
use crate::window::Windows;

/// Lookback and split ratios for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub lookback: usize,
    pub train_ratio: f64,
    pub val_ratio: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback: 60,
            train_ratio: 0.70,
            val_ratio: 0.15,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.lookback == 0 {
            return Err(PipelineError::config("lookback must be positive"));
        }
        validate_ratios(self.train_ratio, self.val_ratio)
    }

    /// Fewest bars for which a single window can exist.
    pub fn min_bars(&self) -> usize {
        FEATURE_WARMUP + self.lookback + 1
    }
}

/// Dates of the bars each target belongs to, per split.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetDates {
    pub train: Vec<NaiveDate>,
    pub val: Vec<NaiveDate>,
    pub test: Vec<NaiveDate>,
}

/// Output of [`prepare_data`]: six aligned arrays and the fitted scaler.
///
/// Each `x_*` is (examples × lookback × 10) and each `y_*` is (examples),
/// aligned by index with its `x_*`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub x_train: Array3<f64>,
    pub y_train: Array1<f64>,
    pub x_val: Array3<f64>,
    pub y_val: Array1<f64>,
    pub x_test: Array3<f64>,
    pub y_test: Array1<f64>,
    pub scaler: Scaler,
    pub boundaries: SplitBoundaries,
    pub target_dates: TargetDates,
}

impl PreparedData {
    /// Total windows across the three splits.
    pub fn window_count(&self) -> usize {
        self.y_train.len() + self.y_val.len() + self.y_test.len()
    }

    /// BLAKE3 digest over every array value and the scaler bounds.
    ///
    /// Two runs over the same bars with the same config yield the same digest.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for (x, y) in [
            (&self.x_train, &self.y_train),
            (&self.x_val, &self.y_val),
            (&self.x_test, &self.y_test),
        ] {
            for dim in x.shape() {
                hasher.update(&(*dim as u64).to_le_bytes());
            }
            for v in x.iter().chain(y.iter()) {
                hasher.update(&v.to_le_bytes());
            }
        }
        for feature in crate::features::Feature::ALL {
            let b = self.scaler.bounds(feature);
            hasher.update(&b.min.to_le_bytes());
            hasher.update(&b.max.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// Turn a bar series into leakage-free train/validation/test windows.
pub fn prepare_data(series: &Series, config: &PipelineConfig) -> Result<PreparedData, PipelineError> {
    config.validate()?;

    let required = config.min_bars();
    if series.len() < required {
        return Err(PipelineError::InsufficientData {
            required,
            available: series.len(),
        });
    }

    let frame = compute_indicators(series);
    let matrix = FeatureMatrix::from_frame(&frame);
    if matrix.len() <= config.lookback {
        return Err(PipelineError::InsufficientRows {
            required: config.lookback + 1,
            available: matrix.len(),
        });
    }

    let boundaries = SplitBoundaries::compute(
        matrix.len(),
        config.train_ratio,
        config.val_ratio,
        config.lookback,
    )?;
    debug!(
        bars = series.len(),
        rows = boundaries.rows,
        train_end = boundaries.train_end,
        val_end = boundaries.val_end,
        lookback = boundaries.lookback,
        "computed split boundaries"
    );

    let scaler = Scaler::fit(&matrix.rows()[boundaries.fit_rows()])?;
    let scaled = scaler.transform(matrix.rows());
    let windows = Windows::build(&scaled, config.lookback)?;

    let [train, val, test] = boundaries.window_ranges();
    let dates_for = |range: std::ops::Range<usize>| -> Vec<NaiveDate> {
        range
            .map(|j| matrix.dates()[windows.target_row(j)])
            .collect()
    };
    let target_dates = TargetDates {
        train: dates_for(train.clone()),
        val: dates_for(val.clone()),
        test: dates_for(test.clone()),
    };

    let (x_train, y_train) = windows.slice(train);
    let (x_val, y_val) = windows.slice(val);
    let (x_test, y_test) = windows.slice(test);
    debug!(
        train = y_train.len(),
        val = y_val.len(),
        test = y_test.len(),
        "windowed examples"
    );

    Ok(PreparedData {
        x_train,
        y_train,
        x_val,
        y_val,
        x_test,
        y_test,
        scaler,
        boundaries,
        target_dates,
    })
}
