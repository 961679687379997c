//! Error metrics and the naive persistence baseline.
//!
//! Pure functions over the sequences exactly as given: no resorting, no
//! state.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Mean-squared and mean-absolute error of a prediction run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub mse: f64,
    pub mae: f64,
}

impl Evaluation {
    pub fn rmse(&self) -> f64 {
        self.mse.sqrt()
    }
}

/// Compare predictions against targets index by index.
///
/// Fails on empty or length-mismatched inputs, and on non-finite values,
/// so both metrics are always finite.
pub fn evaluate(predictions: &[f64], targets: &[f64]) -> Result<Evaluation, PipelineError> {
    if predictions.is_empty() {
        return Err(PipelineError::config("cannot evaluate an empty prediction set"));
    }
    if predictions.len() != targets.len() {
        return Err(PipelineError::config(format!(
            "{} predictions for {} targets",
            predictions.len(),
            targets.len()
        )));
    }
    if let Some(i) = predictions
        .iter()
        .chain(targets)
        .position(|v| !v.is_finite())
    {
        return Err(PipelineError::config(format!(
            "non-finite value at position {i} of predictions followed by targets"
        )));
    }

    let n = predictions.len() as f64;
    let (sq, abs) = predictions
        .iter()
        .zip(targets)
        .fold((0.0, 0.0), |(sq, abs), (p, t)| {
            let err = p - t;
            (sq + err * err, abs + err.abs())
        });

    Ok(Evaluation {
        mse: sq / n,
        mae: abs / n,
    })
}

/// MAE of predicting each target with its predecessor.
///
/// `mean(|targets[1..] - targets[..n-1]|)`. Fails for fewer than two targets.
pub fn naive_baseline(targets: &[f64]) -> Result<f64, PipelineError> {
    if targets.len() < 2 {
        return Err(PipelineError::config(format!(
            "naive baseline needs at least 2 targets, got {}",
            targets.len()
        )));
    }
    let total: f64 = targets.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    Ok(total / (targets.len() - 1) as f64)
}
